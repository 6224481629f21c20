//! Per-operation data handed to the controller template.

use std::collections::HashMap;

use serde::Serialize;

use super::naming::{camel_case, kebab_case, literal_type, quote_if_needed, summary_comment};
use super::render::TypeRenderer;
use crate::openapi::ParameterLocation;
use crate::parsers::{Content, ParsedOperation, ParsedParameter, StreamPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyKind {
    Json,
    Multipart,
    Binary,
    Text,
}

/// How the runtime reads the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseKind {
    Json,
    Text,
    Blob,
    FormData,
    Void,
    Stream,
    Events,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSignature {
    pub function_name: String,
    /// Upper-case HTTP method.
    pub method: String,
    pub path: String,
    /// Kebab-case file stem of the controller module.
    pub controller: String,
    pub doc: String,
    pub deprecated: bool,
    pub path_type: Option<String>,
    pub query_type: Option<String>,
    pub header_type: Option<String>,
    pub body_type: Option<String>,
    pub body_kind: Option<BodyKind>,
    /// Inline object type of the single `input` argument.
    pub input_type: Option<String>,
    pub input_optional: bool,
    pub response_type: String,
    pub response_kind: ResponseKind,
    /// Item type of an event stream.
    pub event_type: Option<String>,
}

impl OperationSignature {
    pub fn build(operation: &ParsedOperation, renderer: &TypeRenderer<'_>) -> Self {
        let group = |location: ParameterLocation| {
            let params: Vec<&ParsedParameter> = operation
                .parameters
                .iter()
                .filter(|p| p.location == location)
                .collect();
            parameter_group(&params, renderer)
        };
        let path = group(ParameterLocation::Path);
        let query = group(ParameterLocation::Query);
        let headers = group(ParameterLocation::Header);

        let body = operation.body.as_ref().and_then(|body| {
            let (type_name, kind) = match &body.content {
                Content::Json(node) => (renderer.render(node), BodyKind::Json),
                Content::Multipart(node) => (renderer.render(node), BodyKind::Multipart),
                Content::Binary => (renderer.builtin("Blob"), BodyKind::Binary),
                Content::Text => ("string".to_string(), BodyKind::Text),
                Content::Empty | Content::EventStream(_) => return None,
            };
            Some((type_name, kind, body.required))
        });

        let mut members = Vec::new();
        for (key, entry) in [("path", &path), ("query", &query), ("headers", &headers)] {
            if let Some((type_name, required)) = entry {
                members.push((key, type_name.clone(), *required));
            }
        }
        if let Some((type_name, _, required)) = &body {
            members.push(("body", type_name.clone(), *required));
        }
        let input_optional = members.iter().all(|(_, _, required)| !required);
        let input_type = (!members.is_empty()).then(|| {
            let fields: Vec<String> = members
                .iter()
                .map(|(key, type_name, required)| {
                    format!("{key}{}: {type_name}", if *required { "" } else { "?" })
                })
                .collect();
            format!("{{ {} }}", fields.join("; "))
        });

        let (response_type, response_kind, event_type) =
            response_signature(&operation.response, renderer);

        Self {
            function_name: camel_case(&operation.name),
            method: operation.method.as_str().to_string(),
            path: operation.path.clone(),
            controller: kebab_case(&operation.controller),
            doc: summary_comment(
                operation.summary.as_deref(),
                operation.description.as_deref(),
                "",
            ),
            deprecated: operation.deprecated,
            path_type: path.map(|(type_name, _)| type_name),
            query_type: query.map(|(type_name, _)| type_name),
            header_type: headers.map(|(type_name, _)| type_name),
            body_type: body.as_ref().map(|(type_name, _, _)| type_name.clone()),
            body_kind: body.map(|(_, kind, _)| kind),
            input_type,
            input_optional,
            response_type,
            response_kind,
            event_type,
        }
    }

    /// Rewrite every type expression in place.
    pub fn map_types(&mut self, f: impl Fn(&str) -> String) {
        for slot in [
            &mut self.path_type,
            &mut self.query_type,
            &mut self.header_type,
            &mut self.body_type,
            &mut self.input_type,
            &mut self.event_type,
        ]
        .into_iter()
        .flatten()
        {
            *slot = f(slot.as_str());
        }
        self.response_type = f(&self.response_type);
    }
}

/// `{ id: string; page?: number }`, and whether any member is required.
fn parameter_group(
    params: &[&ParsedParameter],
    renderer: &TypeRenderer<'_>,
) -> Option<(String, bool)> {
    if params.is_empty() {
        return None;
    }
    let fields: Vec<String> = params
        .iter()
        .map(|p| {
            format!(
                "{}{}: {}",
                quote_if_needed(&p.name),
                if p.required { "" } else { "?" },
                renderer.render(&p.node)
            )
        })
        .collect();
    let required = params.iter().any(|p| p.required);
    Some((format!("{{ {} }}", fields.join("; ")), required))
}

fn response_signature(
    content: &Content,
    renderer: &TypeRenderer<'_>,
) -> (String, ResponseKind, Option<String>) {
    match content {
        Content::Empty => ("void".to_string(), ResponseKind::Void, None),
        Content::Json(node) => (renderer.render(node), ResponseKind::Json, None),
        Content::Text => ("string".to_string(), ResponseKind::Text, None),
        Content::Binary => (renderer.builtin("Blob"), ResponseKind::Blob, None),
        Content::Multipart(_) => (renderer.builtin("FormData"), ResponseKind::FormData, None),
        Content::EventStream(StreamPayload::Raw) => (
            format!("ReadableStream<{}>", renderer.builtin("Uint8Array")),
            ResponseKind::Stream,
            None,
        ),
        Content::EventStream(StreamPayload::Typed(node)) => {
            let event = format!("sse.ServerSentEvent<{}>", renderer.render(node));
            (format!("AsyncIterable<{event}>"), ResponseKind::Events, Some(event))
        }
        Content::EventStream(StreamPayload::Events(events)) => {
            let variants: Vec<String> = events
                .iter()
                .map(|(name, node)| {
                    format!(
                        "{{ event: {}; data: {}; id?: string }}",
                        literal_type(&serde_json::Value::String(name.clone())),
                        renderer.render(node)
                    )
                })
                .collect();
            let event = if variants.is_empty() {
                "never".to_string()
            } else {
                variants.join(" | ")
            };
            (format!("AsyncIterable<{event}>"), ResponseKind::Events, Some(event))
        }
    }
}

/// Suffix repeated function names inside each controller: `list`, `list2`, `list3`.
pub fn dedupe_function_names(signatures: &mut [OperationSignature]) {
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    for signature in signatures.iter_mut() {
        let count = seen
            .entry((signature.controller.clone(), signature.function_name.clone()))
            .or_insert(0);
        *count += 1;
        if *count > 1 {
            signature.function_name = format!("{}{}", signature.function_name, count);
        }
    }
}
