//! Best-effort OpenAPI 3.0/3.1/3.2 reader.
//!
//! Documents are walked as plain JSON values. Anything unrecognized becomes
//! [`SchemaNode::Unknown`] instead of an error, so third-party documents with
//! partial or non-standard schemas still produce usable declarations.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use super::schema_ir::{
    AdditionalNode, ComponentSchema, Content, DocumentInfo, ParsedBody, ParsedDocument,
    ParsedOperation, ParsedParameter, PrimitiveKind, PropertyNode, SchemaNode, StreamPayload,
};
use super::InputParser;
use crate::error::{Error, Result};
use crate::openapi::{HttpMethod, ParameterLocation};
use crate::operation_processor::{CONTROLLER_EXTENSION, METHOD_EXTENSION};

/// Success statuses in the order a response type is looked up.
const SUCCESS_STATUSES: [&str; 8] = ["200", "201", "202", "203", "206", "207", "default", "2XX"];

pub struct OpenApiParser;

impl InputParser for OpenApiParser {
    fn format_name(&self) -> &str {
        "openapi"
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["yaml", "yml", "json"]
    }

    fn parse_str(&self, content: &str) -> Result<ParsedDocument> {
        let value = load_value(content)?;
        parse_document(&value)
    }
}

/// Decode JSON or YAML text into a JSON value with an object root.
pub fn load_value(content: &str) -> Result<Value> {
    let value: Value = if content.trim_start().starts_with('{') {
        serde_json::from_str(content).map_err(Error::MalformedJson)?
    } else {
        serde_yaml::from_str(content).map_err(Error::MalformedYaml)?
    };
    if !value.is_object() {
        return Err(Error::NotAnObject);
    }
    Ok(value)
}

pub fn parse_document(document: &Value) -> Result<ParsedDocument> {
    let root = document.as_object().ok_or(Error::NotAnObject)?;

    let info = root.get("info");
    let info = DocumentInfo {
        title: str_field(info, "title").unwrap_or("API").to_string(),
        version: str_field(info, "version").unwrap_or("0.0.0").to_string(),
        description: str_field(info, "description").map(str::to_string),
        base_url: root
            .get("servers")
            .and_then(|s| s.get(0))
            .and_then(|s| s.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string),
    };

    let mut components = IndexMap::new();
    if let Some(schemas) = root
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
    {
        for (name, schema) in schemas {
            components.insert(
                name.clone(),
                ComponentSchema {
                    title: str_field(Some(schema), "title").map(str::to_string),
                    description: str_field(Some(schema), "description").map(str::to_string),
                    node: parse_schema(schema),
                },
            );
        }
    }

    let mut operations = Vec::new();
    if let Some(paths) = root.get("paths").and_then(Value::as_object) {
        for (path, item) in paths {
            let shared = item
                .get("parameters")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for method in HttpMethod::ALL {
                let Some(operation) = item.get(method.key()).and_then(Value::as_object) else {
                    continue;
                };
                operations.push(parse_operation(document, path, method, operation, shared));
            }
        }
    }

    debug!(
        components = components.len(),
        operations = operations.len(),
        "Parsed OpenAPI document."
    );
    Ok(ParsedDocument {
        info,
        components,
        operations,
    })
}

fn str_field<'v>(value: Option<&'v Value>, key: &str) -> Option<&'v str> {
    value?.get(key)?.as_str()
}

/// Follow a local `$ref` (any `#/...` pointer) inside the document.
fn resolve<'v>(document: &'v Value, value: &'v Value) -> &'v Value {
    let mut current = value;
    for _ in 0..16 {
        let Some(pointer) = current
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| r.strip_prefix('#'))
        else {
            return current;
        };
        match document.pointer(pointer) {
            Some(target) => current = target,
            None => return current,
        }
    }
    current
}

fn ref_name(reference: &str) -> String {
    reference
        .rsplit('/')
        .next()
        .unwrap_or(reference)
        .to_string()
}

pub fn parse_schema(schema: &Value) -> SchemaNode {
    let Some(object) = schema.as_object() else {
        return SchemaNode::Unknown;
    };

    if let Some(reference) = object.get("$ref").and_then(Value::as_str) {
        return SchemaNode::Ref(ref_name(reference));
    }

    let node = parse_shape(object);
    if object.get("nullable").and_then(Value::as_bool) == Some(true) {
        with_null(node)
    } else {
        node
    }
}

fn with_null(node: SchemaNode) -> SchemaNode {
    match node {
        SchemaNode::Union {
            mut variants,
            discriminator,
        } => {
            if !variants.contains(&SchemaNode::null()) {
                variants.push(SchemaNode::null());
            }
            SchemaNode::Union {
                variants,
                discriminator,
            }
        }
        SchemaNode::Primitive {
            kind: PrimitiveKind::Null,
            ..
        } => node,
        other => SchemaNode::Union {
            variants: vec![other, SchemaNode::null()],
            discriminator: None,
        },
    }
}

fn parse_shape(object: &Map<String, Value>) -> SchemaNode {
    if let Some(value) = object.get("const") {
        return SchemaNode::Const(value.clone());
    }
    if let Some(values) = object.get("enum").and_then(Value::as_array) {
        return SchemaNode::Enum(values.clone());
    }

    for key in ["oneOf", "anyOf"] {
        if let Some(members) = object.get(key).and_then(Value::as_array) {
            let mut variants: Vec<SchemaNode> = members.iter().map(parse_schema).collect();
            if variants.len() == 1 {
                return variants.remove(0);
            }
            let discriminator = object
                .get("discriminator")
                .and_then(|d| d.get("propertyName"))
                .and_then(Value::as_str)
                .map(str::to_string);
            return SchemaNode::Union {
                variants,
                discriminator,
            };
        }
    }

    if let Some(members) = object.get("allOf").and_then(Value::as_array) {
        let mut parts: Vec<SchemaNode> = members.iter().map(parse_schema).collect();
        // Sibling properties next to allOf extend the composition.
        if object.contains_key("properties") {
            parts.push(parse_object(object));
        }
        if parts.len() == 1 {
            return parts.remove(0);
        }
        return SchemaNode::Intersection(parts);
    }

    match object.get("type") {
        Some(Value::String(kind)) => parse_typed(kind, object),
        Some(Value::Array(kinds)) => {
            let mut variants: Vec<SchemaNode> = kinds
                .iter()
                .filter_map(Value::as_str)
                .filter(|k| *k != "null")
                .map(|k| parse_typed(k, object))
                .collect();
            let nullable = kinds.iter().any(|k| k.as_str() == Some("null"));
            let node = match variants.len() {
                0 => SchemaNode::null(),
                1 => variants.remove(0),
                _ => SchemaNode::Union {
                    variants,
                    discriminator: None,
                },
            };
            if nullable {
                with_null(node)
            } else {
                node
            }
        }
        _ if object.contains_key("properties") || object.contains_key("additionalProperties") => {
            parse_object(object)
        }
        _ if object.contains_key("items") || object.contains_key("prefixItems") => {
            parse_typed("array", object)
        }
        _ => SchemaNode::Unknown,
    }
}

fn parse_typed(kind: &str, object: &Map<String, Value>) -> SchemaNode {
    let format = object.get("format").and_then(Value::as_str);
    let primitive = |kind| SchemaNode::Primitive {
        kind,
        format: format.map(str::to_string),
    };

    match kind {
        "string" if format == Some("binary") => SchemaNode::Binary,
        "string" => primitive(PrimitiveKind::String),
        "integer" => primitive(PrimitiveKind::Integer),
        "number" => primitive(PrimitiveKind::Number),
        "boolean" => primitive(PrimitiveKind::Boolean),
        "null" => SchemaNode::null(),
        "array" => match object.get("prefixItems").and_then(Value::as_array) {
            Some(prefix) => SchemaNode::Tuple {
                prefix: prefix.iter().map(parse_schema).collect(),
                rest: object
                    .get("items")
                    .filter(|items| items.is_object())
                    .map(|items| Box::new(parse_schema(items))),
            },
            None => SchemaNode::Array(Box::new(
                object.get("items").map(parse_schema).unwrap_or(SchemaNode::Unknown),
            )),
        },
        "object" => parse_object(object),
        other => {
            debug!(kind = other, "Unsupported schema type.");
            SchemaNode::Unknown
        }
    }
}

fn parse_object(object: &Map<String, Value>) -> SchemaNode {
    let required: HashSet<&str> = object
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let properties = object
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(name, schema)| PropertyNode {
                    name: name.clone(),
                    node: parse_schema(schema),
                    required: required.contains(name.as_str()),
                    description: str_field(Some(schema), "description").map(str::to_string),
                    read_only: schema.get("readOnly").and_then(Value::as_bool) == Some(true),
                })
                .collect()
        })
        .unwrap_or_default();

    let additional = match object.get("additionalProperties") {
        Some(Value::Bool(true)) => Some(AdditionalNode::Any),
        Some(Value::Bool(false)) => Some(AdditionalNode::Forbidden),
        Some(Value::Object(schema)) if schema.is_empty() => Some(AdditionalNode::Any),
        Some(schema @ Value::Object(_)) => {
            Some(AdditionalNode::Schema(Box::new(parse_schema(schema))))
        }
        _ => None,
    };

    SchemaNode::Object {
        properties,
        additional,
    }
}

fn parse_operation(
    document: &Value,
    path: &str,
    method: HttpMethod,
    operation: &Map<String, Value>,
    shared: &[Value],
) -> ParsedOperation {
    let name = operation
        .get(METHOD_EXTENSION)
        .or_else(|| operation.get("operationId"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| synthesized_name(path, method));

    let controller = operation
        .get(CONTROLLER_EXTENSION)
        .and_then(Value::as_str)
        .or_else(|| {
            operation
                .get("tags")
                .and_then(|t| t.get(0))
                .and_then(Value::as_str)
        })
        .unwrap_or("default")
        .to_string();

    let mut parameters: Vec<ParsedParameter> = Vec::new();
    let declared = shared.iter().chain(
        operation
            .get("parameters")
            .and_then(Value::as_array)
            .into_iter()
            .flatten(),
    );
    for parameter in declared {
        let Some(parameter) = parse_parameter(resolve(document, parameter)) else {
            continue;
        };
        // Operation-level declarations override path-level ones.
        parameters.retain(|p| !(p.name == parameter.name && p.location == parameter.location));
        parameters.push(parameter);
    }

    let body = operation.get("requestBody").map(|body| {
        let body = resolve(document, body);
        ParsedBody {
            content: body
                .get("content")
                .and_then(Value::as_object)
                .map(classify_content)
                .unwrap_or(Content::Empty),
            required: body.get("required").and_then(Value::as_bool) == Some(true),
        }
    });

    ParsedOperation {
        name,
        method,
        path: path.to_string(),
        controller,
        summary: operation
            .get("summary")
            .and_then(Value::as_str)
            .map(str::to_string),
        description: operation
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        deprecated: operation.get("deprecated").and_then(Value::as_bool) == Some(true),
        parameters,
        body: body.filter(|b| b.content != Content::Empty),
        response: parse_response(document, operation),
    }
}

fn synthesized_name(path: &str, method: HttpMethod) -> String {
    let parts: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .collect();
    format!("{}_{}", method.key(), parts.join("_"))
}

fn parse_parameter(parameter: &Value) -> Option<ParsedParameter> {
    let name = parameter.get("name").and_then(Value::as_str)?;
    let location = match parameter.get("in").and_then(Value::as_str)? {
        "path" => ParameterLocation::Path,
        "query" => ParameterLocation::Query,
        "header" => ParameterLocation::Header,
        // Cookies are managed by the platform, not passed explicitly.
        _ => return None,
    };
    Some(ParsedParameter {
        name: name.to_string(),
        location,
        required: location == ParameterLocation::Path
            || parameter.get("required").and_then(Value::as_bool) == Some(true),
        description: str_field(Some(parameter), "description").map(str::to_string),
        node: parameter
            .get("schema")
            .map(parse_schema)
            .unwrap_or_else(SchemaNode::string),
    })
}

fn parse_response(document: &Value, operation: &Map<String, Value>) -> Content {
    let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
        return Content::Empty;
    };
    for status in SUCCESS_STATUSES {
        let Some(response) = responses.get(status) else {
            continue;
        };
        let response = resolve(document, response);
        if let Some(content) = response.get("content").and_then(Value::as_object) {
            if !content.is_empty() {
                return classify_content(content);
            }
        }
    }
    Content::Empty
}

/// Classify a `content` map by its first media type.
pub fn classify_content(content: &Map<String, Value>) -> Content {
    let Some((media_type, media)) = content.iter().next() else {
        return Content::Empty;
    };
    let media_type = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let schema = || {
        media
            .get("schema")
            .map(parse_schema)
            .unwrap_or(SchemaNode::Unknown)
    };

    if media_type == "text/event-stream" {
        Content::EventStream(stream_payload(media))
    } else if media_type == "application/json" || media_type.ends_with("+json") {
        Content::Json(schema())
    } else if media_type == "multipart/form-data" {
        Content::Multipart(schema())
    } else if media_type.starts_with("text/") {
        Content::Text
    } else if media_type == "application/octet-stream"
        || media_type == "application/pdf"
        || media_type.starts_with("image/")
        || media_type.starts_with("audio/")
        || media_type.starts_with("video/")
    {
        Content::Binary
    } else {
        debug!(media_type = %media_type, "Unrecognized media type, treating as JSON.");
        Content::Json(schema())
    }
}

fn stream_payload(media: &Value) -> StreamPayload {
    let Some(item) = media.get("itemSchema") else {
        return StreamPayload::Raw;
    };

    if let Some(branches) = item.get("oneOf").and_then(Value::as_array) {
        let events: Vec<(String, SchemaNode)> = branches
            .iter()
            .filter_map(|branch| {
                let event = branch.get("properties")?.get("event")?;
                let name = event
                    .get("const")
                    .or_else(|| event.get("enum").and_then(|e| e.get(0)))
                    .and_then(Value::as_str)?;
                let data = event_data(branch).unwrap_or(SchemaNode::Unknown);
                Some((name.to_string(), data))
            })
            .collect();
        if !events.is_empty() {
            return StreamPayload::Events(events);
        }
    }

    match event_data(item) {
        Some(data) => StreamPayload::Typed(data),
        None => StreamPayload::Raw,
    }
}

/// `properties.data.contentSchema` of one event schema.
fn event_data(item: &Value) -> Option<SchemaNode> {
    item.get("properties")?
        .get("data")?
        .get("contentSchema")
        .map(parse_schema)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(json: &str) -> ParsedDocument {
        OpenApiParser.parse_str(json).unwrap()
    }

    #[test]
    fn test_nullable_forms() {
        let string_or_null = SchemaNode::Union {
            variants: vec![SchemaNode::string(), SchemaNode::null()],
            discriminator: None,
        };
        assert_eq!(
            parse_schema(&json!({ "type": ["string", "null"] })),
            string_or_null
        );
        assert_eq!(
            parse_schema(&json!({ "type": "string", "nullable": true })),
            string_or_null
        );
        assert_eq!(
            parse_schema(&json!({ "anyOf": [{ "type": "string" }, { "type": "null" }] })),
            string_or_null
        );
    }

    #[test]
    fn test_schema_shapes() {
        assert_eq!(
            parse_schema(&json!({ "$ref": "#/components/schemas/User" })),
            SchemaNode::Ref("User".to_string())
        );
        assert_eq!(
            parse_schema(&json!({ "type": "string", "format": "binary" })),
            SchemaNode::Binary
        );
        assert_eq!(
            parse_schema(&json!({ "enum": ["a", "b"] })),
            SchemaNode::Enum(vec![json!("a"), json!("b")])
        );
        assert_eq!(
            parse_schema(&json!({ "type": "array" })),
            SchemaNode::Array(Box::new(SchemaNode::Unknown))
        );
        assert_eq!(
            parse_schema(&json!({
                "type": "array",
                "prefixItems": [{ "type": "string" }],
                "items": { "type": "integer" }
            })),
            SchemaNode::Tuple {
                prefix: vec![SchemaNode::string()],
                rest: Some(Box::new(SchemaNode::Primitive {
                    kind: PrimitiveKind::Integer,
                    format: None
                })),
            }
        );
        assert_eq!(parse_schema(&json!(true)), SchemaNode::Unknown);
    }

    #[test]
    fn test_object_properties_and_additional() {
        let node = parse_schema(&json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "readOnly": true, "description": "Identifier" },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["id"],
            "additionalProperties": { "type": "number" }
        }));
        let SchemaNode::Object {
            properties,
            additional,
        } = node
        else {
            panic!("expected object");
        };
        assert_eq!(properties.len(), 2);
        assert!(properties[0].required && properties[0].read_only);
        assert_eq!(properties[0].description.as_deref(), Some("Identifier"));
        assert!(!properties[1].required);
        assert!(matches!(additional, Some(AdditionalNode::Schema(_))));

        assert!(matches!(
            parse_schema(&json!({ "type": "object", "additionalProperties": false })),
            SchemaNode::Object {
                additional: Some(AdditionalNode::Forbidden),
                ..
            }
        ));
        assert!(matches!(
            parse_schema(&json!({ "additionalProperties": {} })),
            SchemaNode::Object {
                additional: Some(AdditionalNode::Any),
                ..
            }
        ));
    }

    #[test]
    fn test_discriminated_union_and_all_of() {
        let node = parse_schema(&json!({
            "oneOf": [{ "$ref": "#/components/schemas/Cat" }, { "$ref": "#/components/schemas/Dog" }],
            "discriminator": { "propertyName": "type" }
        }));
        assert!(matches!(
            node,
            SchemaNode::Union { ref variants, discriminator: Some(ref d) } if variants.len() == 2 && d == "type"
        ));

        let node = parse_schema(&json!({
            "allOf": [{ "$ref": "#/components/schemas/Base" }],
            "properties": { "extra": { "type": "boolean" } }
        }));
        let SchemaNode::Intersection(parts) = node else {
            panic!("expected intersection");
        };
        assert_eq!(parts[0], SchemaNode::Ref("Base".to_string()));
        assert!(parts[1].is_object());
    }

    #[test]
    fn test_content_mapping() {
        let classify = |value: Value| classify_content(value.as_object().unwrap());

        assert_eq!(
            classify(json!({ "application/problem+json": { "schema": { "type": "string" } } })),
            Content::Json(SchemaNode::string())
        );
        assert_eq!(classify(json!({ "text/csv": {} })), Content::Text);
        assert_eq!(classify(json!({ "application/pdf": {} })), Content::Binary);
        assert_eq!(classify(json!({ "image/png": {} })), Content::Binary);
        assert!(matches!(
            classify(json!({ "multipart/form-data": { "schema": { "type": "object" } } })),
            Content::Multipart(_)
        ));
        assert_eq!(
            classify(json!({ "text/event-stream": {} })),
            Content::EventStream(StreamPayload::Raw)
        );
        assert_eq!(
            classify(json!({ "text/event-stream": { "itemSchema": {
                "type": "object",
                "properties": { "data": { "type": "string", "contentSchema": { "$ref": "#/components/schemas/Tick" } } }
            } } })),
            Content::EventStream(StreamPayload::Typed(SchemaNode::Ref("Tick".to_string())))
        );
    }

    #[test]
    fn test_event_branches() {
        let content = json!({ "text/event-stream": { "itemSchema": {
            "oneOf": [
                { "properties": { "event": { "const": "progress" }, "data": { "contentSchema": { "$ref": "#/components/schemas/Progress" } } } },
                { "properties": { "event": { "const": "error" }, "data": { "contentSchema": { "type": "object" } } } }
            ],
            "discriminator": { "propertyName": "event" }
        } } });

        let Content::EventStream(StreamPayload::Events(events)) =
            classify_content(content.as_object().unwrap())
        else {
            panic!("expected events");
        };
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ("progress".to_string(), SchemaNode::Ref("Progress".to_string())));
        assert_eq!(events[1].0, "error");
    }

    #[test]
    fn test_operations() {
        let document = parse(
            r##"{
                "openapi": "3.1.0",
                "info": { "title": "Pets", "version": "2.0.0" },
                "servers": [{ "url": "https://api.example.com" }],
                "paths": {
                    "/pets/{petId}": {
                        "parameters": [
                            { "name": "petId", "in": "path", "schema": { "type": "string" } },
                            { "name": "session", "in": "cookie" }
                        ],
                        "get": {
                            "operationId": "getPet",
                            "tags": ["pets"],
                            "parameters": [
                                { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer" } },
                                { "$ref": "#/components/parameters/Verbose" }
                            ],
                            "responses": {
                                "404": { "description": "Missing" },
                                "200": { "description": "OK", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
                            }
                        },
                        "delete": {
                            "x-typebridge-controller": "admin",
                            "x-typebridge-method": "removePet",
                            "responses": { "204": { "description": "Gone" } }
                        },
                        "put": {
                            "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } },
                            "responses": { "200": { "description": "OK" } }
                        }
                    }
                },
                "components": {
                    "schemas": { "Pet": { "type": "object", "description": "A pet", "properties": { "name": { "type": "string" } } } },
                    "parameters": { "Verbose": { "name": "verbose", "in": "query", "schema": { "type": "boolean" } } }
                }
            }"##,
        );

        assert_eq!(document.info.title, "Pets");
        assert_eq!(document.info.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(document.components["Pet"].description.as_deref(), Some("A pet"));

        let get = &document.operations[0];
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.name, "getPet");
        assert_eq!(get.controller, "pets");
        assert_eq!(get.parameters.len(), 2);
        assert_eq!(get.parameters[0].name, "petId");
        assert!(matches!(
            get.parameters[0].node,
            SchemaNode::Primitive { kind: PrimitiveKind::Integer, .. }
        ));
        assert_eq!(get.parameters[1].name, "verbose");
        assert!(!get.parameters[1].required);
        assert_eq!(get.response, Content::Json(SchemaNode::Ref("Pet".to_string())));

        let put = &document.operations[1];
        assert_eq!(put.method, HttpMethod::Put);
        assert_eq!(put.name, "put_pets");
        assert_eq!(put.controller, "default");
        let body = put.body.as_ref().unwrap();
        assert!(body.required);
        assert_eq!(body.content, Content::Json(SchemaNode::Ref("Pet".to_string())));

        let delete = &document.operations[2];
        assert_eq!(delete.name, "removePet");
        assert_eq!(delete.controller, "admin");
        assert_eq!(delete.response, Content::Empty);
    }

    #[test]
    fn test_yaml_input() {
        let document = parse(
            "openapi: 3.1.0\ninfo:\n  title: Yaml\n  version: '1'\ncomponents:\n  schemas:\n    Id:\n      type: string\n",
        );
        assert_eq!(document.info.title, "Yaml");
        assert_eq!(document.components["Id"].node, SchemaNode::string());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            OpenApiParser.parse_str("{ not json"),
            Err(Error::MalformedJson(_))
        ));
        assert!(matches!(
            OpenApiParser.parse_str("- a\n- b\n"),
            Err(Error::NotAnObject)
        ));
        assert!(matches!(
            OpenApiParser.parse_str("key: [unclosed"),
            Err(Error::MalformedYaml(_))
        ));
    }
}
