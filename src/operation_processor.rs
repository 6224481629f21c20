//! Route records to OpenAPI operations and a complete document.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::metadata::{Metadata, ObjectType, TypeKind, TypeRegistry};
use crate::openapi::{
    Components, Discriminator, Document, HttpMethod, Info, MediaType, Operation, Parameter,
    ParameterLocation, RequestBody, Response, Schema, Server, Tag,
};
use crate::schema_processor::SchemaProcessor;

pub const CONTROLLER_EXTENSION: &str = "x-typebridge-controller";
pub const METHOD_EXTENSION: &str = "x-typebridge-method";

/// Analyzer output: named types plus one record per route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub types: IndexMap<String, Metadata>,
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

impl RouteManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::MalformedManifest)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub controller: String,
    pub handler: String,
    pub method: HttpMethod,
    /// Source path syntax, e.g. `/users/:id`.
    pub path: String,
    #[serde(default)]
    pub parameters: Vec<RouteParameter>,
    #[serde(default)]
    pub returns: Option<Metadata>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,
    #[serde(default)]
    pub errors: Vec<ErrorDeclaration>,
    /// Response is a `text/event-stream`.
    #[serde(default)]
    pub sse: bool,
    /// Named events of a stream. Empty means one unnamed event typed by `returns`.
    #[serde(default)]
    pub events: Vec<SseEvent>,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub deprecated: bool,
    /// Overrides the inferred request body media type.
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterCategory {
    Body,
    Query,
    Param,
    Headers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteParameter {
    pub category: ParameterCategory,
    /// `None` binds the whole object, which is then split per property.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub metadata: Metadata,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RouteParameter {
    fn is_required(&self) -> bool {
        self.required.unwrap_or(!self.metadata.optional)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDeclaration {
    pub status: u16,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseEvent {
    pub name: String,
    #[serde(rename = "type")]
    pub data: Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersioningMode {
    #[default]
    Uri,
    Header,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioning {
    #[serde(default)]
    pub mode: VersioningMode,

    #[serde(rename = "headerName", default = "default_version_header")]
    pub header_name: String,

    #[serde(default = "default_version_prefix")]
    pub prefix: String,
}

fn default_version_header() -> String {
    "X-API-Version".to_string()
}

fn default_version_prefix() -> String {
    "v".to_string()
}

impl Default for Versioning {
    fn default() -> Self {
        Self {
            mode: VersioningMode::Uri,
            header_name: default_version_header(),
            prefix: default_version_prefix(),
        }
    }
}

/// Document-level settings for [`assemble_document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOptions {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub versioning: Versioning,
}

fn default_title() -> String {
    "API".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            description: None,
            servers: Vec::new(),
            versioning: Versioning::default(),
        }
    }
}

/// Build a complete document from `manifest`.
///
/// Every call owns a fresh registry and named-schema table.
pub fn assemble_document(manifest: &RouteManifest, options: &DocumentOptions) -> Document {
    let registry: TypeRegistry = manifest
        .types
        .iter()
        .map(|(name, meta)| (name.clone(), meta.clone()))
        .collect();
    let mut processor = OperationProcessor::new(&registry, &options.versioning);

    let mut document = Document::new(Info {
        title: options.title.clone(),
        version: options.version.clone(),
        description: options.description.clone(),
    });
    document.servers = options.servers.clone();

    for route in &manifest.routes {
        for (path, method, operation) in processor.process(route) {
            let item = document.paths.entry(path.clone()).or_default();
            let slot = item.slot(method);
            if slot.is_some() {
                warn!(
                    path = %path,
                    method = method.as_str(),
                    handler = %route.handler,
                    "Duplicate route, keeping the first declaration."
                );
                continue;
            }
            for tag in &operation.tags {
                if !document.tags.iter().any(|t| &t.name == tag) {
                    document.tags.push(Tag {
                        name: tag.clone(),
                        description: None,
                    });
                }
            }
            *slot = Some(operation);
        }
    }

    let schemas = processor.into_named_schemas();
    info!(
        paths = document.paths.len(),
        schemas = schemas.len(),
        "Assembled OpenAPI document."
    );
    if !schemas.is_empty() {
        document.components = Some(Components {
            schemas,
            ..Components::default()
        });
    }
    document
}

pub struct OperationProcessor<'a> {
    registry: &'a TypeRegistry,
    schemas: SchemaProcessor<'a>,
    versioning: &'a Versioning,
}

impl<'a> OperationProcessor<'a> {
    pub fn new(registry: &'a TypeRegistry, versioning: &'a Versioning) -> Self {
        Self {
            registry,
            schemas: SchemaProcessor::new(registry),
            versioning,
        }
    }

    pub fn into_named_schemas(self) -> IndexMap<String, Schema> {
        self.schemas.into_named_schemas()
    }

    /// Expand one route into `(path, method, operation)` triples, one per version.
    pub fn process(&mut self, route: &RouteRecord) -> Vec<(String, HttpMethod, Operation)> {
        let path = to_openapi_path(&route.path);
        let mut operation = self.build_operation(route, &path);

        if route.versions.is_empty() {
            return vec![(path, route.method, operation)];
        }

        match self.versioning.mode {
            VersioningMode::Uri => route
                .versions
                .iter()
                .map(|version| {
                    let segment = version_segment(&self.versioning.prefix, version);
                    let versioned_path = if path == "/" {
                        format!("/{segment}")
                    } else {
                        format!("/{segment}{path}")
                    };
                    let mut operation = operation.clone();
                    operation.operation_id = operation
                        .operation_id
                        .map(|id| format!("{id}_{}", identifier_suffix(&segment)));
                    (versioned_path, route.method, operation)
                })
                .collect(),
            VersioningMode::Header => {
                let versions = route
                    .versions
                    .iter()
                    .map(|v| Value::String(v.clone()))
                    .collect();
                operation.parameters.push(Parameter {
                    name: self.versioning.header_name.clone(),
                    location: ParameterLocation::Header,
                    description: Some("API version selector".to_string()),
                    required: Some(true),
                    deprecated: None,
                    style: None,
                    explode: None,
                    schema: Some(Schema {
                        enum_values: Some(versions),
                        ..Schema::of_type("string")
                    }),
                });
                vec![(path, route.method, operation)]
            }
        }
    }

    fn build_operation(&mut self, route: &RouteRecord, path: &str) -> Operation {
        let mut operation = Operation {
            tags: if route.tags.is_empty() {
                vec![route.controller.clone()]
            } else {
                route.tags.clone()
            },
            summary: route.summary.clone(),
            description: route.description.clone(),
            operation_id: Some(format!("{}_{}", route.controller, route.handler)),
            deprecated: route.deprecated.then_some(true),
            security: (!route.security.is_empty()).then(|| route.security.clone()),
            ..Operation::default()
        };
        operation.extensions.insert(
            CONTROLLER_EXTENSION.to_string(),
            Value::String(route.controller.clone()),
        );
        operation.extensions.insert(
            METHOD_EXTENSION.to_string(),
            Value::String(route.handler.clone()),
        );

        let mut bodies = Vec::new();
        let mut parameters = Vec::new();
        for parameter in &route.parameters {
            let location = match parameter.category {
                ParameterCategory::Body => {
                    bodies.push(parameter);
                    continue;
                }
                ParameterCategory::Query => ParameterLocation::Query,
                ParameterCategory::Param => ParameterLocation::Path,
                ParameterCategory::Headers => ParameterLocation::Header,
            };
            parameters.extend(self.expand_parameter(parameter, location));
        }

        let declared: HashSet<&str> = parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
            .map(|p| p.name.as_str())
            .collect();
        let synthesized: Vec<Parameter> = path_placeholders(path)
            .into_iter()
            .filter(|name| !declared.contains(name.as_str()))
            .map(|name| {
                debug!(path, parameter = %name, "Synthesizing undeclared path parameter.");
                Parameter {
                    name,
                    location: ParameterLocation::Path,
                    description: None,
                    required: Some(true),
                    deprecated: None,
                    style: None,
                    explode: None,
                    schema: Some(Schema::of_type("string")),
                }
            })
            .collect();
        operation.parameters = synthesized.into_iter().chain(parameters).collect();

        if !bodies.is_empty() {
            operation.request_body = Some(self.request_body(route, &bodies));
        }
        operation.responses = self.responses(route);
        operation
    }

    fn expand_parameter(
        &mut self,
        parameter: &RouteParameter,
        location: ParameterLocation,
    ) -> Vec<Parameter> {
        if let Some(name) = &parameter.name {
            return vec![self.parameter(
                name,
                location,
                &parameter.metadata,
                parameter.is_required(),
                parameter.description.clone(),
            )];
        }

        let Some(object) = resolve_object(self.registry, &parameter.metadata) else {
            debug!(
                location = ?location,
                "Unnamed parameter is not an object, nothing to decompose."
            );
            return Vec::new();
        };
        object
            .properties
            .iter()
            .map(|property| {
                self.parameter(
                    &property.name,
                    location,
                    &property.metadata,
                    property.required,
                    property.description.clone(),
                )
            })
            .collect()
    }

    fn parameter(
        &mut self,
        name: &str,
        location: ParameterLocation,
        metadata: &Metadata,
        required: bool,
        description: Option<String>,
    ) -> Parameter {
        let schema = self.schemas.convert(metadata);
        let repeated = location == ParameterLocation::Query && is_array_schema(&schema);
        Parameter {
            name: name.to_string(),
            location,
            description,
            required: Some(required || location == ParameterLocation::Path),
            deprecated: None,
            style: repeated.then(|| "form".to_string()),
            explode: repeated.then_some(true),
            schema: Some(schema),
        }
    }

    fn request_body(&mut self, route: &RouteRecord, bodies: &[&RouteParameter]) -> RequestBody {
        let schema = match bodies {
            [single] if single.name.is_none() => self.schemas.convert(&single.metadata),
            _ => {
                // Named body fields form one object.
                let mut properties = IndexMap::new();
                let mut required = Vec::new();
                for body in bodies {
                    let Some(name) = &body.name else {
                        debug!(handler = %route.handler, "Ignoring unnamed body next to named fields.");
                        continue;
                    };
                    if body.is_required() {
                        required.push(name.clone());
                    }
                    properties.insert(name.clone(), self.schemas.convert(&body.metadata));
                }
                Schema {
                    properties: Some(properties),
                    required: (!required.is_empty()).then_some(required),
                    ..Schema::of_type("object")
                }
            }
        };

        let binary = bodies
            .iter()
            .any(|b| contains_binary(self.registry, &b.metadata));
        let content_type = route.content_type.clone().unwrap_or_else(|| {
            if binary {
                "multipart/form-data".to_string()
            } else {
                "application/json".to_string()
            }
        });

        let mut content = IndexMap::new();
        content.insert(
            content_type,
            MediaType {
                schema: Some(schema),
                ..MediaType::default()
            },
        );
        RequestBody {
            description: None,
            content,
            required: Some(bodies.iter().any(|b| b.is_required())),
        }
    }

    fn responses(&mut self, route: &RouteRecord) -> IndexMap<String, Response> {
        let void = route.returns.as_ref().map_or(true, Metadata::is_void);
        let status = route.status.unwrap_or(match route.method {
            HttpMethod::Post => 201,
            _ if void && !route.sse => 204,
            _ => 200,
        });
        let description = reason_phrase(status);

        let success = if route.sse {
            self.stream_response(route, description)
        } else {
            match &route.returns {
                Some(returns) if !void => {
                    Response::json(description, self.schemas.convert(returns))
                }
                _ => Response::description_only(description),
            }
        };

        let mut responses = IndexMap::new();
        responses.insert(status.to_string(), success);
        for error in &route.errors {
            let description = error
                .description
                .clone()
                .unwrap_or_else(|| reason_phrase(error.status).to_string());
            let response = match &error.metadata {
                Some(metadata) => Response::json(description, self.schemas.convert(metadata)),
                None => Response::description_only(description),
            };
            responses.insert(error.status.to_string(), response);
        }
        responses
    }

    fn stream_response(&mut self, route: &RouteRecord, description: &str) -> Response {
        let item_schema = match route.events.as_slice() {
            [] => {
                let data = route
                    .returns
                    .as_ref()
                    .map(|r| self.schemas.convert(r))
                    .unwrap_or_default();
                event_branch(None, data)
            }
            [single] => {
                let data = self.schemas.convert(&single.data);
                event_branch(Some(single.name.as_str()), data)
            }
            events => {
                let mut branches: Vec<Schema> = events
                    .iter()
                    .map(|event| {
                        let data = self.schemas.convert(&event.data);
                        event_branch(Some(event.name.as_str()), data)
                    })
                    .collect();
                branches.push(event_branch(Some("error"), stream_error_schema()));
                Schema {
                    one_of: Some(branches),
                    discriminator: Some(Discriminator {
                        property_name: "event".to_string(),
                        mapping: None,
                    }),
                    ..Schema::default()
                }
            }
        };

        let mut content = IndexMap::new();
        content.insert(
            "text/event-stream".to_string(),
            MediaType {
                item_schema: Some(item_schema),
                ..MediaType::default()
            },
        );
        Response {
            description: description.to_string(),
            content: Some(content),
        }
    }
}

/// One server-sent message: optional `event` name plus JSON `data`.
fn event_branch(event: Option<&str>, data: Schema) -> Schema {
    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    if let Some(event) = event {
        properties.insert(
            "event".to_string(),
            Schema {
                const_value: Some(json!(event)),
                ..Schema::of_type("string")
            },
        );
        required.push("event".to_string());
    }
    properties.insert(
        "data".to_string(),
        Schema {
            content_media_type: Some("application/json".to_string()),
            content_schema: Some(Box::new(data)),
            ..Schema::of_type("string")
        },
    );
    required.push("data".to_string());
    properties.insert("id".to_string(), Schema::of_type("string"));

    Schema {
        properties: Some(properties),
        required: Some(required),
        ..Schema::of_type("object")
    }
}

fn stream_error_schema() -> Schema {
    let mut properties = IndexMap::new();
    properties.insert("message".to_string(), Schema::of_type("string"));
    properties.insert("code".to_string(), Schema::of_type("string"));
    Schema {
        properties: Some(properties),
        required: Some(vec!["message".to_string()]),
        ..Schema::of_type("object")
    }
}

fn is_array_schema(schema: &Schema) -> bool {
    schema.is_array() || schema.any_of.iter().flatten().any(Schema::is_array)
}

/// Follow refs until an object type is found.
fn resolve_object<'m>(registry: &'m TypeRegistry, metadata: &'m Metadata) -> Option<&'m ObjectType> {
    let mut current = metadata;
    let mut seen = HashSet::new();
    loop {
        match &current.kind {
            TypeKind::Object(object) => return Some(object),
            TypeKind::Ref { target } => {
                if !seen.insert(target.as_str()) {
                    return None;
                }
                current = registry.get(target)?;
            }
            _ => return None,
        }
    }
}

fn contains_binary(registry: &TypeRegistry, metadata: &Metadata) -> bool {
    metadata.is_binary_native()
        || resolve_object(registry, metadata).is_some_and(|object| {
            object
                .properties
                .iter()
                .any(|p| p.metadata.is_binary_native())
        })
}

fn version_segment(prefix: &str, version: &str) -> String {
    if version.starts_with(prefix) {
        version.to_string()
    } else {
        format!("{prefix}{version}")
    }
}

fn identifier_suffix(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `/users/:id/files/*` -> `/users/{id}/files/{path}`
pub fn to_openapi_path(path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{}}}", name.trim_end_matches('?'))
            } else if segment == "*" {
                "{path}".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect();
    format!("/{}", segments.join("/"))
}

/// Placeholder names of an OpenAPI path template, in order.
pub fn path_placeholders(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + 1 + len];
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &rest[start + 1 + len + 1..];
    }
    names
}

pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        410 => "Gone",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        100..=199 => "Informational",
        200..=299 => "Success",
        300..=399 => "Redirection",
        400..=499 => "Client Error",
        _ => "Server Error",
    }
}
