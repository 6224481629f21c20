use indexmap::IndexMap;
use serde_json::Value;

use crate::openapi::{HttpMethod, ParameterLocation};

/// Everything the reverse compiler needs from one OpenAPI document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedDocument {
    pub info: DocumentInfo,
    /// Component schemas in document order.
    pub components: IndexMap<String, ComponentSchema>,
    pub operations: Vec<ParsedOperation>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub node: SchemaNode,
}

/// Simplified schema tree. Only the shapes a type declaration can express.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Component name, without the `#/components/schemas/` prefix.
    Ref(String),
    Primitive {
        kind: PrimitiveKind,
        format: Option<String>,
    },
    /// `format: binary` strings and binary media.
    Binary,
    Const(Value),
    Enum(Vec<Value>),
    Array(Box<SchemaNode>),
    Tuple {
        prefix: Vec<SchemaNode>,
        rest: Option<Box<SchemaNode>>,
    },
    Object {
        properties: Vec<PropertyNode>,
        additional: Option<AdditionalNode>,
    },
    Union {
        variants: Vec<SchemaNode>,
        /// `discriminator.propertyName`
        discriminator: Option<String>,
    },
    Intersection(Vec<SchemaNode>),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub name: String,
    pub node: SchemaNode,
    pub required: bool,
    pub description: Option<String>,
    pub read_only: bool,
}

/// `additionalProperties`
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalNode {
    /// `true` or `{}`
    Any,
    /// `false`
    Forbidden,
    Schema(Box<SchemaNode>),
}

impl SchemaNode {
    pub fn string() -> Self {
        SchemaNode::Primitive {
            kind: PrimitiveKind::String,
            format: None,
        }
    }

    pub fn null() -> Self {
        SchemaNode::Primitive {
            kind: PrimitiveKind::Null,
            format: None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, SchemaNode::Object { .. })
    }

    /// Visit every node of the tree, depth first, parents before children.
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut SchemaNode)) {
        visit(self);
        match self {
            SchemaNode::Array(item) => item.walk_mut(visit),
            SchemaNode::Tuple { prefix, rest } => {
                for node in prefix {
                    node.walk_mut(visit);
                }
                if let Some(rest) = rest {
                    rest.walk_mut(visit);
                }
            }
            SchemaNode::Object {
                properties,
                additional,
            } => {
                for property in properties {
                    property.node.walk_mut(visit);
                }
                if let Some(AdditionalNode::Schema(node)) = additional {
                    node.walk_mut(visit);
                }
            }
            SchemaNode::Union { variants, .. } => {
                for node in variants {
                    node.walk_mut(visit);
                }
            }
            SchemaNode::Intersection(members) => {
                for node in members {
                    node.walk_mut(visit);
                }
            }
            SchemaNode::Ref(_)
            | SchemaNode::Primitive { .. }
            | SchemaNode::Binary
            | SchemaNode::Const(_)
            | SchemaNode::Enum(_)
            | SchemaNode::Unknown => {}
        }
    }
}

impl ParsedDocument {
    /// Visit every schema node in components and operations.
    pub fn walk_nodes_mut(&mut self, visit: &mut dyn FnMut(&mut SchemaNode)) {
        for component in self.components.values_mut() {
            component.node.walk_mut(visit);
        }
        for operation in &mut self.operations {
            for parameter in &mut operation.parameters {
                parameter.node.walk_mut(visit);
            }
            if let Some(body) = &mut operation.body {
                body.content.walk_mut(visit);
            }
            operation.response.walk_mut(visit);
        }
    }
}

impl Content {
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut SchemaNode)) {
        match self {
            Content::Json(node) | Content::Multipart(node) => node.walk_mut(visit),
            Content::EventStream(StreamPayload::Typed(node)) => node.walk_mut(visit),
            Content::EventStream(StreamPayload::Events(events)) => {
                for (_, node) in events {
                    node.walk_mut(visit);
                }
            }
            Content::EventStream(StreamPayload::Raw)
            | Content::Empty
            | Content::Text
            | Content::Binary => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOperation {
    /// Identifier of the generated function.
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    /// Grouping key for the generated controller file.
    pub controller: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub parameters: Vec<ParsedParameter>,
    pub body: Option<ParsedBody>,
    pub response: Content,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: Option<String>,
    pub node: SchemaNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBody {
    pub content: Content,
    pub required: bool,
}

/// Payload of a request or response, classified by media type.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// No body (`204`, or no content declared).
    Empty,
    Json(SchemaNode),
    Text,
    Binary,
    Multipart(SchemaNode),
    EventStream(StreamPayload),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamPayload {
    /// One payload type for every message.
    Typed(SchemaNode),
    /// Per-event payloads keyed by event name.
    Events(Vec<(String, SchemaNode)>),
    /// No item schema: raw bytes.
    Raw,
}
