//! Normalized type metadata produced by the upstream analyzer.
//!
//! Every node is a [`Metadata`]: a [`TypeKind`] payload plus the modifiers that
//! apply to every kind. Kind-specific fields only exist on their variant.

mod constraints;
mod registry;

pub use constraints::{Constraints, NumericType, StringTransform};
pub use registry::TypeRegistry;

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(flatten)]
    pub kind: TypeKind,

    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    /// Source-level type name. Named types are registered once and referenced by `$ref`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    Any,
    Unknown,
    Never,
    Void,
    Atomic {
        atomic: Atomic,
    },
    Literal {
        value: Value,
    },
    Object(ObjectType),
    Array {
        element: Box<Metadata>,
    },
    Tuple {
        elements: Vec<TupleElement>,
    },
    Union {
        members: Vec<Metadata>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        discriminant: Option<Discriminant>,
    },
    Intersection {
        members: Vec<Metadata>,
    },
    Enum {
        members: Vec<EnumMember>,
    },
    Native {
        native: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_args: Vec<Metadata>,
    },
    Ref {
        target: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Atomic {
    String,
    Number,
    Boolean,
    Bigint,
    Null,
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    #[default]
    Strip,
    Strict,
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectType {
    #[serde(default)]
    pub properties: Vec<Property>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_signature: Option<IndexSignature>,

    #[serde(default)]
    pub strictness: Strictness,
}

/// `{ [key: K]: V }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSignature {
    pub key: Box<Metadata>,
    pub value: Box<Metadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,

    #[serde(rename = "type")]
    pub metadata: Metadata,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub write_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleElement {
    #[serde(rename = "type")]
    pub metadata: Metadata,

    #[serde(default)]
    pub optional: bool,

    /// `...T[]` tail. Its metadata is the array type, not the element type.
    #[serde(default)]
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: Value,
}

/// A union whose members share one literal-valued property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminant {
    pub property: String,
    /// Literal discriminator value to member index.
    pub mapping: indexmap::IndexMap<String, usize>,
}

impl Metadata {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: false,
            optional: false,
            name: None,
            description: None,
            constraints: None,
        }
    }

    pub fn atomic(atomic: Atomic) -> Self {
        Self::new(TypeKind::Atomic { atomic })
    }

    pub fn string() -> Self {
        Self::atomic(Atomic::String)
    }

    pub fn number() -> Self {
        Self::atomic(Atomic::Number)
    }

    pub fn boolean() -> Self {
        Self::atomic(Atomic::Boolean)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::new(TypeKind::Literal {
            value: value.into(),
        })
    }

    pub fn object(properties: Vec<Property>) -> Self {
        Self::new(TypeKind::Object(ObjectType {
            properties,
            ..ObjectType::default()
        }))
    }

    pub fn array(element: Metadata) -> Self {
        Self::new(TypeKind::Array {
            element: Box::new(element),
        })
    }

    pub fn union(members: Vec<Metadata>) -> Self {
        Self::new(TypeKind::Union {
            members,
            discriminant: None,
        })
    }

    pub fn native(native: &str, type_args: Vec<Metadata>) -> Self {
        Self::new(TypeKind::Native {
            native: native.to_string(),
            type_args,
        })
    }

    pub fn reference(target: &str) -> Self {
        Self::new(TypeKind::Ref {
            target: target.to_string(),
        })
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, TypeKind::Literal { .. })
    }

    pub fn is_void(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Void
                | TypeKind::Atomic {
                    atomic: Atomic::Undefined
                }
        )
    }

    /// True for natives that travel as raw bytes (uploads, buffers).
    pub fn is_binary_native(&self) -> bool {
        match &self.kind {
            TypeKind::Native { native, .. } => {
                matches!(native.as_str(), "File" | "Blob" | "Buffer" | "ArrayBuffer")
            }
            TypeKind::Array { element } => element.is_binary_native(),
            _ => false,
        }
    }
}

impl Property {
    pub fn new(name: &str, metadata: Metadata) -> Self {
        Self {
            name: name.to_string(),
            metadata,
            required: false,
            readonly: false,
            write_only: false,
            description: None,
            example: None,
            constraints: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
