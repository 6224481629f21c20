//! Structural fingerprints of object schemas.
//!
//! Producers often inline a copy of a component instead of writing `$ref`.
//! Each component object gets a canonical string built from its sorted
//! property names, their required flags and the full fingerprint of every
//! property value (including `$ref` targets), so wrappers that share property
//! names but wrap different element types never match each other.
//!
//! Lookups canonicalize bottom-up: a nested inline object that matches a
//! component fingerprints as `$Component`, so an inline wrapper around an
//! inline element still finds the component that wraps a `$ref`.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::parsers::{AdditionalNode, ComponentSchema, PrimitiveKind, SchemaNode};

/// Canonical structural description of `node`.
pub fn fingerprint(node: &SchemaNode) -> String {
    canonical(node, &|_: &str| None)
}

/// Fingerprint of `node`, with nested objects replaced by `$name` wherever
/// `resolve` knows them.
fn canonical(node: &SchemaNode, resolve: &dyn Fn(&str) -> Option<String>) -> String {
    let nested = |child: &SchemaNode| nested_key(child, resolve);
    match node {
        SchemaNode::Ref(name) => format!("${name}"),
        SchemaNode::Primitive { kind, format } => {
            let kind = match kind {
                PrimitiveKind::String => "string",
                PrimitiveKind::Number => "number",
                PrimitiveKind::Integer => "integer",
                PrimitiveKind::Boolean => "boolean",
                PrimitiveKind::Null => "null",
            };
            match format {
                Some(format) => format!("{kind}({format})"),
                None => kind.to_string(),
            }
        }
        SchemaNode::Binary => "binary".to_string(),
        SchemaNode::Const(value) => format!("const({value})"),
        SchemaNode::Enum(values) => {
            let values: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("enum({})", values.join(","))
        }
        SchemaNode::Array(item) => format!("[{}]", nested(&**item)),
        SchemaNode::Tuple { prefix, rest } => {
            let mut parts: Vec<String> = prefix.iter().map(nested).collect();
            if let Some(rest) = rest {
                parts.push(format!("...{}", nested(&**rest)));
            }
            format!("tuple({})", parts.join(","))
        }
        SchemaNode::Object {
            properties,
            additional,
        } => {
            let mut fields: Vec<String> = properties
                .iter()
                .map(|p| {
                    let marker = if p.required { "!" } else { "?" };
                    format!("{}{marker}:{}", p.name, nested(&p.node))
                })
                .collect();
            fields.sort();
            let additional = match additional {
                None => String::new(),
                Some(AdditionalNode::Any) => "|*".to_string(),
                Some(AdditionalNode::Forbidden) => "|closed".to_string(),
                Some(AdditionalNode::Schema(node)) => format!("|*:{}", nested(&**node)),
            };
            format!("{{{}{additional}}}", fields.join(","))
        }
        SchemaNode::Union { variants, .. } => {
            let parts: Vec<String> = variants.iter().map(nested).collect();
            format!("anyOf({})", parts.join(","))
        }
        SchemaNode::Intersection(members) => {
            let parts: Vec<String> = members.iter().map(nested).collect();
            format!("allOf({})", parts.join(","))
        }
        SchemaNode::Unknown => "unknown".to_string(),
    }
}

fn nested_key(child: &SchemaNode, resolve: &dyn Fn(&str) -> Option<String>) -> String {
    let own = canonical(child, resolve);
    if is_matchable(child) {
        if let Some(name) = resolve(&own) {
            return format!("${name}");
        }
    }
    own
}

/// Objects without declared properties carry too little structure to match on.
fn is_matchable(node: &SchemaNode) -> bool {
    matches!(node, SchemaNode::Object { properties, .. } if !properties.is_empty())
}

/// Fingerprint to component name, over every object component.
#[derive(Debug, Clone, Default)]
pub struct FingerprintIndex {
    names: HashMap<String, String>,
}

impl FingerprintIndex {
    pub fn build(components: &IndexMap<String, ComponentSchema>) -> Self {
        let mut index = Self::default();
        for (name, component) in components {
            if !is_matchable(&component.node) {
                continue;
            }
            let key = fingerprint(&component.node);
            match index.names.get(&key) {
                Some(existing) => debug!(
                    component = %name,
                    existing = %existing,
                    "Structurally identical component, keeping the first name."
                ),
                None => {
                    index.names.insert(key, name.clone());
                }
            }
        }

        // Components that inline another component also match by its name.
        let mut canonical_names = Vec::new();
        for (name, component) in components {
            if is_matchable(&component.node) {
                canonical_names.push((index.canonical_key(&component.node), name.clone()));
            }
        }
        for (key, name) in canonical_names {
            index.names.entry(key).or_insert(name);
        }
        index
    }

    fn canonical_key(&self, node: &SchemaNode) -> String {
        canonical(node, &|key: &str| self.names.get(key).cloned())
    }

    /// Component name for an inline object structurally identical to it.
    pub fn lookup(&self, node: &SchemaNode) -> Option<&str> {
        if !is_matchable(node) {
            return None;
        }
        self.names
            .get(&self.canonical_key(node))
            .or_else(|| self.names.get(&fingerprint(node)))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
