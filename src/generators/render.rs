//! Schema nodes to TypeScript type expressions and declarations.

use indexmap::IndexMap;

use super::fingerprint::FingerprintIndex;
use super::naming::{literal_type, quote_if_needed, summary_comment};
use crate::parsers::{AdditionalNode, ComponentSchema, PrimitiveKind, PropertyNode, SchemaNode};

pub struct TypeRenderer<'a> {
    index: &'a FingerprintIndex,
    /// Built-in names shadowed by a component; references to the built-in are qualified.
    shadowed: &'a IndexMap<String, String>,
}

impl<'a> TypeRenderer<'a> {
    pub fn new(index: &'a FingerprintIndex, shadowed: &'a IndexMap<String, String>) -> Self {
        Self { index, shadowed }
    }

    /// A global type name that a component might shadow.
    pub fn builtin(&self, name: &str) -> String {
        if self.shadowed.contains_key(name) {
            format!("globalThis.{name}")
        } else {
            name.to_string()
        }
    }

    /// Type expression for an inline use site.
    pub fn render(&self, node: &SchemaNode) -> String {
        match node {
            SchemaNode::Ref(name) => name.clone(),
            SchemaNode::Primitive { kind, .. } => match kind {
                PrimitiveKind::String => "string",
                PrimitiveKind::Number | PrimitiveKind::Integer => "number",
                PrimitiveKind::Boolean => "boolean",
                PrimitiveKind::Null => "null",
            }
            .to_string(),
            SchemaNode::Binary => self.builtin("Blob"),
            SchemaNode::Const(value) => literal_type(value),
            SchemaNode::Enum(values) if values.is_empty() => "never".to_string(),
            SchemaNode::Enum(values) => join_unique(values.iter().map(literal_type), " | "),
            SchemaNode::Array(item) => self.render_array(item),
            SchemaNode::Tuple { prefix, rest } => {
                let mut parts: Vec<String> = prefix.iter().map(|n| self.render(n)).collect();
                if let Some(rest) = rest {
                    parts.push(format!("...{}", self.render_array(rest)));
                }
                format!("[{}]", parts.join(", "))
            }
            SchemaNode::Object {
                properties,
                additional,
            } => match self.index.lookup(node) {
                Some(name) => name.to_string(),
                None => self.render_object_literal(properties, additional.as_ref()),
            },
            SchemaNode::Union { variants, .. } if variants.is_empty() => "never".to_string(),
            SchemaNode::Union { variants, .. } => {
                join_unique(variants.iter().map(|v| self.render(v)), " | ")
            }
            SchemaNode::Intersection(members) => join_unique(
                members.iter().map(|m| match m {
                    SchemaNode::Union { .. } => format!("({})", self.render(m)),
                    _ => self.render(m),
                }),
                " & ",
            ),
            SchemaNode::Unknown => "unknown".to_string(),
        }
    }

    fn render_array(&self, item: &SchemaNode) -> String {
        let rendered = self.render(item);
        let compound = match item {
            SchemaNode::Union { variants, .. } => variants.len() > 1,
            SchemaNode::Enum(values) => values.len() > 1,
            SchemaNode::Intersection(_) => true,
            _ => false,
        };
        if compound {
            format!("({rendered})[]")
        } else {
            format!("{rendered}[]")
        }
    }

    fn render_object_literal(
        &self,
        properties: &[PropertyNode],
        additional: Option<&AdditionalNode>,
    ) -> String {
        if properties.is_empty() {
            return match additional {
                // An alias over `Record<string, Self>` is circular; index signatures are not.
                Some(AdditionalNode::Schema(node)) if self.refers_to_component(node) => {
                    format!("{{ [key: string]: {} }}", self.render(node))
                }
                Some(AdditionalNode::Schema(node)) => {
                    format!("Record<string, {}>", self.render(node))
                }
                Some(AdditionalNode::Forbidden) => "Record<string, never>".to_string(),
                Some(AdditionalNode::Any) | None => "Record<string, unknown>".to_string(),
            };
        }

        let mut members: Vec<String> = properties
            .iter()
            .map(|p| {
                format!(
                    "{}{}{}: {}",
                    if p.read_only { "readonly " } else { "" },
                    quote_if_needed(&p.name),
                    if p.required { "" } else { "?" },
                    self.render(&p.node)
                )
            })
            .collect();
        if let Some(index) = self.index_signature(properties, additional) {
            members.push(format!("[key: string]: {index}"));
        }
        format!("{{ {} }}", members.join("; "))
    }

    /// True when the rendering of `node` names a component anywhere inside it.
    fn refers_to_component(&self, node: &SchemaNode) -> bool {
        match node {
            SchemaNode::Ref(_) => true,
            SchemaNode::Object {
                properties,
                additional,
            } => {
                let additional_refers = match additional {
                    Some(AdditionalNode::Schema(inner)) => self.refers_to_component(inner),
                    _ => false,
                };
                self.index.lookup(node).is_some()
                    || additional_refers
                    || properties.iter().any(|p| self.refers_to_component(&p.node))
            }
            SchemaNode::Array(item) => self.refers_to_component(item),
            SchemaNode::Tuple { prefix, rest } => {
                prefix.iter().any(|n| self.refers_to_component(n))
                    || rest.as_deref().is_some_and(|n| self.refers_to_component(n))
            }
            SchemaNode::Union { variants, .. } => {
                variants.iter().any(|v| self.refers_to_component(v))
            }
            SchemaNode::Intersection(members) => {
                members.iter().any(|m| self.refers_to_component(m))
            }
            _ => false,
        }
    }

    /// Index signature type, widened so every declared property stays assignable.
    fn index_signature(
        &self,
        properties: &[PropertyNode],
        additional: Option<&AdditionalNode>,
    ) -> Option<String> {
        match additional? {
            AdditionalNode::Forbidden => None,
            AdditionalNode::Any => Some("unknown".to_string()),
            AdditionalNode::Schema(node) => {
                let value = self.render(node);
                if value == "unknown" || properties.is_empty() {
                    return Some(value);
                }
                let types = std::iter::once(value)
                    .chain(properties.iter().map(|p| self.render(&p.node)));
                Some(join_unique(types, " | "))
            }
        }
    }

    /// `export interface` / `export type` for one component.
    pub fn declaration(&self, name: &str, component: &ComponentSchema) -> String {
        let mut out = summary_comment(
            component.title.as_deref(),
            component.description.as_deref(),
            "",
        );

        match &component.node {
            SchemaNode::Object {
                properties,
                additional,
            } if !properties.is_empty() => {
                out.push_str(&format!("export interface {name} {{\n"));
                for property in properties {
                    if let Some(description) = &property.description {
                        out.push_str(&summary_comment(None, Some(description.as_str()), "  "));
                    }
                    out.push_str(&format!(
                        "  {}{}{}: {};\n",
                        if property.read_only { "readonly " } else { "" },
                        quote_if_needed(&property.name),
                        if property.required { "" } else { "?" },
                        self.render(&property.node)
                    ));
                }
                if let Some(index) = self.index_signature(properties, additional.as_ref()) {
                    out.push_str(&format!("  [key: string]: {index};\n"));
                }
                out.push_str("}\n");
            }
            SchemaNode::Object {
                additional: Some(AdditionalNode::Forbidden),
                ..
            } => {
                out.push_str(&format!("export type {name} = Record<string, never>;\n"));
            }
            // Pure index signatures stay interfaces so they may refer to themselves.
            SchemaNode::Object { additional, .. } => {
                let value = match additional {
                    Some(AdditionalNode::Schema(node)) => self.render(node),
                    _ => "unknown".to_string(),
                };
                out.push_str(&format!(
                    "export interface {name} {{\n  [key: string]: {value};\n}}\n"
                ));
            }
            other => {
                out.push_str(&format!("export type {name} = {};\n", self.render(other)));
            }
        }
        out
    }
}

fn join_unique(parts: impl Iterator<Item = String>, separator: &str) -> String {
    let mut seen: Vec<String> = Vec::new();
    for part in parts {
        if !seen.contains(&part) {
            seen.push(part);
        }
    }
    seen.join(separator)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn property(name: &str, node: SchemaNode, required: bool) -> PropertyNode {
        PropertyNode {
            name: name.to_string(),
            node,
            required,
            description: None,
            read_only: false,
        }
    }

    fn component(node: SchemaNode) -> ComponentSchema {
        ComponentSchema {
            title: None,
            description: None,
            node,
        }
    }

    fn render(node: &SchemaNode) -> String {
        let index = FingerprintIndex::default();
        let shadowed = IndexMap::new();
        TypeRenderer::new(&index, &shadowed).render(node)
    }

    #[test]
    fn test_inline_expressions() {
        let nullable = SchemaNode::Union {
            variants: vec![SchemaNode::string(), SchemaNode::null()],
            discriminator: None,
        };
        assert_eq!(render(&nullable), "string | null");
        assert_eq!(
            render(&SchemaNode::Array(Box::new(nullable))),
            "(string | null)[]"
        );
        assert_eq!(
            render(&SchemaNode::Enum(vec![json!("a"), json!(1)])),
            "\"a\" | 1"
        );
        assert_eq!(render(&SchemaNode::Binary), "Blob");
        assert_eq!(
            render(&SchemaNode::Tuple {
                prefix: vec![SchemaNode::string()],
                rest: Some(Box::new(SchemaNode::Ref("Item".to_string()))),
            }),
            "[string, ...Item[]]"
        );
        assert_eq!(
            render(&SchemaNode::Object {
                properties: vec![],
                additional: Some(AdditionalNode::Schema(Box::new(SchemaNode::Ref(
                    "User".to_string()
                )))),
            }),
            "{ [key: string]: User }"
        );
        assert_eq!(
            render(&SchemaNode::Object {
                properties: vec![],
                additional: Some(AdditionalNode::Schema(Box::new(SchemaNode::string()))),
            }),
            "Record<string, string>"
        );
        assert_eq!(
            render(&SchemaNode::Object {
                properties: vec![
                    property("id", SchemaNode::string(), true),
                    property("x-rate", SchemaNode::string(), false),
                ],
                additional: None,
            }),
            "{ id: string; \"x-rate\"?: string }"
        );
    }

    #[test]
    fn test_shadowed_builtin_is_qualified() {
        let index = FingerprintIndex::default();
        let shadowed: IndexMap<String, String> =
            [("Blob".to_string(), "Blob_".to_string())].into_iter().collect();
        let renderer = TypeRenderer::new(&index, &shadowed);
        assert_eq!(renderer.render(&SchemaNode::Binary), "globalThis.Blob");
        assert_eq!(renderer.builtin("FormData"), "FormData");
    }

    #[test]
    fn test_interface_declaration() {
        let index = FingerprintIndex::default();
        let shadowed = IndexMap::new();
        let renderer = TypeRenderer::new(&index, &shadowed);
        let mut id = property("id", SchemaNode::string(), true);
        id.read_only = true;
        id.description = Some("Primary key".to_string());

        let declaration = renderer.declaration(
            "User",
            &ComponentSchema {
                title: Some("User".to_string()),
                description: Some("A registered account.".to_string()),
                node: SchemaNode::Object {
                    properties: vec![id, property("nickname", SchemaNode::string(), false)],
                    additional: None,
                },
            },
        );
        assert_eq!(
            declaration,
            "/**\n * User\n *\n * A registered account.\n */\nexport interface User {\n  /** Primary key */\n  readonly id: string;\n  nickname?: string;\n}\n"
        );
    }

    #[test]
    fn test_self_referential_map_is_an_interface() {
        let index = FingerprintIndex::default();
        let shadowed = IndexMap::new();
        let renderer = TypeRenderer::new(&index, &shadowed);
        let json_value = component(SchemaNode::Object {
            properties: vec![],
            additional: Some(AdditionalNode::Schema(Box::new(SchemaNode::Ref(
                "JsonMap".to_string(),
            )))),
        });

        assert_eq!(
            renderer.declaration("JsonMap", &json_value),
            "export interface JsonMap {\n  [key: string]: JsonMap;\n}\n"
        );
        assert_eq!(
            renderer.declaration(
                "Closed",
                &component(SchemaNode::Object {
                    properties: vec![],
                    additional: Some(AdditionalNode::Forbidden),
                })
            ),
            "export type Closed = Record<string, never>;\n"
        );
    }

    #[test]
    fn test_recursive_union_alias_uses_index_signature() {
        let index = FingerprintIndex::default();
        let shadowed = IndexMap::new();
        let renderer = TypeRenderer::new(&index, &shadowed);
        let json_value = || SchemaNode::Ref("JsonValue".to_string());
        let declaration = renderer.declaration(
            "JsonValue",
            &component(SchemaNode::Union {
                variants: vec![
                    SchemaNode::string(),
                    SchemaNode::Primitive {
                        kind: PrimitiveKind::Number,
                        format: None,
                    },
                    SchemaNode::Object {
                        properties: vec![],
                        additional: Some(AdditionalNode::Schema(Box::new(json_value()))),
                    },
                    SchemaNode::Array(Box::new(json_value())),
                ],
                discriminator: None,
            }),
        );

        assert_eq!(
            declaration,
            "export type JsonValue = string | number | { [key: string]: JsonValue } | JsonValue[];\n"
        );
        assert!(!declaration.contains("Record<"));
    }

    #[test]
    fn test_index_signature_widened_by_properties() {
        let index = FingerprintIndex::default();
        let shadowed = IndexMap::new();
        let renderer = TypeRenderer::new(&index, &shadowed);
        let declaration = renderer.declaration(
            "Counts",
            &component(SchemaNode::Object {
                properties: vec![property("label", SchemaNode::string(), true)],
                additional: Some(AdditionalNode::Schema(Box::new(SchemaNode::Primitive {
                    kind: PrimitiveKind::Integer,
                    format: None,
                }))),
            }),
        );
        assert!(declaration.contains("  [key: string]: number | string;\n"));
    }

    #[test]
    fn test_component_body_is_not_replaced_by_itself() {
        let body = SchemaNode::Object {
            properties: vec![property("id", SchemaNode::string(), true)],
            additional: None,
        };
        let components: IndexMap<String, ComponentSchema> =
            [("User".to_string(), component(body.clone()))].into_iter().collect();
        let index = FingerprintIndex::build(&components);
        let shadowed = IndexMap::new();
        let renderer = TypeRenderer::new(&index, &shadowed);

        assert_eq!(
            renderer.declaration("User", &components["User"]),
            "export interface User {\n  id: string;\n}\n"
        );
        assert_eq!(renderer.render(&SchemaNode::Array(Box::new(body))), "User[]");
    }
}
