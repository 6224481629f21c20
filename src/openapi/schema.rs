//! JSON Schema subset used inside OpenAPI 3.1 documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub const COMPONENTS_PREFIX: &str = "#/components/schemas/";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_items: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_media_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_schema: Option<Box<Schema>>,

    /// `x-` vendor extensions.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// A single type name or a list (`["string", "null"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<IndexMap<String, String>>,
}

impl Schema {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(SchemaType::Single(schema_type.to_string())),
            ..Self::default()
        }
    }

    pub fn with_format(schema_type: &str, format: &str) -> Self {
        Self {
            format: Some(format.to_string()),
            ..Self::of_type(schema_type)
        }
    }

    /// `{"$ref": "#/components/schemas/<name>"}`
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(component_ref(name)),
            ..Self::default()
        }
    }

    pub fn array_of(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type("array")
        }
    }

    /// `{"anyOf": [self, {"type": "null"}]}`
    pub fn nullable(self) -> Self {
        Self {
            any_of: Some(vec![self, Self::of_type("null")]),
            ..Self::default()
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(&self.schema_type, Some(SchemaType::Single(t)) if t == "array")
    }

    /// The component name this schema points at, if it is a local `$ref`.
    pub fn ref_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(COMPONENTS_PREFIX))
    }
}

pub fn component_ref(name: &str) -> String {
    format!("{COMPONENTS_PREFIX}{name}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nullable_ref_serialization() {
        let schema = Schema::reference("User").nullable();
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({ "anyOf": [{ "$ref": "#/components/schemas/User" }, { "type": "null" }] })
        );
    }

    #[test]
    fn test_additional_properties_bool_or_schema() {
        let closed: Schema =
            serde_json::from_value(json!({ "type": "object", "additionalProperties": false }))
                .unwrap();
        assert_eq!(
            closed.additional_properties,
            Some(AdditionalProperties::Bool(false))
        );

        let typed: Schema = serde_json::from_value(
            json!({ "type": "object", "additionalProperties": { "type": "number" } }),
        )
        .unwrap();
        assert!(matches!(
            typed.additional_properties,
            Some(AdditionalProperties::Schema(_))
        ));
    }

    #[test]
    fn test_extensions_and_numbers_survive() {
        let raw = r#"{"type":"integer","minimum":1,"maximum":2.5,"x-internal":true}"#;
        let schema: Schema = serde_json::from_str(raw).unwrap();
        assert_eq!(schema.extensions.get("x-internal"), Some(&json!(true)));
        assert_eq!(serde_json::to_string(&schema).unwrap(), raw);
    }

    #[test]
    fn test_ref_name() {
        assert_eq!(Schema::reference("Pet").ref_name(), Some("Pet"));
        assert_eq!(Schema::of_type("string").ref_name(), None);
    }
}
