use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Validation rules attached to a type or property.
///
/// These are carried into the emitted schema as data and never evaluated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Constraints {
    // numeric
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
    pub numeric_type: Option<NumericType>,

    // string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<StringTransform>,

    // array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    pub coerce: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_validator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Constraint keyword to user-facing message.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub error_messages: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericType {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl NumericType {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            NumericType::Int32 | NumericType::Int64 | NumericType::Uint32 | NumericType::Uint64
        )
    }

    /// OpenAPI `format` for this numeric type.
    pub fn format(self) -> &'static str {
        match self {
            NumericType::Int32 | NumericType::Uint32 => "int32",
            NumericType::Int64 | NumericType::Uint64 => "int64",
            NumericType::Float => "float",
            NumericType::Double => "double",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StringTransform {
    Trim,
    ToLowerCase,
    ToUpperCase,
}

impl Constraints {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merged(&self, other: &Constraints) -> Constraints {
        let mut out = self.clone();
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { out.$field = other.$field.clone(); })*
            };
        }
        overlay!(
            minimum,
            maximum,
            exclusive_minimum,
            exclusive_maximum,
            multiple_of,
            numeric_type,
            min_length,
            max_length,
            format,
            pattern,
            starts_with,
            ends_with,
            includes,
            min_items,
            max_items,
            unique_items,
            custom_validator,
            default
        );
        for transform in &other.transforms {
            if !out.transforms.contains(transform) {
                out.transforms.push(*transform);
            }
        }
        out.coerce |= other.coerce;
        for (key, message) in &other.error_messages {
            out.error_messages.insert(key.clone(), message.clone());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_prefers_overlay() {
        let base = Constraints {
            min_length: Some(1),
            max_length: Some(10),
            ..Constraints::default()
        };
        let overlay = Constraints {
            max_length: Some(5),
            coerce: true,
            transforms: vec![StringTransform::Trim],
            ..Constraints::default()
        };

        let merged = base.merged(&overlay);
        assert_eq!(merged.min_length, Some(1));
        assert_eq!(merged.max_length, Some(5));
        assert!(merged.coerce);
        assert_eq!(merged.transforms, vec![StringTransform::Trim]);
    }

    #[test]
    fn test_numeric_type_format() {
        assert!(NumericType::Uint32.is_integer());
        assert!(!NumericType::Double.is_integer());
        assert_eq!(NumericType::Uint64.format(), "int64");
        assert_eq!(NumericType::Float.format(), "float");
    }
}
