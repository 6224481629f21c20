//! Forward compiler: type metadata to OpenAPI schema.
//!
//! Named objects, unions, intersections and enums are emitted once into the
//! named-schema table and referenced everywhere else through `$ref`. A
//! placeholder is inserted under the name before any child is converted, so a
//! type that refers to itself resolves to its own `$ref` instead of recursing.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::metadata::{
    Atomic, Constraints, Discriminant, Metadata, ObjectType, Strictness, TupleElement, TypeKind,
    TypeRegistry,
};
use crate::openapi::{AdditionalProperties, Discriminator, Schema, SchemaType};

const TYPED_ARRAYS: [&str; 11] = [
    "Int8Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "Int16Array",
    "Uint16Array",
    "Int32Array",
    "Uint32Array",
    "Float32Array",
    "Float64Array",
    "BigInt64Array",
    "BigUint64Array",
];

const BINARY_NATIVES: [&str; 5] = ["ArrayBuffer", "SharedArrayBuffer", "Blob", "File", "Buffer"];

pub struct SchemaProcessor<'a> {
    registry: &'a TypeRegistry,
    named: IndexMap<String, Schema>,
    /// Source type name to its component key.
    keys: HashMap<String, String>,
}

impl<'a> SchemaProcessor<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            named: IndexMap::new(),
            keys: HashMap::new(),
        }
    }

    /// Named schemas emitted so far, in first-registration order.
    pub fn named_schemas(&self) -> &IndexMap<String, Schema> {
        &self.named
    }

    pub fn into_named_schemas(self) -> IndexMap<String, Schema> {
        self.named
    }

    pub fn convert(&mut self, meta: &Metadata) -> Schema {
        let schema = match (&meta.kind, meta.name.as_deref()) {
            (TypeKind::Ref { target }, _) => self.convert_ref(target),
            (kind, Some(name)) if is_registrable(kind) => self.register_named(name, meta),
            _ => self.build_body(meta),
        };

        if meta.nullable {
            schema.nullable()
        } else {
            schema
        }
    }

    /// Component key for a source type name.
    ///
    /// Distinct source names that sanitize to the same key get a numeric suffix.
    fn key_for(&mut self, name: &str) -> String {
        if let Some(key) = self.keys.get(name) {
            return key.clone();
        }

        let base = component_name(name);
        let mut key = base.clone();
        let mut suffix = 2;
        while self.keys.values().any(|taken| *taken == key) {
            key = format!("{base}{suffix}");
            suffix += 1;
        }
        if key != base {
            warn!(
                source = %name,
                component = %key,
                "Component name already taken by another type, disambiguating."
            );
        }
        self.keys.insert(name.to_string(), key.clone());
        key
    }

    fn register_named(&mut self, name: &str, meta: &Metadata) -> Schema {
        let key = self.key_for(name);
        if self.named.contains_key(&key) {
            return Schema::reference(&key);
        }

        self.named.insert(key.clone(), Schema::default());
        let body = self.build_body(meta);
        self.named.insert(key.clone(), body);
        Schema::reference(&key)
    }

    fn convert_ref(&mut self, target: &str) -> Schema {
        let key = self.key_for(target);
        if self.named.contains_key(&key) {
            return Schema::reference(&key);
        }

        let registry = self.registry;
        let Some(resolved) = registry.get(target) else {
            debug!(reference = %target, "Unresolved type reference, emitting permissive schema.");
            return Schema::default();
        };

        self.named.insert(key.clone(), Schema::default());
        let mut body = self.build_body(resolved);
        if resolved.nullable {
            body = body.nullable();
        }
        self.named.insert(key.clone(), body);
        Schema::reference(&key)
    }

    /// The inline schema for `meta`, ignoring its name and nullability.
    fn build_body(&mut self, meta: &Metadata) -> Schema {
        let mut schema = match &meta.kind {
            TypeKind::Any | TypeKind::Unknown | TypeKind::Void => Schema::default(),
            TypeKind::Never => Schema {
                not: Some(Box::default()),
                ..Schema::default()
            },
            TypeKind::Atomic { atomic } => atomic_schema(*atomic),
            TypeKind::Literal { value } => Schema {
                const_value: Some(value.clone()),
                ..Schema::default()
            },
            TypeKind::Object(object) => self.build_object(object),
            TypeKind::Array { element } => Schema::array_of(self.convert(element)),
            TypeKind::Tuple { elements } => self.build_tuple(elements),
            TypeKind::Union {
                members,
                discriminant,
            } => self.build_union(members, discriminant.as_ref()),
            TypeKind::Intersection { members } => Schema {
                all_of: Some(members.iter().map(|m| self.convert(m)).collect()),
                ..Schema::default()
            },
            TypeKind::Enum { members } => Schema {
                enum_values: Some(members.iter().map(|m| m.value.clone()).collect()),
                ..Schema::default()
            },
            TypeKind::Native { native, type_args } => self.build_native(native, type_args),
            TypeKind::Ref { target } => self.convert_ref(target),
        };

        if let Some(description) = &meta.description {
            schema.description = Some(description.clone());
        }
        if let Some(constraints) = &meta.constraints {
            apply_constraints(&mut schema, constraints);
        }
        schema
    }

    fn build_object(&mut self, object: &ObjectType) -> Schema {
        let mut properties = IndexMap::new();
        let mut required = Vec::new();

        for property in &object.properties {
            let mut schema = self.convert(&property.metadata);
            if let Some(constraints) = &property.constraints {
                apply_constraints(&mut schema, constraints);
            }
            if property.readonly {
                schema.read_only = Some(true);
            }
            if property.write_only {
                schema.write_only = Some(true);
            }
            if let Some(description) = &property.description {
                schema.description = Some(description.clone());
            }
            if let Some(example) = &property.example {
                schema.example = Some(example.clone());
            }
            if property.required {
                required.push(property.name.clone());
            }
            properties.insert(property.name.clone(), schema);
        }

        let mut schema = Schema::of_type("object");
        if !properties.is_empty() {
            schema.properties = Some(properties);
        }
        if !required.is_empty() {
            schema.required = Some(required);
        }

        // A typed index signature wins over strictness.
        if let Some(index) = &object.index_signature {
            schema.additional_properties = Some(AdditionalProperties::Schema(Box::new(
                self.convert(&index.value),
            )));
        } else if object.strictness == Strictness::Strict {
            schema.additional_properties = Some(AdditionalProperties::Bool(false));
        }
        schema
    }

    fn build_tuple(&mut self, elements: &[TupleElement]) -> Schema {
        let mut prefix = Vec::new();
        let mut min_items = 0u64;
        let mut optional_seen = false;
        let mut rest = None;

        for element in elements {
            if element.rest {
                let item = match &element.metadata.kind {
                    TypeKind::Array { element } => self.convert(element),
                    _ => self.convert(&element.metadata),
                };
                rest = Some(item);
                continue;
            }
            optional_seen |= element.optional;
            if !optional_seen {
                min_items += 1;
            }
            prefix.push(self.convert(&element.metadata));
        }

        let mut schema = Schema::of_type("array");
        schema.min_items = Some(min_items);
        match rest {
            Some(item) => schema.items = Some(Box::new(item)),
            None => schema.max_items = Some(prefix.len() as u64),
        }
        if !prefix.is_empty() {
            schema.prefix_items = Some(prefix);
        }
        schema
    }

    fn build_union(&mut self, members: &[Metadata], discriminant: Option<&Discriminant>) -> Schema {
        let members: Vec<&Metadata> = members
            .iter()
            .filter(|m| {
                !matches!(
                    m.kind,
                    TypeKind::Atomic {
                        atomic: Atomic::Undefined
                    }
                )
            })
            .collect();

        if !members.is_empty() && members.iter().all(|m| m.is_literal()) {
            let mut values: Vec<Value> = Vec::new();
            for member in &members {
                if let TypeKind::Literal { value } = &member.kind {
                    if !values.contains(value) {
                        values.push(value.clone());
                    }
                }
            }
            return Schema {
                enum_values: Some(values),
                ..Schema::default()
            };
        }

        let schemas: Vec<Schema> = members.iter().map(|m| self.convert(m)).collect();

        if let Some(discriminant) = discriminant {
            let mut mapping = IndexMap::new();
            for (value, index) in &discriminant.mapping {
                match schemas.get(*index).and_then(|s| s.reference.clone()) {
                    Some(reference) => {
                        mapping.insert(value.clone(), reference);
                    }
                    None => debug!(
                        value = %value,
                        index,
                        "Discriminated member has no $ref, leaving it out of the mapping."
                    ),
                }
            }
            return Schema {
                one_of: Some(schemas),
                discriminator: Some(Discriminator {
                    property_name: discriminant.property.clone(),
                    mapping: (!mapping.is_empty()).then_some(mapping),
                }),
                ..Schema::default()
            };
        }

        if schemas.len() == 1 {
            return schemas.into_iter().next().unwrap_or_default();
        }
        Schema {
            any_of: Some(schemas),
            ..Schema::default()
        }
    }

    fn build_native(&mut self, native: &str, type_args: &[Metadata]) -> Schema {
        match native {
            "Date" => Schema::with_format("string", "date-time"),
            "RegExp" => Schema::with_format("string", "regex"),
            "URL" => Schema::with_format("string", "uri"),
            "Map" => {
                let value = type_args
                    .get(1)
                    .map(|v| AdditionalProperties::Schema(Box::new(self.convert(v))))
                    .unwrap_or(AdditionalProperties::Bool(true));
                Schema {
                    additional_properties: Some(value),
                    ..Schema::of_type("object")
                }
            }
            "Set" => {
                let item = type_args
                    .first()
                    .map(|t| self.convert(t))
                    .unwrap_or_default();
                Schema {
                    unique_items: Some(true),
                    ..Schema::array_of(item)
                }
            }
            "Promise" => type_args
                .first()
                .map(|t| self.convert(t))
                .unwrap_or_default(),
            "Error" => error_schema(),
            n if TYPED_ARRAYS.contains(&n) => Schema::array_of(Schema::of_type("number")),
            n if BINARY_NATIVES.contains(&n) => Schema::with_format("string", "binary"),
            other => {
                debug!(native = other, "Unknown native type, emitting bare object.");
                Schema::of_type("object")
            }
        }
    }
}

fn is_registrable(kind: &TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Object(_)
            | TypeKind::Union { .. }
            | TypeKind::Intersection { .. }
            | TypeKind::Enum { .. }
    )
}

fn atomic_schema(atomic: Atomic) -> Schema {
    match atomic {
        Atomic::String => Schema::of_type("string"),
        Atomic::Number => Schema::of_type("number"),
        Atomic::Boolean => Schema::of_type("boolean"),
        Atomic::Bigint => Schema::with_format("integer", "int64"),
        Atomic::Null => Schema::of_type("null"),
        Atomic::Undefined => Schema::default(),
    }
}

fn error_schema() -> Schema {
    let mut properties = IndexMap::new();
    properties.insert("message".to_string(), Schema::of_type("string"));
    properties.insert("name".to_string(), Schema::of_type("string"));
    Schema {
        properties: Some(properties),
        required: Some(vec!["message".to_string(), "name".to_string()]),
        ..Schema::of_type("object")
    }
}

/// Copy validation rules onto `schema`. Rules are carried as data only.
pub fn apply_constraints(schema: &mut Schema, constraints: &Constraints) {
    if let Some(numeric) = constraints.numeric_type {
        let is_numeric = matches!(
            &schema.schema_type,
            Some(SchemaType::Single(t)) if t == "number" || t == "integer"
        );
        if is_numeric {
            let base = if numeric.is_integer() {
                "integer"
            } else {
                "number"
            };
            schema.schema_type = Some(SchemaType::Single(base.to_string()));
            schema.format = Some(numeric.format().to_string());
        }
    }

    macro_rules! copy {
        ($($field:ident),*) => {
            $(if let Some(value) = &constraints.$field { schema.$field = Some(value.clone()); })*
        };
    }
    copy!(
        minimum,
        maximum,
        exclusive_minimum,
        exclusive_maximum,
        multiple_of,
        min_length,
        max_length,
        format,
        min_items,
        max_items,
        unique_items,
        default
    );

    if let Some(pattern) = &constraints.pattern {
        schema.pattern = Some(pattern.clone());
    } else if let Some(pattern) = content_pattern(constraints) {
        schema.pattern = Some(pattern);
    }

    if !constraints.transforms.is_empty() {
        schema
            .extensions
            .insert("x-typebridge-transforms".to_string(), json!(constraints.transforms));
    }
    if constraints.coerce {
        schema
            .extensions
            .insert("x-typebridge-coerce".to_string(), Value::Bool(true));
    }
    if let Some(validator) = &constraints.custom_validator {
        schema
            .extensions
            .insert("x-typebridge-validator".to_string(), json!(validator));
    }
    if !constraints.error_messages.is_empty() {
        schema.extensions.insert(
            "x-typebridge-messages".to_string(),
            json!(constraints.error_messages),
        );
    }
}

/// Express `startsWith` / `endsWith` / `includes` checks as one ECMA regex.
fn content_pattern(constraints: &Constraints) -> Option<String> {
    let starts = constraints.starts_with.as_deref().map(regex::escape);
    let includes = constraints.includes.as_deref().map(regex::escape);
    let ends = constraints.ends_with.as_deref().map(regex::escape);

    match (starts, includes, ends) {
        (None, None, None) => None,
        (Some(s), None, None) => Some(format!("^{s}")),
        (None, Some(i), None) => Some(i),
        (None, None, Some(e)) => Some(format!("{e}$")),
        (s, i, e) => {
            let mut pattern = String::from("^");
            if let Some(s) = s {
                pattern.push_str(&format!("(?={s})"));
            }
            if let Some(i) = i {
                pattern.push_str(&format!("(?=.*{i})"));
            }
            if let Some(e) = e {
                pattern.push_str(&format!("(?=.*{e}$)"));
            }
            Some(pattern)
        }
    }
}

/// Map a source type name onto the OpenAPI component-key alphabet.
///
/// `Paginated<Campaign>` becomes `Paginated_Campaign`, `User[]` becomes `UserArray`.
pub fn component_name(name: &str) -> String {
    let name = name.replace("[]", "Array");
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            if pending_separator && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    if out.is_empty() {
        "Anonymous".to_string()
    } else {
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::metadata::{
        Constraints, EnumMember, IndexSignature, NumericType, ObjectType, Property,
    };
    use serde_json::json;

    fn to_json(schema: &Schema) -> Value {
        serde_json::to_value(schema).unwrap()
    }

    #[test]
    fn test_nullable_string() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let schema = processor.convert(&Metadata::string().nullable());

        assert_eq!(
            to_json(&schema),
            json!({ "anyOf": [{ "type": "string" }, { "type": "null" }] })
        );
    }

    #[test]
    fn test_literal_union_inline_and_named() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let role = Metadata::union(vec![
            Metadata::literal("admin"),
            Metadata::literal("user"),
            Metadata::literal("guest"),
        ]);

        let inline = processor.convert(&role);
        assert_eq!(to_json(&inline), json!({ "enum": ["admin", "user", "guest"] }));
        assert!(processor.named_schemas().is_empty());

        let named = processor.convert(&role.clone().named("Role"));
        let again = processor.convert(&role.named("Role"));
        assert_eq!(to_json(&named), json!({ "$ref": "#/components/schemas/Role" }));
        assert_eq!(named, again);
        assert_eq!(processor.named_schemas().len(), 1);
        assert_eq!(
            to_json(&processor.named_schemas()["Role"]),
            json!({ "enum": ["admin", "user", "guest"] })
        );
    }

    #[test]
    fn test_discriminated_union() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let cat = Metadata::object(vec![
            Property::new("type", Metadata::literal("cat")).required(),
            Property::new("meows", Metadata::boolean()).required(),
        ])
        .named("Cat");
        let dog = Metadata::object(vec![
            Property::new("type", Metadata::literal("dog")).required(),
            Property::new("barks", Metadata::boolean()).required(),
        ])
        .named("Dog");
        let pet = Metadata::new(TypeKind::Union {
            members: vec![cat, dog],
            discriminant: Some(Discriminant {
                property: "type".to_string(),
                mapping: [("cat".to_string(), 0), ("dog".to_string(), 1)]
                    .into_iter()
                    .collect(),
            }),
        });

        let schema = processor.convert(&pet);
        assert_eq!(
            to_json(&schema),
            json!({
                "oneOf": [
                    { "$ref": "#/components/schemas/Cat" },
                    { "$ref": "#/components/schemas/Dog" }
                ],
                "discriminator": {
                    "propertyName": "type",
                    "mapping": {
                        "cat": "#/components/schemas/Cat",
                        "dog": "#/components/schemas/Dog"
                    }
                }
            })
        );
    }

    #[test]
    fn test_self_referential_object_terminates() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let tree = Metadata::object(vec![
            Property::new("value", Metadata::number()).required(),
            Property::new(
                "children",
                Metadata::array(Metadata::reference("TreeNode")),
            )
            .required(),
            Property::new("parent", Metadata::reference("TreeNode").nullable()),
        ])
        .named("TreeNode");

        let schema = processor.convert(&tree);
        assert_eq!(schema.ref_name(), Some("TreeNode"));

        let stored = to_json(&processor.named_schemas()["TreeNode"]);
        assert_eq!(
            stored["properties"]["children"]["items"],
            json!({ "$ref": "#/components/schemas/TreeNode" })
        );
        assert_eq!(
            stored["properties"]["parent"],
            json!({ "anyOf": [{ "$ref": "#/components/schemas/TreeNode" }, { "type": "null" }] })
        );
        assert_eq!(stored["required"], json!(["value", "children"]));
    }

    #[test]
    fn test_ref_resolves_through_registry_once() {
        let mut registry = TypeRegistry::new();
        registry.register(
            "Node",
            Metadata::object(vec![Property::new("next", Metadata::reference("Node"))]),
        );
        let mut processor = SchemaProcessor::new(&registry);

        let first = processor.convert(&Metadata::reference("Node"));
        let second = processor.convert(&Metadata::array(Metadata::reference("Node")));

        assert_eq!(first.ref_name(), Some("Node"));
        assert_eq!(second.items.as_ref().unwrap().ref_name(), Some("Node"));
        assert_eq!(processor.named_schemas().len(), 1);
        assert_eq!(
            to_json(&processor.named_schemas()["Node"])["properties"]["next"],
            json!({ "$ref": "#/components/schemas/Node" })
        );
    }

    #[test]
    fn test_missing_ref_degrades_to_empty_schema() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let schema = processor.convert(&Metadata::reference("Ghost"));
        assert_eq!(to_json(&schema), json!({}));
        assert!(processor.named_schemas().is_empty());
    }

    #[test]
    fn test_named_reference_dedup() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let user = Metadata::object(vec![Property::new("id", Metadata::string()).required()])
            .named("User");
        let wrapper = Metadata::object(vec![
            Property::new("owner", user.clone()).required(),
            Property::new("members", Metadata::array(user.clone())).required(),
            Property::new("invitedBy", user.clone().nullable()),
        ]);

        let schema = to_json(&processor.convert(&wrapper));
        let user_ref = json!({ "$ref": "#/components/schemas/User" });
        assert_eq!(schema["properties"]["owner"], user_ref);
        assert_eq!(schema["properties"]["members"]["items"], user_ref);
        assert_eq!(schema["properties"]["invitedBy"]["anyOf"][0], user_ref);
        assert_eq!(processor.named_schemas().len(), 1);
    }

    #[test]
    fn test_strictness_and_index_signature() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);

        let strict = Metadata::new(TypeKind::Object(ObjectType {
            properties: vec![Property::new("a", Metadata::string())],
            index_signature: None,
            strictness: Strictness::Strict,
        }));
        assert_eq!(
            to_json(&processor.convert(&strict))["additionalProperties"],
            json!(false)
        );

        let indexed = Metadata::new(TypeKind::Object(ObjectType {
            properties: vec![],
            index_signature: Some(IndexSignature {
                key: Box::new(Metadata::string()),
                value: Box::new(Metadata::number()),
            }),
            strictness: Strictness::Strict,
        }));
        assert_eq!(
            to_json(&processor.convert(&indexed)),
            json!({ "type": "object", "additionalProperties": { "type": "number" } })
        );
    }

    #[test]
    fn test_tuples_closed_optional_and_rest() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let element = |metadata: Metadata, optional: bool, rest: bool| TupleElement {
            metadata,
            optional,
            rest,
        };

        let closed = Metadata::new(TypeKind::Tuple {
            elements: vec![
                element(Metadata::string(), false, false),
                element(Metadata::number(), false, false),
            ],
        });
        assert_eq!(
            to_json(&processor.convert(&closed)),
            json!({
                "type": "array",
                "prefixItems": [{ "type": "string" }, { "type": "number" }],
                "minItems": 2,
                "maxItems": 2
            })
        );

        let optional_tail = Metadata::new(TypeKind::Tuple {
            elements: vec![
                element(Metadata::string(), false, false),
                element(Metadata::number(), true, false),
            ],
        });
        let schema = to_json(&processor.convert(&optional_tail));
        assert_eq!(schema["minItems"], json!(1));
        assert_eq!(schema["maxItems"], json!(2));

        let rest = Metadata::new(TypeKind::Tuple {
            elements: vec![
                element(Metadata::string(), false, false),
                element(Metadata::array(Metadata::boolean()), false, true),
            ],
        });
        assert_eq!(
            to_json(&processor.convert(&rest)),
            json!({
                "type": "array",
                "items": { "type": "boolean" },
                "prefixItems": [{ "type": "string" }],
                "minItems": 1
            })
        );
    }

    #[test]
    fn test_native_table() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);

        let cases = [
            (Metadata::native("Date", vec![]), json!({ "type": "string", "format": "date-time" })),
            (Metadata::native("URL", vec![]), json!({ "type": "string", "format": "uri" })),
            (
                Metadata::native("Map", vec![Metadata::string(), Metadata::number()]),
                json!({ "type": "object", "additionalProperties": { "type": "number" } }),
            ),
            (
                Metadata::native("Set", vec![Metadata::string()]),
                json!({ "type": "array", "items": { "type": "string" }, "uniqueItems": true }),
            ),
            (
                Metadata::native("Float32Array", vec![]),
                json!({ "type": "array", "items": { "type": "number" } }),
            ),
            (
                Metadata::native("ArrayBuffer", vec![]),
                json!({ "type": "string", "format": "binary" }),
            ),
            (Metadata::native("WeakRef", vec![]), json!({ "type": "object" })),
        ];
        for (meta, expected) in cases {
            assert_eq!(to_json(&processor.convert(&meta)), expected, "{meta:?}");
        }

        let error = to_json(&processor.convert(&Metadata::native("Error", vec![])));
        assert_eq!(error["required"], json!(["message", "name"]));
    }

    #[test]
    fn test_atomic_special_cases() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);

        assert_eq!(
            to_json(&processor.convert(&Metadata::atomic(Atomic::Bigint))),
            json!({ "type": "integer", "format": "int64" })
        );
        assert_eq!(
            to_json(&processor.convert(&Metadata::new(TypeKind::Never))),
            json!({ "not": {} })
        );
        assert_eq!(to_json(&processor.convert(&Metadata::new(TypeKind::Void))), json!({}));
    }

    #[test]
    fn test_constraints_are_carried() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);

        let age = Metadata::number().with_constraints(Constraints {
            minimum: Some(0.into()),
            maximum: Some(150.into()),
            numeric_type: Some(NumericType::Int32),
            ..Constraints::default()
        });
        assert_eq!(
            to_json(&processor.convert(&age)),
            json!({ "type": "integer", "format": "int32", "minimum": 0, "maximum": 150 })
        );

        let slug = Metadata::string().with_constraints(Constraints {
            starts_with: Some("usr.".to_string()),
            ..Constraints::default()
        });
        assert_eq!(
            to_json(&processor.convert(&slug))["pattern"],
            json!("^usr\\.")
        );
    }

    #[test]
    fn test_enum_kind_named_dedup() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let status = Metadata::new(TypeKind::Enum {
            members: vec![
                EnumMember {
                    name: "Active".to_string(),
                    value: json!("active"),
                },
                EnumMember {
                    name: "Archived".to_string(),
                    value: json!("archived"),
                },
            ],
        })
        .named("Status");

        processor.convert(&status);
        processor.convert(&status);
        assert_eq!(
            to_json(&processor.named_schemas()["Status"]),
            json!({ "enum": ["active", "archived"] })
        );
    }

    #[test]
    fn test_colliding_sanitized_names_stay_distinct() {
        let registry = TypeRegistry::new();
        let mut processor = SchemaProcessor::new(&registry);
        let generic = Metadata::object(vec![Property::new("a", Metadata::string())])
            .named("Paginated<Campaign>");
        let plain = Metadata::object(vec![Property::new("b", Metadata::number())])
            .named("Paginated_Campaign");

        let first = processor.convert(&generic);
        let second = processor.convert(&plain);
        let again = processor.convert(&plain);

        assert_eq!(
            to_json(&first),
            json!({ "$ref": "#/components/schemas/Paginated_Campaign" })
        );
        assert_eq!(
            to_json(&second),
            json!({ "$ref": "#/components/schemas/Paginated_Campaign2" })
        );
        assert_eq!(second, again);

        let named = processor.named_schemas();
        assert_eq!(named.len(), 2);
        assert!(to_json(&named["Paginated_Campaign"])["properties"].get("a").is_some());
        assert!(to_json(&named["Paginated_Campaign2"])["properties"].get("b").is_some());
    }

    #[test]
    fn test_component_name() {
        assert_eq!(component_name("User"), "User");
        assert_eq!(component_name("Paginated<Campaign>"), "Paginated_Campaign");
        assert_eq!(component_name("Map<string, User>"), "Map_string_User");
        assert_eq!(component_name("User[]"), "UserArray");
        assert_eq!(component_name("<>"), "Anonymous");
    }
}
