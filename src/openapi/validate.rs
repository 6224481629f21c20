//! Structural compliance checks for OpenAPI documents.
//!
//! This pass never blocks generation. It walks the whole document once and
//! reports every problem it finds.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::schema::COMPONENTS_PREFIX;

static COMPONENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z0-9._-]+$").unwrap()
});

static PATH_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\{([^}/]+)\}").unwrap()
});

const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-pointer-like location, e.g. `paths./users.get.responses`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Check `document` and return every violation found.
pub fn validate_document(document: &Value) -> Vec<Violation> {
    let mut validator = Validator::default();
    validator.document(document);
    validator.violations
}

#[derive(Default)]
struct Validator {
    violations: Vec<Violation>,
    component_names: HashSet<String>,
    operation_ids: HashSet<String>,
}

impl Validator {
    fn report(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }

    fn document(&mut self, document: &Value) {
        let Some(root) = document.as_object() else {
            self.report("", "document root must be an object");
            return;
        };

        match root.get("openapi").and_then(Value::as_str) {
            Some(version) if version.starts_with("3.") => {}
            Some(version) => self.report("openapi", format!("unsupported version '{version}'")),
            None => self.report("openapi", "missing required string field"),
        }

        match root.get("info").and_then(Value::as_object) {
            Some(info) => {
                for field in ["title", "version"] {
                    if info.get(field).and_then(Value::as_str).is_none() {
                        self.report(format!("info.{field}"), "missing required string field");
                    }
                }
            }
            None => self.report("info", "missing required object"),
        }

        if let Some(schemas) = root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
        {
            for name in schemas.keys() {
                if !COMPONENT_NAME.is_match(name) {
                    self.report(
                        format!("components.schemas.{name}"),
                        "component name must match ^[a-zA-Z0-9._-]+$",
                    );
                }
                self.component_names.insert(name.clone());
            }
            for (name, schema) in schemas {
                self.schema(&format!("components.schemas.{name}"), schema);
            }
        }

        match root.get("paths") {
            Some(Value::Object(paths)) => {
                for (path, item) in paths {
                    self.path_item(path, item);
                }
            }
            Some(_) => self.report("paths", "must be an object"),
            None => {}
        }
    }

    fn path_item(&mut self, path: &str, item: &Value) {
        let location = format!("paths.{path}");
        if !path.starts_with('/') {
            self.report(&location, "path must start with '/'");
        }
        let Some(item) = item.as_object() else {
            self.report(&location, "path item must be an object");
            return;
        };

        let shared_params = self.parameters(&format!("{location}.parameters"), item);
        let placeholders: Vec<String> = PATH_PLACEHOLDER
            .captures_iter(path)
            .map(|c| c[1].to_string())
            .collect();

        for method in METHODS {
            let Some(operation) = item.get(method) else {
                continue;
            };
            let op_location = format!("{location}.{method}");
            let Some(operation) = operation.as_object() else {
                self.report(&op_location, "operation must be an object");
                continue;
            };
            let mut declared = shared_params.clone();
            declared.extend(self.parameters(&format!("{op_location}.parameters"), operation));
            for placeholder in &placeholders {
                if !declared.contains(placeholder) {
                    self.report(
                        &op_location,
                        format!("path placeholder '{{{placeholder}}}' has no path parameter"),
                    );
                }
            }
            self.operation(&op_location, operation);
        }
    }

    /// Validate a `parameters` list and return the names of its path parameters.
    fn parameters(&mut self, location: &str, owner: &Map<String, Value>) -> HashSet<String> {
        let mut path_params = HashSet::new();
        let Some(params) = owner.get("parameters") else {
            return path_params;
        };
        let Some(params) = params.as_array() else {
            self.report(location, "must be an array");
            return path_params;
        };
        for (index, param) in params.iter().enumerate() {
            let param_location = format!("{location}[{index}]");
            if param.get("$ref").is_some() {
                continue;
            }
            let name = param.get("name").and_then(Value::as_str);
            if name.is_none() {
                self.report(&param_location, "parameter is missing 'name'");
            }
            match param.get("in").and_then(Value::as_str) {
                Some("path") => {
                    if param.get("required").and_then(Value::as_bool) != Some(true) {
                        self.report(&param_location, "path parameters must be required");
                    }
                    if let Some(name) = name {
                        path_params.insert(name.to_string());
                    }
                }
                Some("query" | "header" | "cookie") => {}
                Some(other) => self.report(&param_location, format!("invalid location '{other}'")),
                None => self.report(&param_location, "parameter is missing 'in'"),
            }
            if let Some(schema) = param.get("schema") {
                self.schema(&format!("{param_location}.schema"), schema);
            }
        }
        path_params
    }

    fn operation(&mut self, location: &str, operation: &Map<String, Value>) {
        if let Some(id) = operation.get("operationId").and_then(Value::as_str) {
            if !self.operation_ids.insert(id.to_string()) {
                self.report(location, format!("duplicate operationId '{id}'"));
            }
        }

        if let Some(body) = operation.get("requestBody") {
            self.content(&format!("{location}.requestBody"), body);
        }

        match operation.get("responses").and_then(Value::as_object) {
            Some(responses) if !responses.is_empty() => {
                for (status, response) in responses {
                    let response_location = format!("{location}.responses.{status}");
                    if !is_status_key(status) {
                        self.report(&response_location, "invalid status code");
                    }
                    if response.get("$ref").is_none()
                        && response.get("description").and_then(Value::as_str).is_none()
                    {
                        self.report(&response_location, "response is missing 'description'");
                    }
                    self.content(&response_location, response);
                }
            }
            _ => self.report(
                format!("{location}.responses"),
                "operation must declare at least one response",
            ),
        }
    }

    fn content(&mut self, location: &str, owner: &Value) {
        let Some(content) = owner.get("content").and_then(Value::as_object) else {
            return;
        };
        for (media_type, media) in content {
            for key in ["schema", "itemSchema"] {
                if let Some(schema) = media.get(key) {
                    self.schema(&format!("{location}.content.{media_type}.{key}"), schema);
                }
            }
        }
    }

    fn schema(&mut self, location: &str, schema: &Value) {
        let Some(object) = schema.as_object() else {
            if !schema.is_boolean() {
                self.report(location, "schema must be an object or boolean");
            }
            return;
        };

        if let Some(reference) = object.get("$ref") {
            match reference.as_str().and_then(|r| r.strip_prefix(COMPONENTS_PREFIX)) {
                Some(name) if self.component_names.contains(name) => {}
                Some(name) => self.report(location, format!("unresolved $ref to '{name}'")),
                None => self.report(location, "unsupported $ref form"),
            }
        }

        if let (Some(required), Some(properties)) = (
            object.get("required").and_then(Value::as_array),
            object.get("properties").and_then(Value::as_object),
        ) {
            for name in required.iter().filter_map(Value::as_str) {
                if !properties.contains_key(name) {
                    self.report(location, format!("required property '{name}' is not declared"));
                }
            }
        }

        if let Some(properties) = object.get("properties").and_then(Value::as_object) {
            for (name, property) in properties {
                self.schema(&format!("{location}.properties.{name}"), property);
            }
        }
        for key in ["items", "additionalProperties", "not", "contentSchema"] {
            if let Some(child) = object.get(key) {
                self.schema(&format!("{location}.{key}"), child);
            }
        }
        for key in ["anyOf", "oneOf", "allOf", "prefixItems"] {
            match object.get(key) {
                Some(Value::Array(members)) => {
                    for (index, member) in members.iter().enumerate() {
                        self.schema(&format!("{location}.{key}[{index}]"), member);
                    }
                }
                Some(_) => self.report(format!("{location}.{key}"), "must be an array"),
                None => {}
            }
        }
        if let Some(discriminator) = object.get("discriminator") {
            if discriminator.get("propertyName").and_then(Value::as_str).is_none() {
                self.report(
                    format!("{location}.discriminator"),
                    "discriminator is missing 'propertyName'",
                );
            }
        }
    }
}

fn is_status_key(status: &str) -> bool {
    status == "default"
        || (status.len() == 3
            && status.starts_with(['1', '2', '3', '4', '5'])
            && (status[1..].chars().all(|c| c.is_ascii_digit()) || &status[1..] == "XX"))
}
