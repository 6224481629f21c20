//! Identifier and literal helpers for emitted TypeScript.

use std::collections::HashSet;
use std::sync::LazyLock;

use serde_json::Value;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// True when `name` is not a bare identifier and must be quoted as a key.
pub fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            .unwrap_or(false)
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Body of a double-quoted JS string literal.
pub fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}') => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Property key as written inside an interface or object literal.
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Valid camelCase function identifier: `get-user_by id` becomes `getUserById`.
pub fn camel_case(name: &str) -> String {
    let mut result = String::new();
    for (i, word) in words(name).iter().enumerate() {
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                result.push(first.to_ascii_lowercase());
                result.extend(chars);
            }
        } else {
            result.push_str(&capitalize_first(word));
        }
    }
    guard_identifier(result)
}

/// `user-admin` becomes `UserAdmin`.
pub fn pascal_case(name: &str) -> String {
    let result: String = words(name).iter().map(|w| capitalize_first(w)).collect();
    guard_identifier(result)
}

/// `UserAdmin` becomes `user-admin`.
pub fn kebab_case(name: &str) -> String {
    let joined = words(name)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if joined.is_empty() {
        "default".to_string()
    } else {
        joined
    }
}

fn guard_identifier(mut result: String) -> String {
    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if TS_RESERVED_WORDS.contains(result.as_str()) {
        result.insert(0, '_');
    }
    result
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// A JSON value as a TypeScript literal type.
pub fn literal_type(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", escape_js_string(s)),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => "unknown".to_string(),
    }
}

/// `/** text */` or a block comment, indented by `indent`.
pub fn doc_comment(text: &str, indent: &str) -> String {
    let text = text.trim().replace("*/", "*\\/");
    if text.contains('\n') {
        let mut out = format!("{indent}/**\n");
        for line in text.lines() {
            if line.trim().is_empty() {
                out.push_str(&format!("{indent} *\n"));
            } else {
                out.push_str(&format!("{indent} * {}\n", line.trim_end()));
            }
        }
        out.push_str(&format!("{indent} */\n"));
        out
    } else {
        format!("{indent}/** {text} */\n")
    }
}

/// Doc comment for a title/description pair.
///
/// One line when only one is set or both are equal, a block when they differ.
pub fn summary_comment(title: Option<&str>, description: Option<&str>, indent: &str) -> String {
    let title = title.map(str::trim).filter(|s| !s.is_empty());
    let description = description.map(str::trim).filter(|s| !s.is_empty());
    match (title, description) {
        (None, None) => String::new(),
        (Some(text), None) | (None, Some(text)) => doc_comment(text, indent),
        (Some(title), Some(description)) if title == description => doc_comment(title, indent),
        (Some(title), Some(description)) => {
            doc_comment(&format!("{title}\n\n{description}"), indent)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("id"), "id");
        assert_eq!(quote_if_needed("$meta"), "$meta");
        assert_eq!(quote_if_needed("content-type"), "\"content-type\"");
        assert_eq!(quote_if_needed("1st"), "\"1st\"");
        assert_eq!(quote_if_needed(""), "\"\"");
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(camel_case("get-user_by id"), "getUserById");
        assert_eq!(camel_case("users_findAll"), "usersFindAll");
        assert_eq!(camel_case("GetPet"), "getPet");
        assert_eq!(camel_case("delete"), "_delete");
        assert_eq!(camel_case("2fa"), "_2fa");
        assert_eq!(pascal_case("user-admin"), "UserAdmin");
        assert_eq!(kebab_case("UserAdmin"), "user-admin");
        assert_eq!(kebab_case("pets"), "pets");
    }

    #[test]
    fn test_literal_type() {
        assert_eq!(literal_type(&json!("a\"b")), "\"a\\\"b\"");
        assert_eq!(
            literal_type(&json!("line\nbreak\r\u{2028}\u{0007}")),
            "\"line\\nbreak\\r\\u2028\\u0007\""
        );
        assert_eq!(literal_type(&json!(3)), "3");
        assert_eq!(literal_type(&json!(false)), "false");
        assert_eq!(literal_type(&json!(null)), "null");
    }

    #[test]
    fn test_summary_comment() {
        assert_eq!(summary_comment(None, None, ""), "");
        assert_eq!(summary_comment(Some("User"), None, ""), "/** User */\n");
        assert_eq!(summary_comment(Some("User"), Some("User"), "  "), "  /** User */\n");
        assert_eq!(
            summary_comment(Some("User"), Some("A person."), ""),
            "/**\n * User\n *\n * A person.\n */\n"
        );
        assert_eq!(
            summary_comment(None, Some("line one\nline two"), ""),
            "/**\n * line one\n * line two\n */\n"
        );
    }
}
