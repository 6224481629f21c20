//! Renaming of components that shadow TypeScript built-in names.
//!
//! A component called `Record` would hide the global `Record<K, V>` inside
//! the generated files, so it is emitted as `Record_` instead. Generic
//! applications of the built-in (`Record<string, number>`) keep their name.

use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::info;

use super::signature::OperationSignature;
use crate::parsers::{ParsedDocument, SchemaNode};

/// Global types and utility types a declaration file can shadow.
pub static TS_BUILTINS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "Record",
        "Partial",
        "Required",
        "Readonly",
        "Pick",
        "Omit",
        "Exclude",
        "Extract",
        "NonNullable",
        "ReturnType",
        "Parameters",
        "InstanceType",
        "Awaited",
        "Promise",
        "Array",
        "ReadonlyArray",
        "Map",
        "Set",
        "WeakMap",
        "WeakSet",
        "Uppercase",
        "Lowercase",
        "Capitalize",
        "Uncapitalize",
        "Date",
        "Error",
        "Blob",
        "File",
        "FormData",
        "Response",
        "Request",
        "Headers",
        "URL",
        "Object",
        "String",
        "Number",
        "Boolean",
        "Symbol",
        "Function",
        "RegExp",
        "ReadableStream",
        "Uint8Array",
    ]
    .into_iter()
    .collect()
});

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*").unwrap()
});

/// Old name to new name for every component that shadows a built-in.
pub fn collision_renames<'a>(
    names: impl IntoIterator<Item = &'a String>,
) -> IndexMap<String, String> {
    let names: Vec<&String> = names.into_iter().collect();
    let mut taken: HashSet<String> = names.iter().map(|n| n.to_string()).collect();
    let mut renames = IndexMap::new();

    for name in names {
        if !TS_BUILTINS.contains(name.as_str()) {
            continue;
        }
        let mut candidate = format!("{name}_");
        while taken.contains(&candidate) {
            candidate.push('_');
        }
        taken.insert(candidate.clone());
        renames.insert(name.clone(), candidate);
    }
    renames
}

/// Rename standalone occurrences of the keys of `renames` inside a type expression.
///
/// `Record` and `Record[]` are renamed; `Record<string, number>`, `MyRecord`,
/// `RecordX`, `ns.Record`, the string literal `"Record"` and the object key
/// in `{ Record: string }` are not.
pub fn rename_bare(text: &str, renames: &IndexMap<String, String>) -> String {
    if renames.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in IDENTIFIER.find_iter(text) {
        let Some(replacement) = renames.get(found.as_str()) else {
            continue;
        };
        if !is_type_position(text, found.start(), found.end()) {
            continue;
        }
        if text[found.end()..].trim_start().starts_with('<') {
            continue;
        }
        out.push_str(&text[last..found.start()]);
        out.push_str(replacement);
        last = found.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Identifiers a type expression refers to, skipping member access and quoted text.
pub fn referenced_names(text: &str) -> impl Iterator<Item = &str> {
    IDENTIFIER
        .find_iter(text)
        .filter(move |found| is_type_position(text, found.start(), found.end()))
        .map(|found| found.as_str())
}

/// False for member accesses, quoted text and object keys (`Date: string`, `Date?: string`).
fn is_type_position(text: &str, start: usize, end: usize) -> bool {
    if text[..start].ends_with('.') || inside_quotes(text, start) {
        return false;
    }
    let after = text[end..].trim_start();
    !(after.starts_with(':') || after.starts_with("?:"))
}

/// True when `offset` falls inside a single- or double-quoted string literal.
fn inside_quotes(text: &str, offset: usize) -> bool {
    let mut quote = None;
    let mut escaped = false;
    for c in text[..offset].chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some(_) if c == '\\' => escaped = true,
            Some(open) if c == open => quote = None,
            None if c == '"' || c == '\'' => quote = Some(c),
            _ => {}
        }
    }
    quote.is_some()
}

/// Apply `renames` to component keys, every `$ref` node and every signature.
pub fn apply_renames(
    document: &mut ParsedDocument,
    signatures: &mut [OperationSignature],
    renames: &IndexMap<String, String>,
) {
    if renames.is_empty() {
        return;
    }
    for (from, to) in renames {
        info!(from = %from, to = %to, "Renaming component that shadows a built-in type.");
    }

    document.components = std::mem::take(&mut document.components)
        .into_iter()
        .map(|(name, component)| match renames.get(&name) {
            Some(renamed) => (renamed.clone(), component),
            None => (name, component),
        })
        .collect();

    document.walk_nodes_mut(&mut |node| {
        if let SchemaNode::Ref(name) = node {
            if let Some(renamed) = renames.get(name.as_str()) {
                *name = renamed.clone();
            }
        }
    });

    for signature in signatures {
        signature.map_types(|text| rename_bare(text, renames));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn record_renames() -> IndexMap<String, String> {
        collision_renames(&["Record".to_string(), "User".to_string()])
    }

    #[test]
    fn test_collision_renames() {
        let renames = record_renames();
        assert_eq!(renames.len(), 1);
        assert_eq!(renames["Record"], "Record_");

        let crowded = collision_renames(&["Map".to_string(), "Map_".to_string()]);
        assert_eq!(crowded["Map"], "Map__");
    }

    #[test]
    fn test_rename_bare_only() {
        let renames = record_renames();
        assert_eq!(rename_bare("Record", &renames), "Record_");
        assert_eq!(rename_bare("Record[]", &renames), "Record_[]");
        assert_eq!(rename_bare("Record | null", &renames), "Record_ | null");
        assert_eq!(
            rename_bare("Record<string, number>", &renames),
            "Record<string, number>"
        );
        assert_eq!(
            rename_bare("Record <string, Record>", &renames),
            "Record <string, Record_>"
        );
        assert_eq!(rename_bare("MyRecord", &renames), "MyRecord");
        assert_eq!(rename_bare("RecordX", &renames), "RecordX");
        assert_eq!(rename_bare("ns.Record", &renames), "ns.Record");
        assert_eq!(rename_bare("\"Record\"", &renames), "\"Record\"");
        assert_eq!(
            rename_bare("{ Record: Record; Record?: Record[] }", &renames),
            "{ Record: Record_; Record?: Record_[] }"
        );
    }

    #[test]
    fn test_quoted_text_is_left_alone() {
        let renames = record_renames();
        assert_eq!(
            rename_bare("\"old Record\" | 'a \\' Record' | Record", &renames),
            "\"old Record\" | 'a \\' Record' | Record_"
        );

        let names: Vec<&str> =
            referenced_names("{ kind: \"old Record\"; value: Pet }").collect();
        assert_eq!(names, vec!["Pet"]);
    }

    #[test]
    fn test_referenced_names() {
        let names: Vec<&str> =
            referenced_names("{ event: \"done\"; data: sse.ServerSentEvent<Pet[]> }").collect();
        assert_eq!(names, vec!["sse", "Pet"]);
    }
}
