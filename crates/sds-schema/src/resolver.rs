//! `$ref` pointer resolution
//!
//! Pointers use the local form `#/definitions/<name>/<name>...`. Chains of
//! references are followed up to [`MAX_REF_DEPTH`] hops so a cyclic document
//! fails instead of looping.

use serde_json::Value;

/// Maximum number of `$ref` hops (and nested schema levels) followed
pub const MAX_REF_DEPTH: usize = 64;

/// Why a reference could not be followed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefError {
    /// Pointer does not name a location in the document
    Unresolved(String),
    /// Chain did not terminate within [`MAX_REF_DEPTH`] hops
    TooDeep(String),
}

impl std::fmt::Display for RefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolved(pointer) => write!(f, "unresolved $ref '{pointer}'"),
            Self::TooDeep(pointer) => {
                write!(f, "$ref chain starting at '{pointer}' exceeds {MAX_REF_DEPTH} hops")
            }
        }
    }
}

/// `$ref` pointer carried by a schema, if any
#[inline]
#[must_use]
pub fn ref_pointer(schema: &Value) -> Option<&str> {
    schema.get("$ref").and_then(Value::as_str)
}

/// Look a single pointer up in the document
///
/// `#` is stripped and the rest split on `/`; empty segments are skipped.
#[must_use]
pub fn lookup_pointer<'a>(document: &'a Value, pointer: &str) -> Option<&'a Value> {
    let path = pointer.strip_prefix('#').unwrap_or(pointer);
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .try_fold(document, |node, segment| match node {
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Follow `$ref` until reaching a schema without one
///
/// A schema without `$ref` is returned as is. The input is never modified.
pub fn resolve<'a>(document: &'a Value, schema: &'a Value) -> Result<&'a Value, RefError> {
    let mut current = schema;
    let Some(first) = ref_pointer(current) else {
        return Ok(current);
    };

    for _ in 0..MAX_REF_DEPTH {
        let Some(pointer) = ref_pointer(current) else {
            return Ok(current);
        };
        current = lookup_pointer(document, pointer)
            .ok_or_else(|| RefError::Unresolved(pointer.to_string()))?;
    }

    match ref_pointer(current) {
        None => Ok(current),
        Some(_) => Err(RefError::TooDeep(first.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "definitions": {
                "theme": { "type": "object", "title": "Theme" },
                "alias": { "$ref": "#/definitions/theme" },
                "lists": { "setTitle": { "type": "object", "title": "Set title" } },
                "loopA": { "$ref": "#/definitions/loopB" },
                "loopB": { "$ref": "#/definitions/loopA" }
            }
        })
    }

    #[test]
    fn returns_schema_without_ref_unchanged() {
        let doc = document();
        let schema = json!({ "type": "string" });
        assert_eq!(resolve(&doc, &schema).unwrap(), &schema);
    }

    #[test]
    fn follows_nested_pointer() {
        let doc = document();
        let schema = json!({ "$ref": "#/definitions/lists/setTitle" });
        let resolved = resolve(&doc, &schema).unwrap();
        assert_eq!(resolved["title"], json!("Set title"));
    }

    #[test]
    fn follows_chain() {
        let doc = document();
        let schema = json!({ "type": "object", "$ref": "#/definitions/alias" });
        let resolved = resolve(&doc, &schema).unwrap();
        assert_eq!(resolved["title"], json!("Theme"));
        assert!(schema.get("title").is_none());
    }

    #[test]
    fn unresolved_pointer() {
        let doc = document();
        let schema = json!({ "$ref": "#/definitions/missing" });
        assert_eq!(
            resolve(&doc, &schema),
            Err(RefError::Unresolved("#/definitions/missing".to_string()))
        );
    }

    #[test]
    fn cycle_is_bounded() {
        let doc = document();
        let schema = json!({ "$ref": "#/definitions/loopA" });
        assert!(matches!(resolve(&doc, &schema), Err(RefError::TooDeep(_))));
    }
}
