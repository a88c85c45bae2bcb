//! Whole-document JSON-Schema validation

use crate::error::{SchemaError, SchemaResult};
use jsonschema::JSONSchema;
use serde::Serialize;
use serde_json::Value;

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer of the offending value (`""` for the root)
    pub instance_path: String,
    /// Human-readable message
    pub message: String,
}

/// Outcome of validating a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Violations in validator order; empty when valid
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Whether the document matched the schema
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Compiled validator for a schema document
pub struct DocumentValidator {
    compiled: JSONSchema,
}

impl std::fmt::Debug for DocumentValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentValidator").finish_non_exhaustive()
    }
}

impl DocumentValidator {
    /// Compile a schema document; the draft follows its `$schema`
    pub fn compile(document: &Value) -> SchemaResult<Self> {
        let compiled = JSONSchema::compile(document).map_err(|err| {
            SchemaError::configuration(format!("schema document does not compile: {err}"))
        })?;
        Ok(Self { compiled })
    }

    /// Boolean validity of a parsed instance
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }

    /// Validate a parsed instance, collecting every violation
    #[must_use]
    pub fn report(&self, instance: &Value) -> ValidationReport {
        let violations = match self.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| Violation {
                    instance_path: err.instance_path.to_string(),
                    message: err.to_string(),
                })
                .collect(),
        };
        ValidationReport { violations }
    }
}

/// Parse JSON text, keeping "not JSON" distinct from schema violations
pub fn parse_instance(json_text: &str) -> SchemaResult<Value> {
    serde_json::from_str(json_text).map_err(SchemaError::MalformedJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> DocumentValidator {
        DocumentValidator::compile(&json!({
            "$schema": "http://json-schema.org/draft-06/schema#",
            "type": "object",
            "properties": { "version": { "type": "number" } },
            "required": ["actions"]
        }))
        .unwrap()
    }

    #[test]
    fn reports_violations_with_paths() {
        let report = validator().report(&json!({ "actions": [], "version": "one" }));
        assert!(!report.is_valid());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].instance_path, "/version");
    }

    #[test]
    fn valid_instance_has_empty_report() {
        let v = validator();
        let instance = json!({ "actions": [], "version": 1 });
        assert!(v.is_valid(&instance));
        assert!(v.report(&instance).is_valid());
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(matches!(
            parse_instance("{not json"),
            Err(SchemaError::MalformedJson(_))
        ));
    }
}
