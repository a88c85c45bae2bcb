//! Default value policy
//!
//! Shared by new-action synthesis and the generic editors' backfill so both
//! produce identical values for the same schema.

use crate::model::{PropertySchema, SchemaType};
use sds_script::{Action, Verb, SUBACTIONS_PROPERTY, VERB_PROPERTY};
use serde_json::{Map, Value};

/// Type-appropriate default for a property schema
///
/// `""` string, `false` boolean, `0` number or integer, `{}` object, `[]`
/// array. Untyped schemas fall back to their first enum literal, else `null`.
#[must_use]
pub fn default_value(schema: &PropertySchema) -> Value {
    match schema.effective_type() {
        Some(SchemaType::String) => Value::String(String::new()),
        Some(SchemaType::Boolean) => Value::Bool(false),
        Some(SchemaType::Number | SchemaType::Integer) => Value::from(0),
        Some(SchemaType::Object) => Value::Object(Map::new()),
        Some(SchemaType::Array) => Value::Array(Vec::new()),
        Some(SchemaType::Null) | None => schema
            .enumeration
            .as_ref()
            .and_then(|values| values.first().cloned())
            .unwrap_or(Value::Null),
    }
}

/// Default for an optional schema; a missing schema yields `null`
#[must_use]
pub fn default_value_for(schema: Option<&PropertySchema>) -> Value {
    schema.map_or(Value::Null, default_value)
}

/// Whether a property of an action schema gets a value in a new action
#[inline]
#[must_use]
pub fn is_seeded_property(schema: &PropertySchema, name: &str) -> bool {
    name != VERB_PROPERTY && (name == SUBACTIONS_PROPERTY || schema.is_required(name))
}

/// Minimal action for an action or sub-action schema
///
/// Sets the verb, then every property named `subactions` or listed in
/// `required` (except `verb`) to its default.
#[must_use]
pub fn new_action(verb: Verb, schema: &PropertySchema) -> Action {
    let mut action = Action::new(verb);
    let Some(properties) = schema.properties() else {
        return action;
    };

    for (name, property) in properties {
        if !is_seeded_property(schema, name) {
            continue;
        }
        if name == SUBACTIONS_PROPERTY {
            action = action.with_subactions(Vec::new());
        } else {
            action = action.with_property(name.clone(), default_value(property));
        }
    }
    action
}
