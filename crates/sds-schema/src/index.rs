//! Verb-indexed lookup tables
//!
//! Built once from the schema document by [`SchemaIndex::build`] and never
//! mutated afterwards; reconfiguration builds a fresh index.

use crate::error::{SchemaError, SchemaResult};
use crate::model::{PropertySchema, SchemaType};
use crate::resolver::RefError;
use crate::validation::DocumentValidator;
use indexmap::IndexMap;
use sds_script::{Verb, SUBACTIONS_PROPERTY, VERB_PROPERTY};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Entry of an "add action" picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    /// Verb to instantiate
    pub verb: Verb,
    /// Display label (schema title, else the verb)
    pub label: String,
    /// Schema description, else empty
    pub description: String,
}

impl ActionDescriptor {
    fn from_schema(verb: &Verb, schema: &PropertySchema) -> Self {
        Self {
            verb: verb.clone(),
            label: schema.title.clone().unwrap_or_else(|| verb.to_string()),
            description: schema.description.clone().unwrap_or_default(),
        }
    }
}

/// Table of schemas keyed by verb, in document order
pub type VerbTable = IndexMap<Verb, Arc<PropertySchema>>;

/// Lookup tables derived from a schema document
#[derive(Debug)]
pub struct SchemaIndex {
    document: Arc<Value>,
    actions: VerbTable,
    sub_actions: HashMap<Verb, VerbTable>,
    sub_action_descriptors: HashMap<Verb, Vec<ActionDescriptor>>,
    action_descriptors: Vec<ActionDescriptor>,
    validator: DocumentValidator,
}

impl SchemaIndex {
    /// Build the index, rejecting structurally unusable documents
    pub fn build(document: Value) -> SchemaResult<Self> {
        let root = PropertySchema::from_value(&document, &document).map_err(config_error)?;

        let actions_schema = root
            .property("actions")
            .ok_or_else(|| SchemaError::configuration("missing top-level properties.actions"))?;
        if actions_schema.effective_type() != Some(SchemaType::Array) {
            return Err(SchemaError::configuration(
                "properties.actions is not an array schema",
            ));
        }
        let alternatives = any_of_items(actions_schema)
            .ok_or_else(|| SchemaError::configuration("properties.actions.items has no anyOf"))?;

        let mut actions = VerbTable::with_capacity(alternatives.len());
        let mut sub_actions = HashMap::new();
        let mut sub_action_descriptors = HashMap::new();

        for alternative in alternatives {
            let verb = action_verb(alternative, "action")?;

            if let Some(subactions) = alternative.property(SUBACTIONS_PROPERTY) {
                let sub_alternatives = any_of_items(subactions).ok_or_else(|| {
                    SchemaError::configuration(format!(
                        "subactions of '{verb}' is not an array with items.anyOf"
                    ))
                })?;

                let mut table = VerbTable::with_capacity(sub_alternatives.len());
                for sub in sub_alternatives {
                    let sub_verb = action_verb(sub, &format!("sub-action of '{verb}'"))?;
                    table.insert(sub_verb, Arc::new(sub.clone()));
                }
                let descriptors = table
                    .iter()
                    .map(|(v, s)| ActionDescriptor::from_schema(v, s))
                    .collect();
                sub_action_descriptors.insert(verb.clone(), descriptors);
                sub_actions.insert(verb.clone(), table);
            }

            if actions.insert(verb.clone(), Arc::new(alternative.clone())).is_some() {
                tracing::warn!(verb = %verb, "duplicate action verb in schema, last definition wins");
            }
        }

        let action_descriptors = actions
            .iter()
            .map(|(v, s)| ActionDescriptor::from_schema(v, s))
            .collect();

        let validator = DocumentValidator::compile(&document)?;

        Ok(Self {
            document: Arc::new(document),
            actions,
            sub_actions,
            sub_action_descriptors,
            action_descriptors,
            validator,
        })
    }

    /// Raw schema document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Arc<Value> {
        &self.document
    }

    /// Compiled validator for the whole document
    #[inline]
    #[must_use]
    pub fn validator(&self) -> &DocumentValidator {
        &self.validator
    }

    /// Action schema by verb (exact, then unique case-insensitive)
    #[must_use]
    pub fn action(&self, verb: &str) -> Option<&Arc<PropertySchema>> {
        lookup(&self.actions, verb)
    }

    /// Sub-action table of a parent verb (same two-phase lookup)
    #[must_use]
    pub fn sub_action_table(&self, parent_verb: &str) -> Option<&VerbTable> {
        let (parent, _) = lookup_entry(&self.actions, parent_verb)?;
        self.sub_actions.get(parent)
    }

    /// Sub-action schema under a parent verb
    #[must_use]
    pub fn sub_action(&self, parent_verb: &str, verb: &str) -> Option<&Arc<PropertySchema>> {
        lookup(self.sub_action_table(parent_verb)?, verb)
    }

    /// All root actions, in document order
    #[inline]
    #[must_use]
    pub fn action_descriptors(&self) -> &[ActionDescriptor] {
        &self.action_descriptors
    }

    /// Sub-actions addable under a parent verb
    #[must_use]
    pub fn sub_action_descriptors(&self, parent_verb: &str) -> &[ActionDescriptor] {
        lookup_entry(&self.actions, parent_verb)
            .and_then(|(parent, _)| self.sub_action_descriptors.get(parent))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of root action verbs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the index has no actions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Two-phase lookup: exact key, then the single case-insensitive match
///
/// Several case-insensitive matches are ambiguous and yield `None`.
#[must_use]
pub fn lookup<'a>(table: &'a VerbTable, verb: &str) -> Option<&'a Arc<PropertySchema>> {
    lookup_entry(table, verb).map(|(_, schema)| schema)
}

fn lookup_entry<'a>(
    table: &'a VerbTable,
    verb: &str,
) -> Option<(&'a Verb, &'a Arc<PropertySchema>)> {
    if let Some(entry) = table.get_key_value(verb) {
        return Some(entry);
    }

    let mut matches = table.iter().filter(|(key, _)| key.eq_ignore_case(verb));
    let first = matches.next()?;
    if matches.next().is_some() {
        tracing::debug!(verb, "ambiguous case-insensitive verb lookup");
        return None;
    }
    Some(first)
}

fn any_of_items(schema: &PropertySchema) -> Option<&[PropertySchema]> {
    let items = schema.items()?;
    match &items.shape {
        crate::model::Shape::AnyOf(alternatives) => Some(alternatives),
        _ => None,
    }
}

fn action_verb(schema: &PropertySchema, what: &str) -> SchemaResult<Verb> {
    schema
        .property(VERB_PROPERTY)
        .and_then(PropertySchema::single_literal)
        .filter(|literal| !literal.is_empty())
        .map(Verb::new)
        .ok_or_else(|| {
            SchemaError::configuration(format!(
                "{what} schema lacks properties.verb.enum with exactly one entry"
            ))
        })
}

fn config_error(err: RefError) -> SchemaError {
    SchemaError::configuration(err.to_string())
}
