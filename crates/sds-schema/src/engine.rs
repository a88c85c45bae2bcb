//! Schema resolution engine
//!
//! Lifecycle is explicit: construct, [`SchemaEngine::configure`], then use.
//! Every schema-dependent call made before configuration completes fails
//! with [`SchemaError::NotConfigured`].

use crate::defaults;
use crate::error::{SchemaError, SchemaResult};
use crate::index::{ActionDescriptor, SchemaIndex};
use crate::model::{PropertySchema, SchemaType};
use crate::resolver::{self, RefError};
use crate::source::SchemaSource;
use crate::validation::{parse_instance, ValidationReport};
use parking_lot::RwLock;
use sds_script::{Action, SiteScriptContent, Verb, SUBACTIONS_PROPERTY, VERB_PROPERTY};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Summary row of an action: property title and display value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyValuePair {
    /// Property title (falls back to the property name)
    pub property: String,
    /// Display value
    pub value: Value,
}

/// Schema resolution engine
///
/// Shared by `Arc` between the edit model, the rendering dispatcher and the
/// editor session. The index is published atomically once built.
#[derive(Debug)]
pub struct SchemaEngine {
    client: reqwest::Client,
    base_url: Option<String>,
    index: RwLock<Option<Arc<SchemaIndex>>>,
    configure_lock: tokio::sync::Mutex<()>,
}

impl Default for SchemaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaEngine {
    /// Create an unconfigured engine
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: None,
            index: RwLock::new(None),
            configure_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// With base URL for site-relative schema sources
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// With a preconfigured HTTP client
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Load the schema document and build the index
    ///
    /// No-op when already configured unless `force_reconfigure` is set.
    /// Concurrent first calls coalesce: later callers wait for the first one
    /// and then observe the configured state.
    pub async fn configure(&self, source: Option<&str>, force_reconfigure: bool) -> SchemaResult<()> {
        if !force_reconfigure && self.is_configured() {
            return Ok(());
        }

        let _guard = self.configure_lock.lock().await;
        if !force_reconfigure && self.is_configured() {
            tracing::debug!("schema engine configured by a concurrent caller");
            return Ok(());
        }

        let source = SchemaSource::from_input(source);
        let document = source.load(&self.client, self.base_url.as_deref()).await?;
        let index = match SchemaIndex::build(document) {
            Ok(index) => index,
            Err(err) => {
                tracing::error!(source = source.describe(), error = %err, "schema configuration failed");
                return Err(err);
            }
        };

        tracing::info!(
            source = source.describe(),
            actions = index.len(),
            forced = force_reconfigure,
            "schema engine configured"
        );
        *self.index.write() = Some(Arc::new(index));
        Ok(())
    }

    /// Whether `configure` has completed
    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.index.read().is_some()
    }

    /// Current index snapshot
    pub fn index(&self) -> SchemaResult<Arc<SchemaIndex>> {
        self.index.read().clone().ok_or(SchemaError::NotConfigured)
    }

    /// Loaded schema document
    pub fn schema_document(&self) -> SchemaResult<Arc<Value>> {
        Ok(Arc::clone(self.index()?.document()))
    }

    /// Dereference a `$ref` schema against the loaded document
    ///
    /// Schemas without `$ref` come back unchanged. The input is not modified.
    pub fn resolve_ref(&self, schema: &Value) -> SchemaResult<Value> {
        let index = self.index()?;
        let resolved = resolver::resolve(index.document(), schema).map_err(|err| match err {
            RefError::Unresolved(_) => SchemaError::Resolution(err.to_string()),
            RefError::TooDeep(_) => SchemaError::configuration(err.to_string()),
        })?;
        Ok(resolved.clone())
    }

    /// Action schema by verb; ambiguous case-insensitive matches yield `None`
    pub fn get_action_schema(&self, verb: &str) -> SchemaResult<Option<Arc<PropertySchema>>> {
        Ok(self.index()?.action(verb).cloned())
    }

    /// Sub-action schema under a parent verb
    pub fn get_sub_action_schema(
        &self,
        parent_verb: &str,
        verb: &str,
    ) -> SchemaResult<Option<Arc<PropertySchema>>> {
        Ok(self.index()?.sub_action(parent_verb, verb).cloned())
    }

    /// Schema of an action, or of a sub-action when `parent` is given
    pub fn get_schema_for(
        &self,
        action: &Action,
        parent: Option<&Action>,
    ) -> SchemaResult<Option<Arc<PropertySchema>>> {
        match parent {
            Some(parent) => self.get_sub_action_schema(parent.verb().as_str(), action.verb().as_str()),
            None => self.get_action_schema(action.verb().as_str()),
        }
    }

    /// Root actions for "add action" pickers
    pub fn get_available_actions(&self) -> SchemaResult<Vec<ActionDescriptor>> {
        Ok(self.index()?.action_descriptors().to_vec())
    }

    /// Sub-actions addable under a parent verb
    pub fn get_available_sub_actions(&self, parent_verb: &str) -> SchemaResult<Vec<ActionDescriptor>> {
        Ok(self.index()?.sub_action_descriptors(parent_verb).to_vec())
    }

    /// Minimal action for a verb
    pub fn get_new_action_from_verb(&self, verb: &str) -> SchemaResult<Action> {
        let schema = self
            .get_action_schema(verb)?
            .ok_or_else(|| SchemaError::resolution(verb, None))?;
        Ok(defaults::new_action(canonical_verb(&schema, verb), &schema))
    }

    /// Minimal sub-action for a verb under a parent verb
    pub fn get_new_sub_action_from_verb(&self, parent_verb: &str, verb: &str) -> SchemaResult<Action> {
        let schema = self
            .get_sub_action_schema(parent_verb, verb)?
            .ok_or_else(|| SchemaError::resolution(verb, Some(parent_verb)))?;
        Ok(defaults::new_action(canonical_verb(&schema, verb), &schema))
    }

    /// Blank site script content
    #[must_use]
    pub fn get_new_site_script(&self) -> SiteScriptContent {
        SiteScriptContent::empty()
    }

    /// Display title of an action: schema title, else the verb
    pub fn get_action_title(&self, action: &Action, parent: Option<&Action>) -> SchemaResult<String> {
        let schema = self.get_schema_for(action, parent)?;
        Ok(schema
            .and_then(|s| s.title.clone())
            .unwrap_or_else(|| action.verb().to_string()))
    }

    /// Description of an action: schema description, else empty
    pub fn get_action_description(
        &self,
        action: &Action,
        parent: Option<&Action>,
    ) -> SchemaResult<String> {
        let schema = self.get_schema_for(action, parent)?;
        Ok(schema.and_then(|s| s.description.clone()).unwrap_or_default())
    }

    /// Summary rows for every schema property except `verb`
    ///
    /// `subactions` shows as `"{n} subactions"` and object-typed values as
    /// `"Complex object"`.
    pub fn get_properties_and_values(
        &self,
        action: &Action,
        parent: Option<&Action>,
    ) -> SchemaResult<Vec<PropertyValuePair>> {
        let schema = self.get_schema_for(action, parent)?.ok_or_else(|| {
            SchemaError::resolution(action.verb().as_str(), parent.map(|p| p.verb().as_str()))
        })?;

        let Some(properties) = schema.properties() else {
            return Ok(Vec::new());
        };

        let rows = properties
            .iter()
            .filter(|(name, _)| name.as_str() != VERB_PROPERTY)
            .map(|(name, property)| {
                let title = property.title.clone().unwrap_or_else(|| name.clone());
                let value = if name == SUBACTIONS_PROPERTY {
                    let count = action.subactions().map_or(0, <[Action]>::len);
                    Value::String(format!("{count} subactions"))
                } else if property.schema_type == Some(SchemaType::Object) {
                    Value::String("Complex object".to_string())
                } else {
                    action.property(name).cloned().unwrap_or(Value::Null)
                };
                PropertyValuePair {
                    property: title,
                    value,
                }
            })
            .collect();
        Ok(rows)
    }

    /// Whether the action's schema declares `subactions`
    ///
    /// An unresolvable schema answers `false`.
    pub fn has_sub_actions(&self, action: &Action) -> SchemaResult<bool> {
        match self.get_action_schema(action.verb().as_str())? {
            Some(schema) => Ok(schema.has_property(SUBACTIONS_PROPERTY)),
            None => {
                tracing::warn!(verb = %action.verb(), "action schema could not be resolved");
                Ok(false)
            }
        }
    }

    /// Validate JSON text against the whole document
    ///
    /// `Ok(false)` for schema violations, `Err(MalformedJson)` when the text
    /// is not JSON.
    pub fn validate(&self, json_text: &str) -> SchemaResult<bool> {
        let index = self.index()?;
        let instance = parse_instance(json_text)?;
        let valid = index.validator().is_valid(&instance);
        if !valid {
            tracing::debug!("document does not match the schema");
        }
        Ok(valid)
    }

    /// Validate JSON text and list every violation
    pub fn validate_report(&self, json_text: &str) -> SchemaResult<ValidationReport> {
        let index = self.index()?;
        let instance = parse_instance(json_text)?;
        Ok(index.validator().report(&instance))
    }

    /// Validate already-parsed content
    pub fn validate_value(&self, instance: &Value) -> SchemaResult<ValidationReport> {
        Ok(self.index()?.validator().report(instance))
    }
}

/// Verb literal declared by the schema, so case-insensitive hits get the exact spelling
fn canonical_verb(schema: &PropertySchema, requested: &str) -> Verb {
    schema
        .property(VERB_PROPERTY)
        .and_then(PropertySchema::single_literal)
        .map_or_else(|| Verb::new(requested), Verb::new)
}
