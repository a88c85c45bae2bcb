//! Property rendering dispatcher
//!
//! Decides, per `(main verb, sub verb, property)`, between a registered
//! custom renderer and the generic editor, and resolves labels.

use crate::custom::{CustomRenderInput, CustomRenderer, LabelResolver};
use crate::error::{RenderError, RenderResult};
use crate::generic::{self, Control, EditorFlags, PropertyEditor};
use dashmap::DashMap;
use moka::sync::Cache;
use sds_schema::{PropertySchema, SchemaEngine};
use sds_script::{Action, Verb, SUBACTIONS_PROPERTY, VERB_PROPERTY};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Properties skipped by [`PropertyRenderingDispatcher::resolve_action_editors`] by default
pub const DEFAULT_IGNORED_PROPERTIES: [&str; 2] = [VERB_PROPERTY, SUBACTIONS_PROPERTY];

const SCHEMA_CACHE_CAPACITY: u64 = 512;

type SchemaKey = (Verb, Option<Verb>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RendererKey {
    main: Verb,
    sub: Option<Verb>,
    property: String,
}

/// Result of resolving one property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderedEditor {
    /// Single control, generic or custom
    Property {
        /// The editor
        editor: PropertyEditor,
    },
    /// Full property sets of each sub-action
    SubActions {
        /// One entry per sub-action, in order
        actions: Vec<SubActionEditors>,
    },
    /// Property not declared by the schema
    Empty,
}

impl RenderedEditor {
    /// The single-property editor, if any
    #[must_use]
    pub fn as_property(&self) -> Option<&PropertyEditor> {
        match self {
            Self::Property { editor } => Some(editor),
            _ => None,
        }
    }
}

/// Editors of one sub-action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubActionEditors {
    /// Position within the parent's `subactions`
    pub index: usize,
    /// Sub-action verb
    pub verb: Verb,
    /// Property editors
    pub editors: Vec<RenderedEditor>,
}

/// Maps action properties to editors
pub struct PropertyRenderingDispatcher {
    engine: Arc<SchemaEngine>,
    renderers: DashMap<RendererKey, Arc<dyn CustomRenderer>>,
    label_resolvers: DashMap<SchemaKey, LabelResolver>,
    schemas: Cache<SchemaKey, Arc<PropertySchema>>,
}

impl fmt::Debug for PropertyRenderingDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRenderingDispatcher")
            .field("renderers", &self.renderers.len())
            .field("label_resolvers", &self.label_resolvers.len())
            .field("cached_schemas", &self.schemas.entry_count())
            .finish_non_exhaustive()
    }
}

impl PropertyRenderingDispatcher {
    /// Create dispatcher over an engine
    #[must_use]
    pub fn new(engine: Arc<SchemaEngine>) -> Self {
        Self {
            engine,
            renderers: DashMap::new(),
            label_resolvers: DashMap::new(),
            schemas: Cache::new(SCHEMA_CACHE_CAPACITY),
        }
    }

    /// Underlying schema engine
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &Arc<SchemaEngine> {
        &self.engine
    }

    /// Register a custom renderer; the last registration for a key wins
    ///
    /// A label resolver, when given, applies to every property of the
    /// `(main, sub)` action, whether or not it has a custom renderer. One
    /// resolver is kept per verb pair: registering another one for a
    /// different property of the same action replaces it for all properties.
    /// The resolver receives the property name.
    pub fn register_custom_renderer<R>(
        &self,
        main_verb: &str,
        sub_verb: Option<&str>,
        property: &str,
        renderer: R,
        label_resolver: Option<LabelResolver>,
    ) -> RenderResult<()>
    where
        R: CustomRenderer + 'static,
    {
        if main_verb.trim().is_empty() {
            return Err(RenderError::InvalidRegistration("main verb is empty".to_string()));
        }
        if property.trim().is_empty() {
            return Err(RenderError::InvalidRegistration(format!(
                "property is empty for '{main_verb}'"
            )));
        }

        let main = Verb::new(main_verb);
        let sub = sub_verb.filter(|s| !s.trim().is_empty()).map(Verb::new);

        if let Some(resolver) = label_resolver {
            self.label_resolvers.insert((main.clone(), sub.clone()), resolver);
        }

        let key = RendererKey {
            main,
            sub,
            property: property.to_string(),
        };
        if self.renderers.insert(key, Arc::new(renderer)).is_some() {
            tracing::debug!(main_verb, ?sub_verb, property, "replaced custom renderer");
        }
        Ok(())
    }

    /// Whether a custom renderer is registered for the exact key
    #[must_use]
    pub fn has_custom_renderer(&self, main_verb: &str, sub_verb: Option<&str>, property: &str) -> bool {
        self.renderers.contains_key(&RendererKey {
            main: Verb::new(main_verb),
            sub: sub_verb.map(Verb::new),
            property: property.to_string(),
        })
    }

    /// Number of registered custom renderers
    #[inline]
    #[must_use]
    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// Drop cached schemas, e.g. after the engine was reconfigured
    pub fn invalidate_schemas(&self) {
        self.schemas.invalidate_all();
    }

    /// Schema of an action, or of a sub-action under `parent`, cached per verb pair
    pub fn action_schema(
        &self,
        action: &Action,
        parent: Option<&Action>,
    ) -> RenderResult<Arc<PropertySchema>> {
        let key = schema_key(action, parent);
        if let Some(schema) = self.schemas.get(&key) {
            return Ok(schema);
        }

        let schema = self.engine.get_schema_for(action, parent)?.ok_or_else(|| {
            tracing::warn!(verb = %action.verb(), "action schema could not be resolved");
            RenderError::schema_resolution(
                action.verb().as_str(),
                parent.map(|p| p.verb().as_str()),
            )
        })?;
        self.schemas.insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    /// Editor for one property of an action
    pub fn resolve_editor(
        &self,
        action: &Action,
        parent: Option<&Action>,
        property: &str,
    ) -> RenderResult<RenderedEditor> {
        self.resolve_editor_with(action, parent, property, false)
    }

    /// Editor for one property, optionally read-only
    ///
    /// `subactions` is only valid on a root action and expands to the full
    /// property sets of every sub-action.
    pub fn resolve_editor_with(
        &self,
        action: &Action,
        parent: Option<&Action>,
        property: &str,
        read_only: bool,
    ) -> RenderResult<RenderedEditor> {
        if property == SUBACTIONS_PROPERTY {
            return self.resolve_sub_action_editors(action, parent, read_only);
        }

        let schema = self.action_schema(action, parent)?;
        let (main, sub) = schema_key(action, parent);
        let property_schema = schema.property(property);
        let label = self.label_for(&main, sub.as_ref(), property, property_schema);
        let flags = EditorFlags::required(schema.is_required(property)).with_read_only(read_only);
        let value = action.value_of(property);

        let renderer = self
            .renderers
            .get(&RendererKey {
                main: main.clone(),
                sub: sub.clone(),
                property: property.to_string(),
            })
            .map(|entry| Arc::clone(entry.value()));

        if let Some(renderer) = renderer {
            let control = renderer.render(&CustomRenderInput {
                main_verb: &main,
                sub_verb: sub.as_ref(),
                property,
                label: &label,
                value: value.as_ref(),
            });
            return Ok(RenderedEditor::Property {
                editor: PropertyEditor {
                    name: property.to_string(),
                    label,
                    required: flags.required,
                    read_only: flags.read_only,
                    control: Control::Custom { control },
                },
            });
        }

        Ok(
            match generic::render_property(property, property_schema, value.as_ref(), flags) {
                Some(editor) => RenderedEditor::Property {
                    editor: editor.with_label(label),
                },
                None => RenderedEditor::Empty,
            },
        )
    }

    /// Editors for every schema property not in `ignored`
    ///
    /// `None` ignores [`DEFAULT_IGNORED_PROPERTIES`]. Undeclared properties
    /// are left out.
    pub fn resolve_action_editors(
        &self,
        action: &Action,
        parent: Option<&Action>,
        ignored: Option<&[&str]>,
    ) -> RenderResult<Vec<RenderedEditor>> {
        self.resolve_action_editors_with(action, parent, ignored, false)
    }

    fn resolve_action_editors_with(
        &self,
        action: &Action,
        parent: Option<&Action>,
        ignored: Option<&[&str]>,
        read_only: bool,
    ) -> RenderResult<Vec<RenderedEditor>> {
        let ignored = ignored.unwrap_or(&DEFAULT_IGNORED_PROPERTIES);
        let schema = self.action_schema(action, parent)?;
        let Some(properties) = schema.properties() else {
            return Ok(Vec::new());
        };

        let mut editors = Vec::with_capacity(properties.len());
        for name in properties.keys() {
            if ignored.contains(&name.as_str()) {
                continue;
            }
            match self.resolve_editor_with(action, parent, name, read_only)? {
                RenderedEditor::Empty => {}
                editor => editors.push(editor),
            }
        }
        Ok(editors)
    }

    fn resolve_sub_action_editors(
        &self,
        action: &Action,
        parent: Option<&Action>,
        read_only: bool,
    ) -> RenderResult<RenderedEditor> {
        if let Some(parent) = parent {
            return Err(RenderError::structure(format!(
                "sub-action '{}' of '{}' cannot have subactions",
                action.verb(),
                parent.verb()
            )));
        }

        let actions = action
            .subactions()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, sub)| {
                Ok(SubActionEditors {
                    index,
                    verb: sub.verb().clone(),
                    editors: self.resolve_action_editors_with(sub, Some(action), None, read_only)?,
                })
            })
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(RenderedEditor::SubActions { actions })
    }

    /// Commit an editor change: the action with `property` set to `value`
    pub fn apply_property_change(
        &self,
        action: &Action,
        property: &str,
        value: serde_json::Value,
    ) -> RenderResult<Action> {
        Ok(action.with_value(property, value)?)
    }

    /// Commit a changed sub-action into its parent at `index`
    pub fn apply_sub_action_change(
        &self,
        parent: &Action,
        index: usize,
        sub_action: Action,
    ) -> RenderResult<Action> {
        let len = parent.subactions().map_or(0, <[Action]>::len);
        if index >= len {
            return Err(RenderError::structure(format!(
                "sub-action index {index} out of range for '{}' ({len} sub-actions)",
                parent.verb()
            )));
        }

        let mut updated = parent.clone();
        updated.subactions_mut()[index] = sub_action;
        Ok(updated)
    }

    /// Label precedence: non-empty resolver result, then schema title, then empty
    fn label_for(
        &self,
        main: &Verb,
        sub: Option<&Verb>,
        property: &str,
        schema: Option<&PropertySchema>,
    ) -> String {
        let resolver = self
            .label_resolvers
            .get(&(main.clone(), sub.cloned()))
            .map(|entry| Arc::clone(entry.value()));

        resolver
            .map(|resolve| resolve(property))
            .filter(|label| !label.is_empty())
            .or_else(|| schema.and_then(|s| s.title.clone()))
            .unwrap_or_default()
    }
}

fn schema_key(action: &Action, parent: Option<&Action>) -> SchemaKey {
    match parent {
        Some(parent) => (parent.verb().clone(), Some(action.verb().clone())),
        None => (action.verb().clone(), None),
    }
}
