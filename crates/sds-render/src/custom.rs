//! Custom renderer seam
//!
//! Hosts replace the generic editor of one `(main verb, sub verb, property)`
//! with their own control, typically a picker backed by a directory lookup.

use sds_script::Verb;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Selectable entry of a picker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    /// Value written into the action when chosen
    pub key: Value,
    /// Display text
    pub text: String,
}

impl ChoiceOption {
    /// Create option
    #[must_use]
    pub fn new(key: impl Into<Value>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// What a custom renderer is asked to render
#[derive(Debug, Clone, Copy)]
pub struct CustomRenderInput<'a> {
    /// Root action verb
    pub main_verb: &'a Verb,
    /// Sub-action verb when rendering a sub-action property
    pub sub_verb: Option<&'a Verb>,
    /// Property name
    pub property: &'a str,
    /// Resolved label
    pub label: &'a str,
    /// Current value, if set
    pub value: Option<&'a Value>,
}

/// Control produced by a custom renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomControl {
    /// Control kind, e.g. `"hubSitePicker"`
    pub kind: String,
    /// Label shown with the control
    pub label: String,
    /// Current value
    pub value: Value,
    /// Selectable options, empty for free-form controls
    pub options: Vec<ChoiceOption>,
}

impl CustomControl {
    /// Control of a kind showing `value`
    #[must_use]
    pub fn new(kind: impl Into<String>, label: impl Into<String>, value: Value) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            value,
            options: Vec::new(),
        }
    }

    /// With selectable options
    #[must_use]
    pub fn with_options(mut self, options: Vec<ChoiceOption>) -> Self {
        self.options = options;
        self
    }

    /// Whether `value` is one of the options
    #[must_use]
    pub fn offers(&self, value: &Value) -> bool {
        self.options.iter().any(|option| &option.key == value)
    }
}

/// Renders one property in place of the generic editor
///
/// Changes flow back through
/// [`PropertyRenderingDispatcher::apply_property_change`](crate::PropertyRenderingDispatcher::apply_property_change).
pub trait CustomRenderer: Send + Sync {
    /// Produce the control for the property
    fn render(&self, input: &CustomRenderInput<'_>) -> CustomControl;
}

impl<F> CustomRenderer for F
where
    F: Fn(&CustomRenderInput<'_>) -> CustomControl + Send + Sync,
{
    fn render(&self, input: &CustomRenderInput<'_>) -> CustomControl {
        self(input)
    }
}

/// Maps a property name to a display label; empty means "no opinion"
pub type LabelResolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn closures_are_renderers() {
        let renderer = |input: &CustomRenderInput<'_>| {
            CustomControl::new("echo", input.label, input.value.cloned().unwrap_or(Value::Null))
        };
        let verb = Verb::new("applyTheme");
        let value = json!("Contoso");
        let control = renderer.render(&CustomRenderInput {
            main_verb: &verb,
            sub_verb: None,
            property: "themeName",
            label: "Theme",
            value: Some(&value),
        });
        assert_eq!(control.kind, "echo");
        assert_eq!(control.label, "Theme");
        assert_eq!(control.value, json!("Contoso"));
    }

    #[test]
    fn offers_checks_option_keys() {
        let control = CustomControl::new("picker", "", Value::Null)
            .with_options(vec![ChoiceOption::new(100, "Generic list")]);
        assert!(control.offers(&json!(100)));
        assert!(!control.offers(&json!(101)));
    }
}
