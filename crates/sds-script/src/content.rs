//! Persisted script content and site metadata records

use crate::action::Action;
use crate::error::ScriptResult;
use crate::text::to_indented_json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number};
use std::fmt;

/// `$schema` value written into new scripts
pub const DEFAULT_SCHEMA_REF: &str = "schema.json";

/// The persisted unit of a site script
///
/// Serialized as `{ "$schema", "actions", "bindata", "version" }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteScriptContent {
    /// Schema reference
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema_ref: Option<String>,
    /// Ordered action list
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Free-form data carried alongside the actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindata: Option<Map<String, serde_json::Value>>,
    /// Content version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Number>,
}

impl SiteScriptContent {
    /// Blank script: `{"$schema":"schema.json","actions":[],"bindata":{},"version":1}`
    #[must_use]
    pub fn empty() -> Self {
        Self {
            schema_ref: Some(DEFAULT_SCHEMA_REF.to_string()),
            actions: Vec::new(),
            bindata: Some(Map::new()),
            version: Some(Number::from(1)),
        }
    }

    /// With actions
    #[must_use]
    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    /// Parse from JSON text
    pub fn from_json(text: &str) -> ScriptResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Indented JSON text (4 spaces)
    pub fn to_json(&self) -> ScriptResult<String> {
        to_indented_json(self)
    }
}

/// Site script metadata record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteScript {
    /// Identifier, absent until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Record version
    #[serde(default)]
    pub version: u32,
    /// Parsed content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<SiteScriptContent>,
}

impl SiteScript {
    /// Create a titled script with blank content
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            version: 1,
            content: Some(SiteScriptContent::empty()),
        }
    }
}

/// Base web template of a site design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WebTemplate {
    /// Team site (`"64"`)
    #[default]
    #[serde(rename = "64")]
    TeamSite,
    /// Communication site (`"68"`)
    #[serde(rename = "68")]
    CommunicationSite,
}

impl WebTemplate {
    /// SharePoint template code
    #[inline]
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::TeamSite => "64",
            Self::CommunicationSite => "68",
        }
    }
}

impl fmt::Display for WebTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamSite => write!(f, "Team site"),
            Self::CommunicationSite => write!(f, "Communication site"),
        }
    }
}

/// Site design metadata record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteDesign {
    /// Identifier, absent until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Base web template
    #[serde(default)]
    pub web_template: WebTemplate,
    /// Scripts applied by this design, in order
    #[serde(default)]
    pub site_script_ids: Vec<String>,
    /// Preview image
    #[serde(default)]
    pub preview_image_url: String,
    /// Preview image alternative text
    #[serde(default)]
    pub preview_image_alt_text: String,
    /// Default design for its template
    #[serde(default)]
    pub is_default: bool,
    /// Record version
    #[serde(default)]
    pub version: u32,
}

impl SiteDesign {
    /// Create a titled design
    #[must_use]
    pub fn new(title: impl Into<String>, web_template: WebTemplate) -> Self {
        Self {
            title: title.into(),
            web_template,
            version: 1,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_content_shape() {
        let value = serde_json::to_value(SiteScriptContent::empty()).unwrap();
        assert_eq!(
            value,
            json!({ "$schema": "schema.json", "actions": [], "bindata": {}, "version": 1 })
        );
    }

    #[test]
    fn content_keeps_field_order() {
        let text = r#"{"$schema":"schema.json","actions":[{"verb":"joinHubSite","hubSiteId":"abc"}],"bindata":{},"version":1}"#;
        let content = SiteScriptContent::from_json(text).unwrap();
        assert_eq!(serde_json::to_string(&content).unwrap(), text);
    }

    #[test]
    fn content_defaults_missing_fields() {
        let content = SiteScriptContent::from_json(r#"{"actions":[]}"#).unwrap();
        assert!(content.schema_ref.is_none());
        assert!(content.bindata.is_none());
        assert_eq!(serde_json::to_string(&content).unwrap(), r#"{"actions":[]}"#);
    }

    #[test]
    fn site_design_pascal_case() {
        let mut design = SiteDesign::new("Project site", WebTemplate::CommunicationSite);
        design.site_script_ids = vec!["s1".to_string()];

        let value = serde_json::to_value(&design).unwrap();
        assert_eq!(value["Title"], json!("Project site"));
        assert_eq!(value["WebTemplate"], json!("68"));
        assert_eq!(value["SiteScriptIds"], json!(["s1"]));
        assert_eq!(value["IsDefault"], json!(false));
        assert!(value.get("Id").is_none());
    }

    #[test]
    fn site_script_round_trip() {
        let script = SiteScript::new("Hub join");
        let text = serde_json::to_string(&script).unwrap();
        let parsed: SiteScript = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, script);
    }
}
