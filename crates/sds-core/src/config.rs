//! Studio configuration
//!
//! Loaded from TOML; every field has a default so partial files work.
//!
//! ```toml
//! schema_source = "/sites/studio/schema.json"
//! base_url = "https://contoso.sharepoint.com"
//! code_debounce_ms = 500
//! log_filter = "sds=debug"
//! ```

use crate::error::{StudioError, StudioResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Studio configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Schema document: `None` for the bundled one, a URL, or inline JSON
    pub schema_source: Option<String>,
    /// Base URL for `/`-relative schema sources
    pub base_url: Option<String>,
    /// Delay before code-view edits are applied
    pub code_debounce_ms: u64,
    /// Delay before designer edits are committed
    pub commit_debounce_ms: u64,
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Register the built-in pickers on configure
    pub register_default_pickers: bool,
}

impl StudioConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> StudioResult<Self> {
        toml::from_str(text).map_err(|err| StudioError::config(err.to_string()))
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> StudioResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded studio configuration");
        Ok(config)
    }

    /// With schema source
    #[must_use]
    pub fn with_schema_source(mut self, source: impl Into<String>) -> Self {
        self.schema_source = Some(source.into());
        self
    }

    /// With base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// With code-view debounce delay
    #[inline]
    #[must_use]
    pub fn with_code_debounce(mut self, delay: Duration) -> Self {
        self.code_debounce_ms = duration_ms(delay);
        self
    }

    /// With designer commit debounce delay
    #[inline]
    #[must_use]
    pub fn with_commit_debounce(mut self, delay: Duration) -> Self {
        self.commit_debounce_ms = duration_ms(delay);
        self
    }

    /// With default log filter
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// With or without the built-in pickers
    #[inline]
    #[must_use]
    pub fn with_default_pickers(mut self, register: bool) -> Self {
        self.register_default_pickers = register;
        self
    }

    /// Code-view debounce delay
    #[inline]
    #[must_use]
    pub fn code_debounce(&self) -> Duration {
        Duration::from_millis(self.code_debounce_ms)
    }

    /// Designer commit debounce delay
    #[inline]
    #[must_use]
    pub fn commit_debounce(&self) -> Duration {
        Duration::from_millis(self.commit_debounce_ms)
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            schema_source: None,
            base_url: None,
            code_debounce_ms: 500,
            commit_debounce_ms: 0,
            log_filter: "info".to_string(),
            register_default_pickers: true,
        }
    }
}

fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = StudioConfig::default();
        assert_eq!(config.code_debounce(), Duration::from_millis(500));
        assert_eq!(config.commit_debounce(), Duration::ZERO);
        assert!(config.register_default_pickers);
        assert!(config.schema_source.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = StudioConfig::from_toml_str(
            r#"
            base_url = "https://contoso.sharepoint.com"
            code_debounce_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://contoso.sharepoint.com"));
        assert_eq!(config.code_debounce_ms, 250);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = StudioConfig::from_toml_str("code_debounce_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }

    #[test]
    fn builder() {
        let config = StudioConfig::new()
            .with_schema_source("/schema.json")
            .with_base_url("https://contoso.sharepoint.com")
            .with_code_debounce(Duration::from_millis(100))
            .with_default_pickers(false);
        assert_eq!(config.schema_source.as_deref(), Some("/schema.json"));
        assert_eq!(config.code_debounce_ms, 100);
        assert!(!config.register_default_pickers);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studio.toml");
        std::fs::write(&path, "log_filter = \"sds=debug\"\n").unwrap();

        let config = StudioConfig::load(&path).unwrap();
        assert_eq!(config.log_filter, "sds=debug");

        let err = StudioConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, StudioError::Io(_)));
    }
}
