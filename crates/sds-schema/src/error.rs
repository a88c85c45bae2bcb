//! Error types for the schema engine
//!
//! Schema violations are not errors: `validate` answers `Ok(false)` and
//! `validate_report` lists them. Only text that is not JSON at all is
//! reported as [`SchemaError::MalformedJson`].

/// Errors raised by the schema resolution engine
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Schema document is structurally unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Schema-dependent call before `configure` completed
    #[error("schema engine is not configured")]
    NotConfigured,

    /// No unique schema for a verb or verb pair
    #[error("no schema for {0}")]
    Resolution(String),

    /// Text is not JSON
    #[error("malformed json: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// Remote schema document could not be retrieved
    #[error("failed to fetch schema from {url}: {source}")]
    Fetch {
        /// Absolute URL requested
        url: String,
        /// Transport or decoding failure
        #[source]
        source: reqwest::Error,
    },
}

impl SchemaError {
    /// Create configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    /// Create resolution error for a verb, optionally under a parent verb
    pub fn resolution(verb: &str, parent: Option<&str>) -> Self {
        match parent {
            Some(parent) => Self::Resolution(format!("sub-action '{verb}' of '{parent}'")),
            None => Self::Resolution(format!("action '{verb}'")),
        }
    }

    /// Whether the error is a sequencing defect at the call site
    #[inline]
    #[must_use]
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
