//! Error types for editor dispatch

use sds_schema::SchemaError;
use sds_script::ScriptError;

/// Errors raised while resolving or committing property editors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Call violates the action tree's shape
    #[error("structure error: {0}")]
    Structure(String),

    /// Action or sub-action schema could not be resolved
    #[error("schema resolution failed for {0}")]
    SchemaResolution(String),

    /// Renderer registration rejected
    #[error("invalid renderer registration: {0}")]
    InvalidRegistration(String),

    /// Schema engine failure
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl RenderError {
    /// Create structure error
    pub fn structure(reason: impl Into<String>) -> Self {
        Self::Structure(reason.into())
    }

    /// Create resolution error for a verb, optionally under a parent verb
    pub fn schema_resolution(verb: &str, parent: Option<&str>) -> Self {
        match parent {
            Some(parent) => Self::SchemaResolution(format!("sub-action '{verb}' of '{parent}'")),
            None => Self::SchemaResolution(format!("action '{verb}'")),
        }
    }
}

impl From<ScriptError> for RenderError {
    fn from(err: ScriptError) -> Self {
        Self::Structure(err.to_string())
    }
}

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;
