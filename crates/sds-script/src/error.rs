//! Error types for the script model

/// Errors raised while building or decoding script values
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Value is not a usable action object
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Verb string is empty or blank
    #[error("invalid verb: '{0}'")]
    InvalidVerb(String),

    /// JSON encoding or decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScriptError {
    /// Create invalid action error
    pub fn invalid_action(reason: impl Into<String>) -> Self {
        Self::InvalidAction(reason.into())
    }
}

/// Result type alias for script operations
pub type ScriptResult<T> = Result<T, ScriptError>;
