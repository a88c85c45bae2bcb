//! Error types for the studio

use sds_content::StructureError;
use sds_render::RenderError;
use sds_schema::SchemaError;
use sds_script::ScriptError;

/// Errors raised by a persistence collaborator
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with that id
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Record kind, e.g. `"site script"`
        kind: &'static str,
        /// Requested id
        id: String,
    },

    /// Backend failure
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create not-found error
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a script cannot be saved yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SaveBlocker {
    /// Title is empty
    #[error("Please set the title of the Site Script...")]
    MissingTitle,

    /// Code view holds invalid or malformed JSON
    #[error("Please check the validity of the code...")]
    InvalidCode,
}

/// Studio errors
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Schema engine failure
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Action tree contract violation
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// Editor dispatch failure
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Script decoding failure
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Save attempted while blocked
    #[error("cannot save: {0}")]
    NotSaveable(#[from] SaveBlocker),

    /// Invalid studio configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory lookup failed
    #[error("directory lookup failed: {0}")]
    Directory(String),

    /// File system failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Create configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// Create directory error
    pub fn directory(reason: impl Into<String>) -> Self {
        Self::Directory(reason.into())
    }
}

/// Result type alias for studio operations
pub type StudioResult<T> = Result<T, StudioError>;
