//! Error types for the action tree

use crate::ui_key::UiKey;
use sds_script::ScriptError;

/// Illegal tree shape request
///
/// Always a caller contract violation. The wrapper the operation was called
/// on is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    /// No node carries this key
    #[error("unknown ui key: '{0}'")]
    UnknownKey(UiKey),

    /// Reorder index outside the list
    #[error("index {index} out of range for list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Parent has no sub-action list to reorder
    #[error("action '{0}' has no sub-actions")]
    NoSubActions(UiKey),

    /// Encoding the content as JSON failed
    #[error("serialization failed: {0}")]
    Serialization(#[from] ScriptError),
}

impl StructureError {
    /// Check an index against a list length
    pub fn check_index(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfRange { index, len })
        }
    }
}

/// Result type alias for tree operations
pub type StructureResult<T> = Result<T, StructureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_display() {
        let err = StructureError::check_index(3, 3).unwrap_err();
        assert_eq!(err.to_string(), "index 3 out of range for list of 3");
        assert!(StructureError::check_index(2, 3).is_ok());
    }

    #[test]
    fn unknown_key_display() {
        let err = StructureError::UnknownKey(UiKey::from("applyTheme_4"));
        assert_eq!(err.to_string(), "unknown ui key: 'applyTheme_4'");
    }
}
