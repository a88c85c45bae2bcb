//! JSON text helpers for the code view

use crate::error::ScriptResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::borrow::Cow;

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*(.*)\*/").expect("block comment pattern is valid"));

/// Serialize with 4-space indentation
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> ScriptResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Remove single-line `/* ... */` comments
///
/// Comments are only matched within a line; the code view allows them as
/// annotations but the schema validator does not.
#[must_use]
pub fn strip_block_comments(text: &str) -> Cow<'_, str> {
    BLOCK_COMMENT.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn indents_with_four_spaces() {
        let text = to_indented_json(&json!({ "actions": [] , "version": 1 })).unwrap();
        assert_eq!(text, "{\n    \"actions\": [],\n    \"version\": 1\n}");
    }

    #[test]
    fn strips_comments() {
        let text = "{ /* hub */ \"actions\": [] }";
        assert_eq!(strip_block_comments(text), "{  \"actions\": [] }");
    }

    #[test]
    fn untouched_without_comments() {
        let text = "{\"actions\":[]}";
        assert!(matches!(strip_block_comments(text), Cow::Borrowed(_)));
    }

    proptest::proptest! {
        #[test]
        fn text_without_comment_markers_is_kept(text in "[a-zA-Z0-9{}\\[\\]\" :,.]*") {
            proptest::prop_assert_eq!(strip_block_comments(&text), text.as_str());
        }
    }
}
