//! Text output of the `sds-studio` commands

use crate::error::StudioResult;
use sds_schema::{ActionDescriptor, PropertyValuePair, SchemaEngine, ValidationReport};
use sds_script::text::strip_block_comments;
use sds_script::{Action, SiteScriptContent};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::Path;

/// Read a script file with block comments removed
pub fn read_script_text(path: impl AsRef<Path>) -> StudioResult<String> {
    let text = std::fs::read_to_string(path)?;
    Ok(strip_block_comments(&text).into_owned())
}

/// One line per action: verb, label and description
#[must_use]
pub fn format_actions(descriptors: &[ActionDescriptor]) -> String {
    let width = descriptors.iter().map(|d| d.verb.as_str().len()).max().unwrap_or(0);
    let mut out = String::new();
    for descriptor in descriptors {
        write!(out, "{:<width$}  {}", descriptor.verb.as_str(), descriptor.label).ok();
        if !descriptor.description.is_empty() {
            write!(out, " - {}", descriptor.description).ok();
        }
        out.push('\n');
    }
    out
}

/// `valid`, or one line per violation
#[must_use]
pub fn format_report(report: &ValidationReport) -> String {
    if report.is_valid() {
        return "valid\n".to_string();
    }

    let mut out = format!("invalid ({} violations)\n", report.violations.len());
    for violation in &report.violations {
        let path = if violation.instance_path.is_empty() {
            "/"
        } else {
            violation.instance_path.as_str()
        };
        writeln!(out, "  {path}: {}", violation.message).ok();
    }
    out
}

/// Titles and property summaries of every action and sub-action
pub fn format_summary(engine: &SchemaEngine, content: &SiteScriptContent) -> StudioResult<String> {
    let mut out = String::new();
    for (index, action) in content.actions.iter().enumerate() {
        let title = engine.get_action_title(action, None)?;
        writeln!(out, "{}. {title} ({})", index + 1, action.verb()).ok();
        write_rows(&mut out, "   ", &engine.get_properties_and_values(action, None)?);

        for sub in action.subactions().unwrap_or_default() {
            write_sub_action(&mut out, engine, sub, action)?;
        }
    }
    Ok(out)
}

fn write_sub_action(
    out: &mut String,
    engine: &SchemaEngine,
    sub: &Action,
    parent: &Action,
) -> StudioResult<()> {
    let title = engine.get_action_title(sub, Some(parent))?;
    writeln!(out, "   - {title} ({})", sub.verb()).ok();
    write_rows(out, "       ", &engine.get_properties_and_values(sub, Some(parent))?);
    Ok(())
}

fn write_rows(out: &mut String, indent: &str, rows: &[PropertyValuePair]) {
    for row in rows {
        let value = match &row.value {
            Value::Null => "-".to_string(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        writeln!(out, "{indent}{}: {value}", row.property).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sds_schema::Violation;
    use sds_test_utils::{fixture_engine, sample_script};

    #[test]
    fn report_lists_violations() {
        let report = ValidationReport {
            violations: vec![Violation {
                instance_path: String::new(),
                message: "\"actions\" is a required property".to_string(),
            }],
        };
        assert_eq!(
            format_report(&report),
            "invalid (1 violations)\n  /: \"actions\" is a required property\n"
        );
        assert_eq!(format_report(&ValidationReport::default()), "valid\n");
    }

    #[tokio::test]
    async fn actions_are_aligned() {
        let engine = fixture_engine().await;
        let text = format_actions(&engine.get_available_actions().unwrap());
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("applyTheme "));
        assert!(first.ends_with("Apply a Theme - Apply a theme to the site"));
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn summary_covers_sub_actions() {
        let engine = fixture_engine().await;
        let summary = format_summary(&engine, &sample_script()).unwrap();
        let lines: Vec<_> = summary.lines().collect();

        assert_eq!(lines[0], "1. Apply a Theme (applyTheme)");
        assert_eq!(lines[1], "   Theme name: Contoso Blue");
        assert_eq!(lines[2], "2. Create a List (createSPList)");
        assert!(lines.contains(&"   Sub actions: 2 subactions"));
        assert!(lines.contains(&"   - Set the Title (setTitle)"));
        assert!(lines.contains(&"       Title: Clients"));
        assert!(lines.contains(&"   Hidden: -"));
    }

    #[test]
    fn read_strips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, "{ /* draft */ \"actions\": [] }").unwrap();
        assert_eq!(read_script_text(&path).unwrap(), "{  \"actions\": [] }");
    }
}
