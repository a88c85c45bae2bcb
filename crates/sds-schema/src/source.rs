//! Where the schema document comes from

use crate::error::{SchemaError, SchemaResult};
use serde_json::Value;

/// Site script schema bundled with the crate
pub const EMBEDDED_SCHEMA: &str = include_str!("../schema/site-script-schema.json");

/// Origin of a schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Bundled default document
    Embedded,
    /// Absolute URL or site-relative path (`/...`) fetched over HTTP(S)
    Url(String),
    /// Raw JSON text
    Inline(String),
}

impl SchemaSource {
    /// Classify a configuration input
    ///
    /// Absent input is the embedded document, `/`, `http://` and `https://`
    /// prefixes are URLs, anything else is JSON text.
    #[must_use]
    pub fn from_input(input: Option<&str>) -> Self {
        match input {
            None => Self::Embedded,
            Some(text) if is_url(text) => Self::Url(text.to_string()),
            Some(text) => Self::Inline(text.to_string()),
        }
    }

    /// Short description for logs
    #[must_use]
    pub fn describe(&self) -> &str {
        match self {
            Self::Embedded => "embedded",
            Self::Url(url) => url,
            Self::Inline(_) => "inline",
        }
    }

    /// Load and parse the document
    pub async fn load(&self, client: &reqwest::Client, base_url: Option<&str>) -> SchemaResult<Value> {
        match self {
            Self::Embedded => parse_document(EMBEDDED_SCHEMA),
            Self::Inline(text) => parse_document(text),
            Self::Url(url) => {
                let url = absolute_url(url, base_url)?;
                tracing::debug!(url = %url, "fetching schema document");
                let text = fetch_text(client, &url).await?;
                parse_document(&text)
            }
        }
    }
}

fn is_url(text: &str) -> bool {
    text.starts_with('/') || text.starts_with("http://") || text.starts_with("https://")
}

/// Join a site-relative path onto the base URL
pub fn absolute_url(url: &str, base_url: Option<&str>) -> SchemaResult<String> {
    if !url.starts_with('/') {
        return Ok(url.to_string());
    }
    let base = base_url.ok_or_else(|| {
        SchemaError::configuration(format!("relative schema url '{url}' needs a base url"))
    })?;
    Ok(format!("{}{url}", base.trim_end_matches('/')))
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> SchemaResult<String> {
    let fetch_error = |source| SchemaError::Fetch {
        url: url.to_string(),
        source,
    };
    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_error)?
        .text()
        .await
        .map_err(fetch_error)
}

fn parse_document(text: &str) -> SchemaResult<Value> {
    serde_json::from_str(text)
        .map_err(|err| SchemaError::configuration(format!("schema document is not JSON: {err}")))
}
