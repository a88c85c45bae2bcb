//! Site Designs Studio script model
//!
//! Foundation types shared by every other crate of the workspace.
//!
//! # Core Concepts
//!
//! - [`Verb`]: identifier of an action type, drawn from the schema
//! - [`Action`]: one provisioning step (verb, properties, optional sub-actions)
//! - [`SiteScriptContent`]: the persisted unit (`$schema`, `actions`, `bindata`, `version`)
//! - [`SiteScript`] / [`SiteDesign`]: metadata records exchanged with the store
//!
//! # Example
//!
//! ```rust
//! use sds_script::{Action, SiteScriptContent};
//! use serde_json::json;
//!
//! let content: SiteScriptContent = serde_json::from_value(json!({
//!     "$schema": "schema.json",
//!     "actions": [{ "verb": "joinHubSite", "hubSiteId": "abc" }],
//!     "bindata": {},
//!     "version": 1
//! }))
//! .unwrap();
//!
//! assert_eq!(content.actions[0].verb().as_str(), "joinHubSite");
//! assert_eq!(content.actions[0].property("hubSiteId"), Some(&json!("abc")));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod action;
mod content;
mod error;
pub mod text;
mod verb;

pub use action::{Action, SUBACTIONS_PROPERTY, VERB_PROPERTY};
pub use content::{SiteDesign, SiteScript, SiteScriptContent, WebTemplate, DEFAULT_SCHEMA_REF};
pub use error::{ScriptError, ScriptResult};
pub use verb::Verb;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with scripts
    pub use crate::{Action, ScriptError, SiteDesign, SiteScript, SiteScriptContent, Verb};
}
