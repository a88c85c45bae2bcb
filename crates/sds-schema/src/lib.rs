//! Schema Resolution Engine
//!
//! Turns a site script schema document into verb-indexed lookup tables and
//! exposes schema-derived metadata and validation.
//!
//! # Core Operations
//!
//! - **Configure**: load the document (embedded, URL or inline JSON) and build the index
//! - **Lookup**: action and sub-action schemas by verb, exact then unique case-insensitive
//! - **Synthesize**: minimal new actions with defaults for required properties
//! - **Validate**: full JSON-Schema validation of script text
//!
//! # Architecture
//!
//! ```text
//! SchemaSource → serde_json::Value → SchemaIndex (PropertySchema trees, $ref resolved)
//!                                          ↓
//!                          SchemaEngine (RwLock<Option<Arc<SchemaIndex>>>)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use sds_schema::SchemaEngine;
//!
//! # async fn example() -> Result<(), sds_schema::SchemaError> {
//! let engine = SchemaEngine::new();
//! engine.configure(None, false).await?;
//!
//! let action = engine.get_new_action_from_verb("joinHubSite")?;
//! assert_eq!(action.verb().as_str(), "joinHubSite");
//!
//! assert!(engine.validate(r#"{"actions":[{"verb":"joinHubSite","hubSiteId":"abc"}]}"#)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod defaults;
pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod resolver;
pub mod source;
pub mod validation;

pub use defaults::{default_value, default_value_for};
pub use engine::{PropertyValuePair, SchemaEngine};
pub use error::{SchemaError, SchemaResult};
pub use index::{ActionDescriptor, SchemaIndex};
pub use model::{PropertySchema, SchemaType, Shape};
pub use source::{SchemaSource, EMBEDDED_SCHEMA};
pub use validation::{ValidationReport, Violation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for schema consumers
    pub use crate::{
        default_value, ActionDescriptor, PropertySchema, SchemaEngine, SchemaError, SchemaResult,
        SchemaType,
    };
}
