//! Property Rendering Dispatcher and Generic Schema-Driven Editors
//!
//! Turns action properties into editor descriptions. Each property gets
//! either a registered custom control or a generic editor derived from its
//! resolved schema; changes are committed back as new [`Action`] values.
//!
//! # Core Concepts
//!
//! - [`PropertyRenderingDispatcher`]: renderer registry, label resolution, per-verb schema cache
//! - [`generic`]: schema-driven controls and their value-change helpers
//! - [`CustomRenderer`]: host-supplied controls, e.g. pickers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sds_render::{PropertyRenderingDispatcher, RenderedEditor};
//! use sds_schema::SchemaEngine;
//! use sds_script::Action;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Arc::new(SchemaEngine::new());
//! engine.configure(None, false).await?;
//!
//! let dispatcher = PropertyRenderingDispatcher::new(engine);
//! let action = Action::new("applyTheme");
//! let editor = dispatcher.resolve_editor(&action, None, "themeName")?;
//! assert!(matches!(editor, RenderedEditor::Property { .. }));
//!
//! let changed = dispatcher.apply_property_change(&action, "themeName", json!("Contoso"))?;
//! assert_eq!(changed.property("themeName"), Some(&json!("Contoso")));
//! # Ok(())
//! # }
//! ```
//!
//! [`Action`]: sds_script::Action

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod custom;
pub mod dispatcher;
pub mod error;
pub mod generic;

pub use custom::{ChoiceOption, CustomControl, CustomRenderInput, CustomRenderer, LabelResolver};
pub use dispatcher::{
    PropertyRenderingDispatcher, RenderedEditor, SubActionEditors, DEFAULT_IGNORED_PROPERTIES,
};
pub use error::{RenderError, RenderResult};
pub use generic::{Control, EditorFlags, PropertyEditor};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for editor dispatch
    pub use crate::{
        Control, CustomControl, CustomRenderer, PropertyEditor, PropertyRenderingDispatcher,
        RenderError, RenderedEditor,
    };
}
