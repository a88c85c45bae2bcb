//! Site Designs Studio core
//!
//! Composes the schema engine, the action tree and the rendering dispatcher
//! into an authoring studio for SharePoint site scripts.
//!
//! # Core Concepts
//!
//! - [`Studio`]: composition root built from a [`StudioConfig`]
//! - [`ScriptEditorSession`]: designer/code synchronisation and save gating
//! - [`SiteDesignsStore`]: persistence collaborator, [`InMemorySiteDesignsStore`] for tests
//! - [`pickers`]: built-in custom renderers backed by a [`DirectoryProvider`]
//!
//! # Example
//!
//! ```rust,no_run
//! use sds_core::{Studio, StudioConfig};
//! use sds_script::Action;
//!
//! # async fn example() -> sds_core::StudioResult<()> {
//! let studio = Studio::new(StudioConfig::default());
//! studio.configure(false).await?;
//!
//! let mut session = studio.new_script("Team site baseline");
//! let tree = session.wrapper().add_action(studio.engine().get_new_action_from_verb("applyTheme")?);
//! session.apply_designer(tree);
//! assert!(session.check_valid_for_save().is_ok());
//! session.save(studio.store().as_ref()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;
pub mod config;
pub mod error;
pub mod pickers;
pub mod session;
pub mod store;
pub mod studio;

pub use config::StudioConfig;
pub use error::{SaveBlocker, StoreError, StoreResult, StudioError, StudioResult};
pub use pickers::{DirectoryEntry, DirectoryProvider, StaticDirectory};
pub use session::{CodeState, CodeSync, ScriptEditorSession, SessionUpdate, UpdateOrigin};
pub use store::{InMemorySiteDesignsStore, SiteDesignsStore};
pub use studio::Studio;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for studio hosts
    pub use crate::{
        CodeSync, ScriptEditorSession, SiteDesignsStore, Studio, StudioConfig, StudioError,
        StudioResult,
    };
}
