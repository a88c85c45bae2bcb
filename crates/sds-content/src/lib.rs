//! Action-Tree Edit Model
//!
//! Copy-on-write, keyed representation of a site script's actions and
//! sub-actions, independent of the schema engine.
//!
//! # Core Concepts
//!
//! - [`ContentUiWrapper`]: immutable tree; every edit returns a new instance
//! - [`UiAction`]: an action node plus its [`UiKey`]
//! - [`Debouncer`]: coalesces rapid commits into one flush of the latest value
//!
//! # Example
//!
//! ```rust
//! use sds_content::ContentUiWrapper;
//! use sds_script::Action;
//!
//! let empty = ContentUiWrapper::new(None);
//! let one = empty.add_action(Action::new("applyTheme"));
//! let two = one.add_action(Action::new("joinHubSite"));
//!
//! let reordered = two.reorder_actions(0, 1).unwrap();
//! assert_eq!(reordered.actions()[0].key().as_str(), "joinHubSite_0");
//! assert!(empty.actions().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod sync;
pub mod ui_key;
pub mod wrapper;

pub use error::{StructureError, StructureResult};
pub use sync::Debouncer;
pub use ui_key::UiKey;
pub use wrapper::{ActionOverrides, ContentUiWrapper, UiAction};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for tree editing
    pub use crate::{ContentUiWrapper, StructureError, UiAction, UiKey};
}
