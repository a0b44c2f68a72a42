//! Dialog system for layered overlays
//!
//! A [`Dialog`] wraps an anchor element of the host document in a backdrop and
//! frame; the [`DialogManager`] keeps the stack of open dialogs, assigns their
//! z-order and sequences their entrance and exit transitions.

pub mod alert;
pub mod behavior;
pub mod dialog;
pub mod layer;
pub mod manager;
pub mod menu;
pub mod types;

pub use alert::{alert, AlertDialog};
pub use behavior::{DialogBehavior, StyleContext};
pub use dialog::Dialog;
pub use layer::DialogLayer;
pub use manager::DialogManager;
pub use menu::{AboutDialog, MainMenu};
pub use types::*;
