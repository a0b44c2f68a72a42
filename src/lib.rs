//! Layered overlay dialogs over a host document
//!
//! - [`document`]: the in-memory host document dialogs attach to
//! - [`dialogs`]: dialog construction, the dialog stack and its manager
//! - [`animations`]: deferred entrance/exit transitions
//! - [`config`]: timing and layering configuration
//! - [`scenario`]: scripted replay of dialog sessions

pub mod animations;
pub mod config;
pub mod dialogs;
pub mod document;
pub mod scenario;

pub use config::Config;
pub use dialogs::{Dialog, DialogError, DialogId, DialogManager, DialogOptions, DialogResult};
pub use document::Document;
