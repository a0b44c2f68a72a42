//! Core dialog types
//!
//! Identity, construction options, lifecycle events and the error type of the
//! dialog system.

use serde::{Deserialize, Serialize};

/// Structural class names; the external stylesheet keys on these
pub mod classes {
    pub const OUTER: &str = "dialogOuter";
    pub const FRAME: &str = "dialogFrame";
    pub const BODY: &str = "dialogBody";
    pub const TITLE: &str = "dialogTitle";
    pub const TITLE_CONTENT: &str = "dialogTitleContent";
    pub const BUTTON_FACE: &str = "buttonFace";
    pub const CLOSE_BUTTON: &str = "dialogCloseButton";
}

/// Glyph shown on the title bar close control
pub const CLOSE_GLYPH: &str = "\u{2715}";

/// Dialog identity: the `#id` selector of its anchor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(String);

impl DialogId {
    /// Identity for the anchor with element id `anchor_id`
    pub fn for_anchor(anchor_id: &str) -> Self {
        Self(format!("#{}", anchor_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element id without the leading `#`
    pub fn anchor_id(&self) -> &str {
        self.0.strip_prefix('#').unwrap_or(&self.0)
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DialogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogOptions {
    /// Modal dialogs ignore backdrop clicks
    pub modal: bool,
    /// Whether the title bar carries a close control
    pub close_button: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            modal: true,
            close_button: true,
        }
    }
}

impl DialogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn close_button(mut self, close_button: bool) -> Self {
        self.close_button = close_button;
        self
    }
}

/// Lifecycle notifications sent on the manager's event channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// Dialog was pushed and displayed with the given z-index
    Shown { id: DialogId, z_index: i32 },
    /// Dialog left the stack; its exit transition is running
    Closed { id: DialogId },
    /// Dialog was removed from layout after its exit transition
    Hidden { id: DialogId },
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DialogError {
    #[error("selector ({0}) is not found")]
    AnchorNotFound(DialogId),
}
