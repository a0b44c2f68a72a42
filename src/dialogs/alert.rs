//! Alert dialog
//!
//! A modal message box bound to the `dialogAlert` anchor. The message text is
//! written into the `#alertMessage` element inside the anchor, if it has one.

use super::dialog::Dialog;
use super::manager::DialogManager;
use super::types::{DialogOptions, DialogResult};
use crate::document::Document;
use std::ops::Deref;

/// Anchor id the alert binds to
pub const ALERT_ANCHOR: &str = "dialogAlert";

/// Id of the element receiving the message text
pub const ALERT_MESSAGE: &str = "alertMessage";

#[derive(Debug, Clone)]
pub struct AlertDialog {
    dialog: Dialog,
}

impl AlertDialog {
    /// Bind the alert and set its message; modal with a close button
    pub fn new(document: &mut Document, message: &str, title: Option<&str>) -> DialogResult<Self> {
        Self::with_options(document, message, title, DialogOptions::default())
    }

    pub fn with_options(
        document: &mut Document,
        message: &str,
        title: Option<&str>,
        options: DialogOptions,
    ) -> DialogResult<Self> {
        let dialog = Dialog::new(document, ALERT_ANCHOR, title.unwrap_or(""), options)?;

        if let Some(target) = dialog.child_element(document, &format!("#{}", ALERT_MESSAGE)) {
            document.set_text(target, message);
        }

        Ok(Self { dialog })
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Dismiss the alert by identity, wherever it sits in the stack
    pub fn dismiss_current(manager: &mut DialogManager) -> DialogResult<()> {
        let alert = Self::new(manager.document_mut(), "", None)?;
        alert.dismiss(manager);
        Ok(())
    }
}

impl Deref for AlertDialog {
    type Target = Dialog;

    fn deref(&self) -> &Dialog {
        &self.dialog
    }
}

/// Show `message` in the alert dialog
pub fn alert(manager: &mut DialogManager, message: &str) -> DialogResult<AlertDialog> {
    let alert = AlertDialog::new(manager.document_mut(), message, None)?;
    alert.show(manager);
    Ok(alert)
}
