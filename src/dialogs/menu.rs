//! Main menu and about panels
//!
//! Both are non-modal, so a backdrop click closes them. The main menu slides
//! in from the left edge instead of using the default fade.

use super::dialog::Dialog;
use super::types::{DialogOptions, DialogResult};
use crate::animations::{SlideDirection, SlideIn};
use crate::document::Document;
use std::ops::Deref;
use std::sync::Arc;

pub const MAIN_MENU_ANCHOR: &str = "dialogMainMenu";
pub const ABOUT_ANCHOR: &str = "dialogAbout";

#[derive(Debug, Clone)]
pub struct MainMenu {
    dialog: Dialog,
}

impl MainMenu {
    pub fn new(document: &mut Document) -> DialogResult<Self> {
        let dialog = Dialog::with_behavior(
            document,
            MAIN_MENU_ANCHOR,
            "",
            DialogOptions::new().modal(false),
            Arc::new(SlideIn::new(SlideDirection::FromLeft)),
        )?;
        Ok(Self { dialog })
    }
}

impl Deref for MainMenu {
    type Target = Dialog;

    fn deref(&self) -> &Dialog {
        &self.dialog
    }
}

#[derive(Debug, Clone)]
pub struct AboutDialog {
    dialog: Dialog,
}

impl AboutDialog {
    pub fn new(document: &mut Document) -> DialogResult<Self> {
        let dialog = Dialog::new(document, ABOUT_ANCHOR, "", DialogOptions::new().modal(false))?;
        Ok(Self { dialog })
    }
}

impl Deref for AboutDialog {
    type Target = Dialog;

    fn deref(&self) -> &Dialog {
        &self.dialog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::DialogManager;
    use crate::document::{NodeSpec, Transform};

    fn document() -> Document {
        Document::from_nodes(&[
            NodeSpec::new("nav").with_id(MAIN_MENU_ANCHOR),
            NodeSpec::new("div").with_id(ABOUT_ANCHOR),
        ])
    }

    #[test]
    fn test_menu_slides_in() {
        let mut manager = DialogManager::new(document());
        let menu = MainMenu::new(manager.document_mut()).unwrap();

        assert!(!menu.is_modal());
        assert_eq!(
            manager.document().style(menu.frame()).unwrap().transform,
            Some(Transform::translate(-100.0, 0.0))
        );

        menu.show(&mut manager);
        manager.settle();
        assert_eq!(
            manager.document().style(menu.frame()).unwrap().transform,
            Some(Transform::translate(0.0, 0.0))
        );

        menu.dismiss(&mut manager);
        assert_eq!(
            manager.document().style(menu.frame()).unwrap().transform,
            Some(Transform::translate(-100.0, 0.0))
        );
    }

    #[test]
    fn test_about_over_menu_closes_from_backdrop() {
        let mut manager = DialogManager::new(document());
        let menu = MainMenu::new(manager.document_mut()).unwrap();
        let about = AboutDialog::new(manager.document_mut()).unwrap();

        menu.show(&mut manager);
        about.show(&mut manager);
        assert!(manager.z_index_of(&about) > manager.z_index_of(&menu));

        manager.click(about.outer());
        assert_eq!(manager.top().map(|d| d.id().clone()), Some(menu.id().clone()));

        manager.click(menu.outer());
        assert!(manager.is_empty());
    }
}
