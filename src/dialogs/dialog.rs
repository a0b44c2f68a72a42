//! A dialog bound to an anchor element
//!
//! Constructing a [`Dialog`] turns a plain anchor into the three-level overlay
//! structure
//!
//! ```text
//! div#<anchor>.dialogOuter      backdrop, owns the anchor id
//!   div.dialogFrame             visible panel
//!     div.dialogTitle           rebuilt on every construction
//!     <anchor>.dialogBody       the original content, moved in place
//! ```
//!
//! or, when the anchor id already names such a structure, re-attaches to it.
//! Either way the same id always yields the same three elements.

use super::behavior::DialogBehavior;
use super::manager::DialogManager;
use super::types::{classes, DialogError, DialogId, DialogOptions, DialogResult, CLOSE_GLYPH};
use crate::animations::FadeScale;
use crate::document::{Document, Listener, NodeId};
use std::sync::Arc;
use tracing::debug;

/// Outer, frame and body elements of a wrapped anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Parts {
    outer: NodeId,
    frame: NodeId,
    body: NodeId,
}

/// Handle to one overlay dialog
///
/// Cheap to clone; clones share identity. The elements themselves live in the
/// [`Document`] for as long as it exists.
#[derive(Debug, Clone)]
pub struct Dialog {
    id: DialogId,
    modal: bool,
    outer: NodeId,
    frame: NodeId,
    body: NodeId,
    behavior: Arc<dyn DialogBehavior>,
}

impl Dialog {
    /// Bind a dialog with the default fade + scale behavior
    pub fn new(
        document: &mut Document,
        anchor_id: &str,
        title: &str,
        options: DialogOptions,
    ) -> DialogResult<Self> {
        Self::with_behavior(document, anchor_id, title, options, Arc::new(FadeScale))
    }

    /// Bind a dialog with a custom [`DialogBehavior`]
    ///
    /// Fails with [`DialogError::AnchorNotFound`] before touching the document
    /// when no attached element has id `anchor_id`.
    pub fn with_behavior(
        document: &mut Document,
        anchor_id: &str,
        title: &str,
        options: DialogOptions,
        behavior: Arc<dyn DialogBehavior>,
    ) -> DialogResult<Self> {
        let id = DialogId::for_anchor(anchor_id);
        let target = document
            .find_by_id(anchor_id)
            .ok_or_else(|| DialogError::AnchorNotFound(id.clone()))?;

        let parts = match Self::wrapped_parts(document, target) {
            Some(parts) => {
                debug!("Re-attaching to wrapped anchor {}", id);
                parts
            }
            None => {
                debug!("Wrapping anchor {}", id);
                Self::wrap(document, target, anchor_id, options.modal)
            }
        };

        Self::build_title_bar(document, parts, title, options.close_button);

        if let Some(frame_style) = document.style_mut(parts.frame) {
            behavior.on_reset_style(frame_style);
        }

        // Backdrop clicks follow the listener installed by the first wrap
        let modal = match document.get(parts.outer).and_then(|outer| outer.listener()) {
            Some(Listener::Backdrop { modal }) => modal,
            _ => options.modal,
        };

        Ok(Self {
            id,
            modal,
            outer: parts.outer,
            frame: parts.frame,
            body: parts.body,
            behavior,
        })
    }

    /// Structural check for an anchor that an earlier construction wrapped:
    /// an outer element whose first child is a frame holding a body.
    fn wrapped_parts(document: &Document, node: NodeId) -> Option<Parts> {
        let outer = document.get(node)?;
        if !outer.has_class(classes::OUTER) {
            return None;
        }

        let frame = document.first_element_child(node)?;
        if !document.get(frame)?.has_class(classes::FRAME) {
            return None;
        }

        let body = document.query_selector(frame, &format!(".{}", classes::BODY))?;
        Some(Parts {
            outer: node,
            frame,
            body,
        })
    }

    fn wrap(document: &mut Document, anchor: NodeId, anchor_id: &str, modal: bool) -> Parts {
        document.remove_id(anchor);
        document.set_class_name(anchor, classes::BODY);

        let outer = document.create_element("div");
        document.set_id(outer, anchor_id);
        document.set_class_name(outer, classes::OUTER);
        document.set_listener(outer, Listener::Backdrop { modal });

        let frame = document.create_element("div");
        document.set_class_name(frame, classes::FRAME);
        document.set_listener(frame, Listener::StopPropagation);
        document.append_child(outer, frame);

        // Title slot, replaced by build_title_bar
        let placeholder = document.create_element("div");
        document.append_child(frame, placeholder);

        if let Some(parent) = document.get(anchor).and_then(|element| element.parent()) {
            document.replace_child(parent, outer, anchor);
        }
        document.append_child(frame, anchor);

        Parts {
            outer,
            frame,
            body: anchor,
        }
    }

    fn build_title_bar(document: &mut Document, parts: Parts, title: &str, close_button: bool) {
        let title_bar = document.create_element("div");
        document.set_class_name(title_bar, classes::TITLE);

        let content = document.create_element("div");
        document.set_class_name(content, classes::TITLE_CONTENT);
        document.set_text(content, title);
        document.append_child(title_bar, content);

        if close_button {
            let button = document.create_element("a");
            document.add_class(button, classes::BUTTON_FACE);
            document.add_class(button, classes::CLOSE_BUTTON);
            document.set_text(button, CLOSE_GLYPH);
            // Closes whatever is topmost, not necessarily this dialog
            document.set_listener(button, Listener::DismissTop);
            document.append_child(title_bar, button);
        }

        match document.first_element_child(parts.frame) {
            Some(first) if first != parts.body => {
                document.replace_child(parts.frame, title_bar, first);
            }
            first => {
                document.insert_before(parts.frame, title_bar, first);
            }
        }
    }

    pub fn id(&self) -> &DialogId {
        &self.id
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    pub fn outer(&self) -> NodeId {
        self.outer
    }

    pub fn frame(&self) -> NodeId {
        self.frame
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn behavior(&self) -> &Arc<dyn DialogBehavior> {
        &self.behavior
    }

    /// Push this dialog onto the manager's stack; no-op while displayed
    pub fn show(&self, manager: &mut DialogManager) {
        manager.show(self);
    }

    /// Remove this dialog from the stack wherever it sits
    pub fn dismiss(&self, manager: &mut DialogManager) {
        manager.dismiss(self);
    }

    /// First element within the body subtree matching `selector`
    pub fn child_element(&self, document: &Document, selector: &str) -> Option<NodeId> {
        document.query_selector(self.body, selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NodeSpec, Transform};

    fn document() -> Document {
        Document::from_nodes(&[
            NodeSpec::new("main").with_id("main"),
            NodeSpec::new("section")
                .with_id("dialogAbout")
                .with_class("hidden content")
                .with_child(NodeSpec::new("p").with_class("version").with_text("0.1.0")),
            NodeSpec::new("footer"),
        ])
    }

    #[test]
    fn test_missing_anchor_fails_without_mutation() {
        let mut doc = document();
        let before = doc.query_selector_all(doc.root(), "*").len();
        let outline = doc.outline();

        let err = Dialog::new(&mut doc, "nope", "Nope", DialogOptions::default()).unwrap_err();

        assert_eq!(err, DialogError::AnchorNotFound(DialogId::from("#nope")));
        assert_eq!(doc.query_selector_all(doc.root(), "*").len(), before);
        assert_eq!(doc.outline(), outline);
    }

    #[test]
    fn test_wrap_builds_hierarchy_in_place() {
        let mut doc = document();
        let anchor = doc.find_by_id("dialogAbout").unwrap();

        let dialog = Dialog::new(&mut doc, "dialogAbout", "About", DialogOptions::default()).unwrap();

        assert_eq!(dialog.id().as_str(), "#dialogAbout");
        assert_eq!(dialog.body(), anchor);
        assert_eq!(doc.find_by_id("dialogAbout"), Some(dialog.outer()));
        assert!(doc.is_descendant(dialog.frame(), dialog.outer()));
        assert!(doc.is_descendant(dialog.body(), dialog.frame()));

        // Wrapper sits where the anchor used to be
        let root_children = doc.get(doc.root()).unwrap().children().to_vec();
        assert_eq!(root_children.len(), 3);
        assert_eq!(root_children[1], dialog.outer());

        let body = doc.get(dialog.body()).unwrap();
        assert_eq!(body.id(), None);
        assert_eq!(body.class_name(), "dialogBody");
        assert_eq!(doc.get(dialog.outer()).unwrap().class_name(), "dialogOuter");
        assert_eq!(doc.get(dialog.frame()).unwrap().class_name(), "dialogFrame");
    }

    #[test]
    fn test_title_bar_and_close_button() {
        let mut doc = document();
        let dialog = Dialog::new(&mut doc, "dialogAbout", "About", DialogOptions::default()).unwrap();

        let frame_children = doc.get(dialog.frame()).unwrap().children().to_vec();
        assert_eq!(frame_children.len(), 2);
        assert_eq!(frame_children[1], dialog.body());

        let title = frame_children[0];
        assert!(doc.get(title).unwrap().has_class("dialogTitle"));
        assert_eq!(doc.text_content(title), format!("About{}", CLOSE_GLYPH));

        let button = doc.query_selector(title, "a.buttonFace.dialogCloseButton").unwrap();
        assert_eq!(doc.get(button).unwrap().listener(), Some(Listener::DismissTop));
    }

    #[test]
    fn test_without_close_button() {
        let mut doc = document();
        let options = DialogOptions::new().close_button(false);
        let dialog = Dialog::new(&mut doc, "dialogAbout", "About", options).unwrap();

        assert!(doc.query_selector(dialog.frame(), ".dialogCloseButton").is_none());
        assert!(doc.query_selector(dialog.frame(), ".dialogTitleContent").is_some());
    }

    #[test]
    fn test_listeners_follow_modality() {
        let mut doc = document();
        let options = DialogOptions::new().modal(false);
        let dialog = Dialog::new(&mut doc, "dialogAbout", "About", options).unwrap();

        assert!(!dialog.is_modal());
        assert_eq!(
            doc.get(dialog.outer()).unwrap().listener(),
            Some(Listener::Backdrop { modal: false })
        );
        assert_eq!(
            doc.get(dialog.frame()).unwrap().listener(),
            Some(Listener::StopPropagation)
        );
    }

    #[test]
    fn test_construction_is_idempotent() {
        let mut doc = document();
        let first = Dialog::new(&mut doc, "dialogAbout", "About", DialogOptions::default()).unwrap();
        let second = Dialog::new(&mut doc, "dialogAbout", "About again", DialogOptions::default()).unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(first.outer(), second.outer());
        assert_eq!(first.frame(), second.frame());
        assert_eq!(first.body(), second.body());

        // Title replaced, not duplicated
        let titles = doc.query_selector_all(second.frame(), ".dialogTitle");
        assert_eq!(titles.len(), 1);
        assert_eq!(doc.text_content(titles[0]), format!("About again{}", CLOSE_GLYPH));
        assert_eq!(doc.query_selector_all(doc.root(), ".dialogOuter").len(), 1);
    }

    #[test]
    fn test_reattach_reports_modality_of_backdrop_listener() {
        let mut doc = document();
        let first = Dialog::new(&mut doc, "dialogAbout", "About", DialogOptions::new().modal(false)).unwrap();
        let second = Dialog::new(&mut doc, "dialogAbout", "About", DialogOptions::new().modal(true)).unwrap();

        assert!(!first.is_modal());
        assert!(!second.is_modal());
        assert_eq!(
            doc.get(second.outer()).unwrap().listener(),
            Some(Listener::Backdrop { modal: false })
        );
    }

    #[test]
    fn test_wraps_anchor_declared_in_markup() {
        let mut doc = Document::parse(
            r##"<main id="main"><a href="#dialogAbout">About</a></main>
                <div id="dialogAbout"><p class="version">0.1.0</p></div>"##,
        );
        let dialog = Dialog::new(&mut doc, "dialogAbout", "About", DialogOptions::default()).unwrap();

        assert_eq!(doc.query_selector(doc.root(), "#dialogAbout > .dialogFrame > .dialogBody"), Some(dialog.body()));
        let version = dialog.child_element(&doc, "p.version").unwrap();
        assert_eq!(doc.text_content(version), "0.1.0");
    }

    #[test]
    fn test_reset_style_applied_at_construction() {
        let mut doc = document();
        let dialog = Dialog::new(&mut doc, "dialogAbout", "About", DialogOptions::default()).unwrap();

        let frame = doc.style(dialog.frame()).unwrap();
        assert_eq!(frame.opacity, Some(0.0));
        assert_eq!(frame.transform, Some(Transform::centered(1.125)));
    }

    #[test]
    fn test_child_element_is_scoped_to_body() {
        let mut doc = document();
        let dialog = Dialog::new(&mut doc, "dialogAbout", "About", DialogOptions::default()).unwrap();

        let version = dialog.child_element(&doc, ".version").unwrap();
        assert_eq!(doc.text_content(version), "0.1.0");
        assert!(dialog.child_element(&doc, ".dialogTitleContent").is_none());
        assert!(dialog.child_element(&doc, "main").is_none());
    }
}
