//! Dialog manager for handling the dialog stack and lifecycle
//!
//! The dialog manager is responsible for:
//! - Keeping the ordered stack of open dialogs (last = topmost)
//! - Assigning strictly increasing z-indices to pushed dialogs
//! - Running the show and close sequences, including their deferred
//!   transitions
//! - Dispatching clicks to backdrop, frame and close-control listeners
//!
//! All stack mutations go through three entry points: [`DialogManager::show`]
//! (push), [`DialogManager::dismiss`] (remove by identity) and
//! [`DialogManager::dismiss_top`] (pop). None of them can fail.

use super::behavior::StyleContext;
use super::dialog::Dialog;
use super::layer::DialogLayer;
use super::types::{DialogEvent, DialogId};
use crate::animations::{TransitionKind, TransitionScheduler};
use crate::config::Config;
use crate::document::{Display, Document, Element, Listener, NodeId, Rgba, StylePatch};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Owner of the host document and the process-wide dialog stack
pub struct DialogManager {
    /// Host document the dialogs live in
    document: Document,

    /// Open dialogs; insertion order is layering order
    stack: Vec<Dialog>,

    /// Last assigned z-index
    z_counter: i32,

    /// Deferred visual follow-ups
    transitions: TransitionScheduler,

    config: Config,

    /// Event sender for dialog events
    event_sender: Option<mpsc::UnboundedSender<DialogEvent>>,
}

impl DialogManager {
    /// Create a manager over `document` with default configuration
    pub fn new(document: Document) -> Self {
        Self::with_config(document, Config::default())
    }

    pub fn with_config(document: Document, config: Config) -> Self {
        if let Err(e) = config.validate() {
            warn!("Invalid dialog configuration: {:#}", e);
        }
        Self {
            document,
            stack: Vec::new(),
            z_counter: config.z_baseline,
            transitions: TransitionScheduler::new(),
            config,
            event_sender: None,
        }
    }

    /// Set the event sender for dialog events
    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<DialogEvent>) {
        self.event_sender = Some(sender);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access, e.g. to construct dialogs
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transitions(&self) -> &TransitionScheduler {
        &self.transitions
    }

    /// Push protocol
    pub fn show(&mut self, dialog: &Dialog) {
        let id = dialog.id();

        if self.is_displayed(dialog) {
            let revived = self.config.cancel_stale_transitions
                && !self.contains(id)
                && self.transitions.cancel(id, TransitionKind::Hide) > 0;
            if !revived {
                trace!("Dialog {} already displayed", id);
                return;
            }
            debug!("Cancelled pending hide of {}", id);
        }
        if self.contains(id) {
            return;
        }

        if self.stack.is_empty() {
            self.z_counter = self.config.z_baseline;
        }
        let z_index = self.next_z_index();
        self.stack.push(dialog.clone());

        self.document.apply_patch(
            dialog.outer(),
            &StylePatch::new().z_index(z_index).display(Display::Block),
        );

        {
            let mut ctx = StyleContext::new(
                id,
                dialog.frame(),
                &mut self.document,
                &mut self.transitions,
                self.config.entrance_delay(),
            );
            dialog.behavior().on_show(&mut ctx);
        }

        self.transitions.schedule(
            id,
            TransitionKind::Backdrop,
            self.config.backdrop_delay(),
            dialog.outer(),
            StylePatch::new().background(self.config.backdrop_tint),
        );

        info!("Showing dialog {} at z-index {}", id, z_index);
        self.send_event(DialogEvent::Shown {
            id: id.clone(),
            z_index,
        });
    }

    /// z-index for a dialog about to be pushed. When the counter is
    /// exhausted the open dialogs are renumbered just below `i32::MAX`,
    /// keeping their order.
    fn next_z_index(&mut self) -> i32 {
        if let Some(next) = self.z_counter.checked_add(1) {
            self.z_counter = next;
            return next;
        }

        let open = i32::try_from(self.stack.len()).unwrap_or(i32::MAX);
        let floor = self
            .config
            .z_baseline
            .min(i32::MAX.saturating_sub(open).saturating_sub(1));
        warn!(
            "z-index counter exhausted at {}; renumbering {} open dialog(s) from {}",
            self.z_counter, open, floor
        );

        let mut z_index = floor;
        for dialog in &self.stack {
            z_index = z_index.saturating_add(1);
            self.document
                .apply_patch(dialog.outer(), &StylePatch::new().z_index(z_index));
        }
        self.z_counter = z_index.saturating_add(1);
        self.z_counter
    }

    /// Remove-by-identity protocol: drops every entry with `dialog`'s selector
    pub fn dismiss(&mut self, dialog: &Dialog) {
        let (removed, kept): (Vec<Dialog>, Vec<Dialog>) = std::mem::take(&mut self.stack)
            .into_iter()
            .partition(|entry| entry.id() == dialog.id());
        self.stack = kept;

        if removed.is_empty() {
            trace!("Dialog {} not open", dialog.id());
        }
        for entry in removed {
            self.close(&entry);
        }
    }

    /// Pop and close the topmost dialog, whichever it is
    pub fn dismiss_top(&mut self) {
        if let Some(top) = self.stack.pop() {
            self.close(&top);
        }
    }

    /// Close every dialog, topmost first
    pub fn dismiss_all(&mut self) {
        while !self.stack.is_empty() {
            self.dismiss_top();
        }
    }

    /// Close sequence shared by every removal path
    fn close(&mut self, dialog: &Dialog) {
        let id = dialog.id();
        debug!("Closing dialog {}", id);

        if self.config.cancel_stale_transitions {
            for kind in [TransitionKind::Entrance, TransitionKind::Backdrop, TransitionKind::Custom] {
                self.transitions.cancel(id, kind);
            }
        }

        {
            let mut ctx = StyleContext::new(
                id,
                dialog.frame(),
                &mut self.document,
                &mut self.transitions,
                self.config.entrance_delay(),
            );
            dialog.behavior().on_close(&mut ctx);
        }

        self.document
            .apply_patch(dialog.outer(), &StylePatch::new().background(Rgba::TRANSPARENT));

        if let Some(frame_style) = self.document.style_mut(dialog.frame()) {
            dialog.behavior().on_reset_style(frame_style);
        }

        self.transitions.schedule(
            id,
            TransitionKind::Hide,
            self.config.hide_delay(),
            dialog.outer(),
            StylePatch::new().display(Display::None),
        );

        self.send_event(DialogEvent::Closed { id: id.clone() });
    }

    /// Advance the transition clock, applying everything that became due.
    /// Returns the number of transitions applied.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let fired = self.transitions.advance(elapsed);
        let count = fired.len();

        for transition in fired {
            trace!("Applying {:?} transition for {}", transition.kind, transition.key);
            self.document.apply_patch(transition.node, &transition.patch);
            if transition.kind == TransitionKind::Hide {
                self.send_event(DialogEvent::Hidden { id: transition.key });
            }
        }

        count
    }

    /// Run the clock until no transition is pending
    pub fn settle(&mut self) -> usize {
        let mut applied = 0;
        while let Some(delay) = self.transitions.next_due() {
            applied += self.advance(delay);
        }
        applied
    }

    /// Dispatch a click on `target`, bubbling towards the root
    pub fn click(&mut self, target: NodeId) {
        for node in self.document.path_to_root(target) {
            let Some(listener) = self.document.get(node).and_then(Element::listener) else {
                continue;
            };
            match listener {
                Listener::StopPropagation => break,
                Listener::DismissTop => self.dismiss_top(),
                Listener::Backdrop { modal } => {
                    if !modal {
                        self.dismiss_top();
                    }
                    break;
                }
            }
        }
    }

    /// Click the first attached element matching `selector`. Returns whether
    /// anything matched.
    pub fn click_selector(&mut self, selector: &str) -> bool {
        match self.document.query_selector(self.document.root(), selector) {
            Some(target) => {
                self.click(target);
                true
            }
            None => false,
        }
    }

    /// Whether the dialog's outer element is in the displayed state
    pub fn is_displayed(&self, dialog: &Dialog) -> bool {
        self.document
            .style(dialog.outer())
            .is_some_and(|style| style.display == Display::Block)
    }

    pub fn z_index_of(&self, dialog: &Dialog) -> Option<i32> {
        self.document.style(dialog.outer()).and_then(|style| style.z_index)
    }

    pub fn z_counter(&self) -> i32 {
        self.z_counter
    }

    pub fn contains(&self, id: &DialogId) -> bool {
        self.stack.iter().any(|dialog| dialog.id() == id)
    }

    pub fn top(&self) -> Option<&Dialog> {
        self.stack.last()
    }

    /// Selectors of open dialogs, bottom to top
    pub fn stack_ids(&self) -> Vec<DialogId> {
        self.stack.iter().map(|dialog| dialog.id().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Rendering layers of open dialogs, lowest z-index first
    pub fn layers(&self) -> Vec<DialogLayer> {
        let top = self.top().map(|dialog| dialog.id().clone());
        let mut layers: Vec<DialogLayer> = self
            .stack
            .iter()
            .map(|dialog| {
                DialogLayer::new(
                    dialog.id().clone(),
                    self.z_index_of(dialog).unwrap_or(self.config.z_baseline),
                    dialog.is_modal(),
                    top.as_ref() == Some(dialog.id()),
                )
            })
            .collect();
        layers.sort_by_key(|layer| layer.z_index());
        layers
    }

    /// Send an event if event sender is configured
    fn send_event(&self, event: DialogEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}
