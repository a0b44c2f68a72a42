//! Overridable show/close/reset hooks
//!
//! Every dialog carries a [`DialogBehavior`] value. The manager invokes its
//! hooks at fixed points of the show and close sequences; variants that want a
//! different entrance (the slide-in menu, for instance) inject another value
//! instead of subclassing the dialog.

use super::types::DialogId;
use crate::animations::{fade, TransitionId, TransitionKind, TransitionScheduler};
use crate::document::{Document, NodeId, Style, StylePatch};
use std::fmt;
use std::time::Duration;

/// Mutable view handed to [`DialogBehavior::on_show`] and
/// [`DialogBehavior::on_close`]
pub struct StyleContext<'a> {
    key: &'a DialogId,
    frame: NodeId,
    document: &'a mut Document,
    transitions: &'a mut TransitionScheduler,
    entrance_delay: Duration,
}

impl<'a> StyleContext<'a> {
    pub(crate) fn new(
        key: &'a DialogId,
        frame: NodeId,
        document: &'a mut Document,
        transitions: &'a mut TransitionScheduler,
        entrance_delay: Duration,
    ) -> Self {
        Self {
            key,
            frame,
            document,
            transitions,
            entrance_delay,
        }
    }

    /// Selector of the dialog the hook runs for
    pub fn key(&self) -> &DialogId {
        self.key
    }

    pub fn frame(&self) -> NodeId {
        self.frame
    }

    /// Delay an entrance waits so the reset baseline is registered first
    pub fn entrance_delay(&self) -> Duration {
        self.entrance_delay
    }

    pub fn frame_style_mut(&mut self) -> Option<&mut Style> {
        self.document.style_mut(self.frame)
    }

    /// Apply `patch` to the frame after the entrance delay
    pub fn schedule_frame(&mut self, patch: StylePatch) -> TransitionId {
        self.transitions
            .schedule(self.key, TransitionKind::Entrance, self.entrance_delay, self.frame, patch)
    }

    /// Apply `patch` to the frame after an arbitrary delay
    pub fn schedule_frame_after(&mut self, delay: Duration, patch: StylePatch) -> TransitionId {
        self.transitions
            .schedule(self.key, TransitionKind::Custom, delay, self.frame, patch)
    }
}

/// Visual lifecycle hooks of a dialog
///
/// The provided methods implement the default fade + scale transition.
pub trait DialogBehavior: fmt::Debug + Send + Sync {
    /// Put the frame into its pre-show baseline. Runs at construction and at
    /// every close so the next show starts from the same state.
    fn on_reset_style(&self, frame: &mut Style) {
        fade::reset_frame(frame);
    }

    /// Start the entrance transition. The dialog is already displayed.
    fn on_show(&self, ctx: &mut StyleContext<'_>) {
        fade::enter_frame(ctx);
    }

    /// Exit hook, run before the backdrop is cleared and the style reset
    fn on_close(&self, ctx: &mut StyleContext<'_>) {
        let _ = ctx;
    }
}
