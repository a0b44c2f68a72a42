//! Fade + scale entrance, the default dialog transition
//!
//! The frame starts transparent and slightly enlarged, then settles to full
//! opacity at its natural size. The stylesheet supplies the actual transition
//! duration; this side only flips the endpoints.

use crate::dialogs::behavior::{DialogBehavior, StyleContext};
use crate::document::{Style, StylePatch, Transform};

/// Scale the frame starts from before it settles
pub const START_SCALE: f32 = 1.125;

/// Default behavior: fade in while scaling down to natural size
#[derive(Debug, Clone, Copy, Default)]
pub struct FadeScale;

impl DialogBehavior for FadeScale {}

pub(crate) fn reset_frame(frame: &mut Style) {
    frame.opacity = Some(0.0);
    frame.transform = Some(Transform::centered(START_SCALE));
}

pub(crate) fn enter_frame(ctx: &mut StyleContext<'_>) {
    ctx.schedule_frame(
        StylePatch::new()
            .opacity(1.0)
            .transform(Transform::centered(1.0)),
    );
}
