//! Slide-in entrance for panels and side menus.

use crate::dialogs::behavior::{DialogBehavior, StyleContext};
use crate::document::{Style, StylePatch, Transform};

/// Edge the panel slides in from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    #[default]
    FromLeft,
    FromRight,
    FromTop,
    FromBottom,
}

impl SlideDirection {
    /// Off-screen starting transform for this edge
    pub fn offscreen(self) -> Transform {
        match self {
            SlideDirection::FromLeft => Transform::translate(-100.0, 0.0),
            SlideDirection::FromRight => Transform::translate(100.0, 0.0),
            SlideDirection::FromTop => Transform::translate(0.0, -100.0),
            SlideDirection::FromBottom => Transform::translate(0.0, 100.0),
        }
    }
}

/// Slide the frame in from an edge; opacity is left to the stylesheet
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideIn {
    pub direction: SlideDirection,
}

impl SlideIn {
    pub fn new(direction: SlideDirection) -> Self {
        Self { direction }
    }
}

impl DialogBehavior for SlideIn {
    fn on_reset_style(&self, frame: &mut Style) {
        frame.transform = Some(self.direction.offscreen());
    }

    fn on_show(&self, ctx: &mut StyleContext<'_>) {
        ctx.schedule_frame(StylePatch::new().transform(Transform::translate(0.0, 0.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animations::TransitionScheduler;
    use crate::dialogs::DialogId;
    use crate::document::Document;
    use std::time::Duration;

    #[test]
    fn test_reset_moves_offscreen_without_touching_opacity() {
        let mut style = Style::default();
        SlideIn::default().on_reset_style(&mut style);

        assert_eq!(style.transform, Some(Transform::translate(-100.0, 0.0)));
        assert_eq!(style.opacity, None);

        SlideIn::new(SlideDirection::FromBottom).on_reset_style(&mut style);
        assert_eq!(style.transform, Some(Transform::translate(0.0, 100.0)));
    }

    #[test]
    fn test_show_slides_to_origin() {
        let mut document = Document::new();
        let frame = document.create_element("nav");
        let mut scheduler = TransitionScheduler::new();
        let key = DialogId::from("#menu");

        {
            let mut ctx = StyleContext::new(&key, frame, &mut document, &mut scheduler, Duration::from_millis(50));
            SlideIn::default().on_show(&mut ctx);
        }

        let fired = scheduler.advance(Duration::from_millis(50));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].patch.transform, Some(Transform::translate(0.0, 0.0)));
        assert_eq!(fired[0].patch.opacity, None);
    }
}
