//! Dialog transitions
//!
//! - [`scheduler`]: deferred, cancellable style changes on a virtual clock
//! - [`fade`]: the default fade + scale entrance
//! - [`slide`]: slide-in entrance for side panels

pub mod fade;
pub mod scheduler;
pub mod slide;

pub use fade::FadeScale;
pub use scheduler::{ScheduledTransition, TransitionId, TransitionKind, TransitionScheduler};
pub use slide::{SlideDirection, SlideIn};
