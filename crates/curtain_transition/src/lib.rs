//! # Curtain Transition
//!
//! The transition effect driver contract consumed by the scene director,
//! plus the built-in time-stepped driver.
//!
//! A driver moves a full-screen occluding effect between its two extremes:
//! progress 1.0 fully covers the view, progress 0.0 fully reveals it. The
//! director awaits `show` before mutating scene state and `hide` after, so
//! mutations are never visible mid-flight. The driver owns its own time
//! stepping; completion is reported by the async call resolving, not by
//! polling a progress field.

pub mod driver;
pub mod progress;
pub mod timed;

pub use curtain_core::TransitionError;
pub use driver::{TransitionDirection, TransitionDriver};
pub use progress::Progress;
pub use timed::TimedTransitionDriver;
