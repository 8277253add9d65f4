//! Built-in time-stepped transition driver

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{interval, MissedTickBehavior};

use curtain_core::TransitionError;

use crate::driver::{TransitionDirection, TransitionDriver};
use crate::progress::Progress;

/// Default stepping rate (ticks per second)
const DEFAULT_TICK_RATE: u32 = 60;

/// Transition driver that steps progress over wall-clock time
///
/// Advances the shared [`Progress`] cell toward the requested extreme on a
/// fixed tick, resolving when it arrives. The stepping rate is an
/// implementation detail; consumers only rely on call completion.
pub struct TimedTransitionDriver {
    show_duration: Duration,
    hide_duration: Duration,
    tick: Duration,
    progress: Arc<Progress>,
}

impl TimedTransitionDriver {
    /// Create a driver starting fully revealed (progress 0.0)
    pub fn new(show_duration: Duration, hide_duration: Duration) -> Self {
        Self::with_progress(show_duration, hide_duration, Arc::new(Progress::revealed()))
    }

    /// Create a driver starting fully covered (progress 1.0)
    ///
    /// Used at boot: the first request plays only the hide phase, revealing
    /// the initial scene from behind a pre-set cover.
    pub fn covered(show_duration: Duration, hide_duration: Duration) -> Self {
        Self::with_progress(show_duration, hide_duration, Arc::new(Progress::covered()))
    }

    /// Create a driver over an existing progress cell
    pub fn with_progress(
        show_duration: Duration,
        hide_duration: Duration,
        progress: Arc<Progress>,
    ) -> Self {
        Self {
            show_duration,
            hide_duration,
            tick: Duration::from_secs(1) / DEFAULT_TICK_RATE,
            progress,
        }
    }

    /// Override the stepping tick
    pub fn with_tick(mut self, tick: Duration) -> Self {
        debug_assert!(!tick.is_zero(), "tick must be non-zero");
        self.tick = tick;
        self
    }

    /// Shared handle to the progress cell, for render layers
    pub fn shared_progress(&self) -> Arc<Progress> {
        Arc::clone(&self.progress)
    }

    fn duration_for(&self, direction: TransitionDirection) -> Duration {
        match direction {
            TransitionDirection::Show => self.show_duration,
            TransitionDirection::Hide => self.hide_duration,
        }
    }
}

#[async_trait]
impl TransitionDriver for TimedTransitionDriver {
    async fn play(&self, direction: TransitionDirection) -> Result<(), TransitionError> {
        let target = direction.target();

        // Idempotent at the extreme
        if self.progress.get() == target {
            return Ok(());
        }

        let duration = self.duration_for(direction);
        if duration.is_zero() {
            self.progress.set(target);
            return Ok(());
        }

        let step = self.tick.as_secs_f32() / duration.as_secs_f32();
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick resolves immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let next = match direction {
                TransitionDirection::Show => (self.progress.get() + step).min(1.0),
                TransitionDirection::Hide => (self.progress.get() - step).max(0.0),
            };
            self.progress.set(next);
            if next == target {
                log::debug!("transition {:?} complete", direction);
                return Ok(());
            }
        }
    }

    fn progress(&self) -> f32 {
        self.progress.get()
    }
}
