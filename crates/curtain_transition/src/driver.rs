//! Transition driver contract

use async_trait::async_trait;

use curtain_core::TransitionError;

/// Direction a transition plays in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// Cover the view: progress 0.0 -> 1.0
    Show,
    /// Reveal the view: progress 1.0 -> 0.0
    Hide,
}

impl TransitionDirection {
    /// The progress value this direction drives toward
    pub fn target(&self) -> f32 {
        match self {
            Self::Show => 1.0,
            Self::Hide => 0.0,
        }
    }
}

/// Transition effect driver
///
/// Single-instance collaborator driving the full-screen effect. Calls are
/// idempotent at the extremes: a `show` issued while progress is already
/// 1.0 resolves immediately, likewise `hide` at 0.0. The driver does not
/// serialize overlapping `show`/`hide` calls itself; that ordering is the
/// director's responsibility.
#[async_trait]
pub trait TransitionDriver: Send + Sync {
    /// Drive the effect toward the given extreme, resolving on arrival
    async fn play(&self, direction: TransitionDirection) -> Result<(), TransitionError>;

    /// Cover the view (progress to 1.0)
    async fn show(&self) -> Result<(), TransitionError> {
        self.play(TransitionDirection::Show).await
    }

    /// Reveal the view (progress to 0.0)
    async fn hide(&self) -> Result<(), TransitionError> {
        self.play(TransitionDirection::Hide).await
    }

    /// Current progress, for render layers to sample
    fn progress(&self) -> f32;
}
