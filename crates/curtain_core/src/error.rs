//! Error taxonomy for the Curtain scene transition system

use thiserror::Error;

use crate::scene::{SceneId, SceneState};

/// Errors surfaced through a request's completion handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Referenced scene is not in the scene table (configuration error)
    #[error("unknown scene: {0}")]
    UnknownScene(SceneId),

    /// The engine load primitive reported failure
    #[error("failed to load scene '{scene}': {reason}")]
    LoadFailed { scene: SceneId, reason: String },

    /// The engine unload primitive reported failure
    #[error("failed to unload scene '{scene}': {reason}")]
    UnloadFailed { scene: SceneId, reason: String },

    /// A registry transition was attempted from the wrong predecessor state
    #[error("scene '{scene}' is {actual:?}, expected {expected:?}")]
    InvalidState {
        scene: SceneId,
        expected: SceneState,
        actual: SceneState,
    },

    /// The transition effect driver failed
    #[error("transition driver error: {0}")]
    Transition(#[from] TransitionError),

    /// Invalid director configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The pending request queue is at capacity
    #[error("request queue full")]
    QueueFull,

    /// The director worker has shut down
    #[error("scene director stopped")]
    Stopped,
}

/// Errors from the transition effect driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The driver is unavailable (fatal)
    #[error("transition driver unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
