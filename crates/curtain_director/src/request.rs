//! Queued transition requests and completion handles

use std::fmt;

use tokio::sync::oneshot;

use curtain_core::{SceneError, SceneId, SceneResult};

/// Kind of work a request carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Load a scene without unloading anything
    LoadAdditive(SceneId),
    /// Unload a scene
    Unload(SceneId),
    /// Unload one scene, then load another
    Switch { from: SceneId, to: SceneId },
    /// Internal startup load: hide phase only, no show
    Boot(SceneId),
}

impl RequestKind {
    /// Scene IDs referenced by this request
    pub fn scene_ids(&self) -> Vec<&SceneId> {
        match self {
            Self::LoadAdditive(id) | Self::Unload(id) | Self::Boot(id) => vec![id],
            Self::Switch { from, to } => vec![from, to],
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadAdditive(id) => write!(f, "load additive '{}'", id),
            Self::Unload(id) => write!(f, "unload '{}'", id),
            Self::Switch { from, to } => write!(f, "switch '{}' -> '{}'", from, to),
            Self::Boot(id) => write!(f, "boot '{}'", id),
        }
    }
}

/// A queued unit of work: request kind plus its completion responder
#[derive(Debug)]
pub(crate) struct TransitionRequest {
    pub kind: RequestKind,
    pub responder: oneshot::Sender<SceneResult<()>>,
}

/// Handle to an in-flight request
///
/// Awaiting is optional: dropping the handle detaches the caller from
/// notification but never aborts the sequence.
#[derive(Debug)]
pub struct CompletionHandle {
    rx: oneshot::Receiver<SceneResult<()>>,
}

impl CompletionHandle {
    /// Create a responder/handle pair
    pub(crate) fn pair() -> (oneshot::Sender<SceneResult<()>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Create a handle that has already failed
    pub(crate) fn failed(error: SceneError) -> Self {
        let (tx, handle) = Self::pair();
        let _ = tx.send(Err(error));
        handle
    }

    /// Wait for the request's hide transition to complete
    pub async fn wait(self) -> SceneResult<()> {
        self.rx.await.unwrap_or(Err(SceneError::Stopped))
    }
}
