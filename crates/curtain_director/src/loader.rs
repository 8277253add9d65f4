//! Scene loading primitive
//!
//! Abstracts the engine's own asynchronous scene load/unload call. The
//! registry tracks logical state only; the director calls through this
//! trait around each registry mutation.

use std::time::Duration;

use async_trait::async_trait;

use curtain_core::{SceneId, SceneResult};

/// Engine-level scene load/unload primitive
///
/// Implementations perform the actual content streaming. Failures are
/// reported as [`SceneError::LoadFailed`](curtain_core::SceneError) /
/// [`SceneError::UnloadFailed`](curtain_core::SceneError); the director
/// leaves the registry in its prior stable state and still reveals the
/// screen. Loads are not cancellable once started.
#[async_trait]
pub trait SceneLoader: Send + Sync {
    /// Load a scene's content additively
    async fn load(&self, id: &SceneId) -> SceneResult<()>;

    /// Unload a scene's content
    async fn unload(&self, id: &SceneId) -> SceneResult<()>;
}

/// Loader that succeeds after an optional simulated latency
///
/// Useful for demos and headless testing where no real content exists.
#[derive(Debug, Clone, Default)]
pub struct NoopSceneLoader {
    latency: Duration,
}

impl NoopSceneLoader {
    /// Create a loader that completes immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader that completes after the given latency
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl SceneLoader for NoopSceneLoader {
    async fn load(&self, id: &SceneId) -> SceneResult<()> {
        log::debug!("noop loader: loading '{}'", id);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(())
    }

    async fn unload(&self, id: &SceneId) -> SceneResult<()> {
        log::debug!("noop loader: unloading '{}'", id);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(())
    }
}
