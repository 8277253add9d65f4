//! Scene director
//!
//! Owns the scene registry and the transition driver, and runs every
//! load/unload/switch request through the same sequence: cover the view,
//! mutate scene state, reveal the view. Requests are processed strictly
//! one at a time in arrival order by a single worker task; a request that
//! arrives while another is in flight waits its turn in a FIFO queue.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use curtain_core::{DirectorConfig, SceneError, SceneId, SceneRegistry, SceneResult, SceneState};
use curtain_transition::TransitionDriver;

use crate::loader::SceneLoader;
use crate::request::{CompletionHandle, RequestKind, TransitionRequest};

/// Phase of the request currently being processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorPhase {
    /// No request active
    Idle,
    /// Driving the transition to full cover
    ShowingTransition,
    /// Mutating the registry and running the load/unload primitive
    Mutating,
    /// Driving the transition back to full reveal
    HidingTransition,
}

impl Default for DirectorPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Director statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorStats {
    /// Requests that ran to successful completion
    pub requests_completed: u64,
    /// Requests that surfaced a failure
    pub requests_failed: u64,
    /// Scenes loaded (including restores after aborted switches)
    pub scenes_loaded: u64,
    /// Scenes unloaded
    pub scenes_unloaded: u64,
    /// Most requests ever waiting in the queue at once
    pub peak_queue_depth: usize,
}

/// State shared between director handles and the worker task
struct Shared {
    registry: RwLock<SceneRegistry>,
    phase: RwLock<DirectorPhase>,
    stats: RwLock<DirectorStats>,
    queued: AtomicUsize,
}

/// The scene transition orchestrator
///
/// Cheap to clone; all clones feed the same worker. Constructed once at
/// startup via [`SceneDirector::spawn`] and passed explicitly to callers.
/// The registry is written only by the worker task, so callers always
/// observe stable before/after states, never a mutation in flight.
#[derive(Clone)]
pub struct SceneDirector {
    tx: mpsc::Sender<TransitionRequest>,
    shared: Arc<Shared>,
}

impl SceneDirector {
    /// Validate the config, spawn the worker and enqueue the boot load
    ///
    /// The boot request loads the configured initial scene and plays only
    /// the hide phase: the transition effect is expected to start pre-set
    /// to full cover (see `TimedTransitionDriver::covered`). Returns the
    /// director plus the boot request's completion handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        config: DirectorConfig,
        driver: Arc<dyn TransitionDriver>,
        loader: Arc<dyn SceneLoader>,
    ) -> SceneResult<(Self, CompletionHandle)> {
        config.validate()?;

        let shared = Arc::new(Shared {
            registry: RwLock::new(SceneRegistry::new(config.scenes.iter().cloned())),
            phase: RwLock::new(DirectorPhase::Idle),
            stats: RwLock::new(DirectorStats::default()),
            queued: AtomicUsize::new(0),
        });

        let (tx, rx) = mpsc::channel(config.queue_capacity);

        let worker = Worker {
            shared: Arc::clone(&shared),
            driver,
            loader,
        };
        tokio::spawn(worker.run(rx));

        let director = Self { tx, shared };
        let boot = director.submit(RequestKind::Boot(config.initial_scene.clone()));
        Ok((director, boot))
    }

    /// Load a scene additively: show transition, load, hide transition
    pub fn load_additive(&self, id: SceneId) -> CompletionHandle {
        self.submit(RequestKind::LoadAdditive(id))
    }

    /// Unload a scene: show transition, unload, hide transition
    pub fn unload(&self, id: SceneId) -> CompletionHandle {
        self.submit(RequestKind::Unload(id))
    }

    /// Switch scenes: show, unload `from`, load `to`, hide
    ///
    /// Unload runs before load so at most one extra scene's resources are
    /// ever resident. `from == to` is permitted and performs a hard reset
    /// (unload then reload of the same scene).
    pub fn switch_scene(&self, from: SceneId, to: SceneId) -> CompletionHandle {
        self.submit(RequestKind::Switch { from, to })
    }

    /// Current phase of the active request
    pub fn phase(&self) -> DirectorPhase {
        *self.shared.phase.read()
    }

    /// Check if no request is active
    pub fn is_idle(&self) -> bool {
        self.phase() == DirectorPhase::Idle
    }

    /// Requests waiting in the queue (not counting the active one)
    pub fn pending_requests(&self) -> usize {
        self.shared.queued.load(Ordering::Relaxed)
    }

    /// Snapshot of director statistics
    pub fn stats(&self) -> DirectorStats {
        *self.shared.stats.read()
    }

    /// Check if a scene is currently loaded
    pub fn is_loaded(&self, id: &SceneId) -> bool {
        self.shared.registry.read().is_loaded(id)
    }

    /// Current state of a scene, if it is in the scene table
    pub fn scene_state(&self, id: &SceneId) -> Option<SceneState> {
        self.shared.registry.read().state(id)
    }

    /// All currently loaded scenes
    pub fn loaded_scenes(&self) -> Vec<SceneId> {
        self.shared.registry.read().loaded_scenes()
    }

    /// Snapshot of the full registry
    pub fn registry_snapshot(&self) -> HashMap<SceneId, SceneState> {
        self.shared.registry.read().snapshot()
    }

    fn submit(&self, kind: RequestKind) -> CompletionHandle {
        // Unknown scenes are a configuration error: fail fast, queue nothing
        {
            let registry = self.shared.registry.read();
            for id in kind.scene_ids() {
                if !registry.contains(id) {
                    log::error!("rejecting request ({}): unknown scene '{}'", kind, id);
                    return CompletionHandle::failed(SceneError::UnknownScene(id.clone()));
                }
            }
        }

        let (responder, handle) = CompletionHandle::pair();

        // Count the request before sending it: the worker may dequeue and
        // decrement before try_send even returns
        let depth = self.shared.queued.fetch_add(1, Ordering::Relaxed) + 1;

        match self.tx.try_send(TransitionRequest { kind, responder }) {
            Ok(()) => {
                let mut stats = self.shared.stats.write();
                stats.peak_queue_depth = stats.peak_queue_depth.max(depth);
                handle
            }
            Err(TrySendError::Full(request)) => {
                self.shared.queued.fetch_sub(1, Ordering::Relaxed);
                log::warn!("rejecting request ({}): queue full", request.kind);
                CompletionHandle::failed(SceneError::QueueFull)
            }
            Err(TrySendError::Closed(request)) => {
                self.shared.queued.fetch_sub(1, Ordering::Relaxed);
                log::warn!("rejecting request ({}): director stopped", request.kind);
                CompletionHandle::failed(SceneError::Stopped)
            }
        }
    }
}

/// Worker task: drains the request queue one request at a time
struct Worker {
    shared: Arc<Shared>,
    driver: Arc<dyn TransitionDriver>,
    loader: Arc<dyn SceneLoader>,
}

impl Worker {
    async fn run(self, mut rx: mpsc::Receiver<TransitionRequest>) {
        log::info!("scene director started");

        while let Some(request) = rx.recv().await {
            self.shared.queued.fetch_sub(1, Ordering::Relaxed);
            log::info!("scene request started: {}", request.kind);

            let result = self.process(&request.kind).await;
            self.set_phase(DirectorPhase::Idle);

            {
                let mut stats = self.shared.stats.write();
                match &result {
                    Ok(()) => stats.requests_completed += 1,
                    Err(_) => stats.requests_failed += 1,
                }
            }
            match &result {
                Ok(()) => log::info!("scene request completed: {}", request.kind),
                Err(e) => log::error!("scene request failed ({}): {}", request.kind, e),
            }

            if request.responder.send(result).is_err() {
                // Caller detached; the sequence ran to completion regardless
                log::debug!("completion handle dropped for request ({})", request.kind);
            }
        }

        log::info!("scene director stopped");
    }

    async fn process(&self, kind: &RequestKind) -> SceneResult<()> {
        let result = match kind {
            RequestKind::Boot(id) => {
                // No show phase at boot: the effect starts pre-set to full
                // cover and only the reveal is played
                self.set_phase(DirectorPhase::Mutating);
                self.load_scene(id).await
            }
            RequestKind::LoadAdditive(id) => {
                self.cover().await?;
                self.load_scene(id).await
            }
            RequestKind::Unload(id) => {
                self.cover().await?;
                self.unload_scene(id).await
            }
            RequestKind::Switch { from, to } => {
                self.cover().await?;
                self.switch_scenes(from, to).await
            }
        };
        self.reveal(result).await
    }

    /// Drive the transition to full cover, then enter the mutation phase
    async fn cover(&self) -> SceneResult<()> {
        self.set_phase(DirectorPhase::ShowingTransition);
        self.driver.show().await?;
        self.set_phase(DirectorPhase::Mutating);
        Ok(())
    }

    /// Drive the transition back to full reveal, merging outcomes
    ///
    /// The reveal plays even when the mutation failed; the screen is never
    /// left covered. The mutation error takes precedence over a hide error.
    async fn reveal(&self, result: SceneResult<()>) -> SceneResult<()> {
        self.set_phase(DirectorPhase::HidingTransition);
        match self.driver.hide().await {
            Ok(()) => result,
            Err(e) => {
                log::error!("hide transition failed: {}", e);
                result.and(Err(e.into()))
            }
        }
    }

    async fn load_scene(&self, id: &SceneId) -> SceneResult<()> {
        self.expect_state(id, SceneState::Unloaded)?;
        self.shared.registry.write().mark_loading(id)?;

        match self.loader.load(id).await {
            Ok(()) => {
                self.shared.registry.write().mark_loaded(id)?;
                self.shared.stats.write().scenes_loaded += 1;
                log::info!("scene loaded: '{}'", id);
                Ok(())
            }
            Err(e) => {
                self.shared.registry.write().revert(id, SceneState::Unloaded);
                Err(e)
            }
        }
    }

    async fn unload_scene(&self, id: &SceneId) -> SceneResult<()> {
        self.expect_state(id, SceneState::Loaded)?;
        self.shared.registry.write().mark_unloading(id)?;

        match self.loader.unload(id).await {
            Ok(()) => {
                self.shared.registry.write().mark_unloaded(id)?;
                self.shared.stats.write().scenes_unloaded += 1;
                log::info!("scene unloaded: '{}'", id);
                Ok(())
            }
            Err(e) => {
                self.shared.registry.write().revert(id, SceneState::Loaded);
                Err(e)
            }
        }
    }

    /// Unload `from`, then load `to`
    ///
    /// If the load step fails after the unload succeeded, the unloaded
    /// scene is restored by re-running its load so the registry never
    /// reports a half-switched state.
    async fn switch_scenes(&self, from: &SceneId, to: &SceneId) -> SceneResult<()> {
        self.unload_scene(from).await?;

        match self.load_scene(to).await {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("switch to '{}' failed, restoring '{}'", to, from);
                if let Err(restore) = self.load_scene(from).await {
                    log::error!(
                        "failed to restore scene '{}' after aborted switch: {}",
                        from,
                        restore
                    );
                }
                Err(e)
            }
        }
    }

    /// Check a scene is in the expected stable state before mutating it
    ///
    /// Requests against a scene in the wrong state are ignored: the error
    /// surfaces through the completion handle and the registry is left
    /// untouched.
    fn expect_state(&self, id: &SceneId, expected: SceneState) -> SceneResult<()> {
        let actual = self
            .shared
            .registry
            .read()
            .state(id)
            .ok_or_else(|| SceneError::UnknownScene(id.clone()))?;

        if actual != expected {
            log::warn!(
                "ignoring request for scene '{}': state is {:?}, expected {:?}",
                id,
                actual,
                expected
            );
            return Err(SceneError::InvalidState {
                scene: id.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn set_phase(&self, phase: DirectorPhase) {
        log::trace!("director phase -> {:?}", phase);
        *self.shared.phase.write() = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use curtain_core::TransitionError;
    use curtain_transition::{Progress, TransitionDirection};

    type EventLog = Arc<Mutex<Vec<String>>>;

    fn drain(events: &EventLog) -> Vec<String> {
        std::mem::take(&mut *events.lock())
    }

    /// Driver that records show/hide completions and snaps progress
    struct RecordingDriver {
        events: EventLog,
        progress: Progress,
    }

    impl RecordingDriver {
        fn covered(events: EventLog) -> Self {
            Self {
                events,
                progress: Progress::covered(),
            }
        }
    }

    #[async_trait]
    impl TransitionDriver for RecordingDriver {
        async fn play(&self, direction: TransitionDirection) -> Result<(), TransitionError> {
            // Yield so a broken serialization would interleave events
            tokio::time::sleep(Duration::from_millis(1)).await;
            self.progress.set(direction.target());
            let name = match direction {
                TransitionDirection::Show => "show",
                TransitionDirection::Hide => "hide",
            };
            self.events.lock().push(name.to_string());
            Ok(())
        }

        fn progress(&self) -> f32 {
            self.progress.get()
        }
    }

    /// Loader that records calls and fails on demand
    #[derive(Default)]
    struct FakeLoader {
        events: EventLog,
        fail_loads: HashSet<SceneId>,
        fail_unloads: HashSet<SceneId>,
        latencies: std::collections::HashMap<SceneId, Duration>,
    }

    impl FakeLoader {
        fn new(events: EventLog) -> Self {
            Self {
                events,
                ..Default::default()
            }
        }

        fn failing_load(mut self, id: &str) -> Self {
            self.fail_loads.insert(SceneId::new(id));
            self
        }

        fn failing_unload(mut self, id: &str) -> Self {
            self.fail_unloads.insert(SceneId::new(id));
            self
        }

        fn with_latency(mut self, id: &str, latency: Duration) -> Self {
            self.latencies.insert(SceneId::new(id), latency);
            self
        }
    }

    #[async_trait]
    impl SceneLoader for FakeLoader {
        async fn load(&self, id: &SceneId) -> SceneResult<()> {
            if let Some(latency) = self.latencies.get(id) {
                tokio::time::sleep(*latency).await;
            }
            if self.fail_loads.contains(id) {
                return Err(SceneError::LoadFailed {
                    scene: id.clone(),
                    reason: "asset missing".to_string(),
                });
            }
            self.events.lock().push(format!("load:{}", id));
            Ok(())
        }

        async fn unload(&self, id: &SceneId) -> SceneResult<()> {
            if let Some(latency) = self.latencies.get(id) {
                tokio::time::sleep(*latency).await;
            }
            if self.fail_unloads.contains(id) {
                return Err(SceneError::UnloadFailed {
                    scene: id.clone(),
                    reason: "still referenced".to_string(),
                });
            }
            self.events.lock().push(format!("unload:{}", id));
            Ok(())
        }
    }

    /// Loader that reports each call and then blocks until released
    struct GatedLoader {
        started: tokio::sync::mpsc::UnboundedSender<String>,
        gate: Arc<tokio::sync::Semaphore>,
    }

    #[async_trait]
    impl SceneLoader for GatedLoader {
        async fn load(&self, id: &SceneId) -> SceneResult<()> {
            let _ = self.started.send(format!("load:{}", id));
            let permit = self.gate.acquire().await.map_err(|_| SceneError::LoadFailed {
                scene: id.clone(),
                reason: "gate closed".to_string(),
            })?;
            permit.forget();
            Ok(())
        }

        async fn unload(&self, id: &SceneId) -> SceneResult<()> {
            let _ = self.started.send(format!("unload:{}", id));
            let permit = self.gate.acquire().await.map_err(|_| SceneError::UnloadFailed {
                scene: id.clone(),
                reason: "gate closed".to_string(),
            })?;
            permit.forget();
            Ok(())
        }
    }

    fn test_config(initial: &str) -> DirectorConfig {
        DirectorConfig::new(
            ["boot", "main_menu", "gallery", "credits"].map(SceneId::from),
            SceneId::from(initial),
        )
    }

    /// Spawn a director with a recording driver and await its boot
    async fn booted(
        initial: &str,
        loader: Arc<FakeLoader>,
        events: &EventLog,
    ) -> (SceneDirector, Arc<RecordingDriver>) {
        let driver = Arc::new(RecordingDriver::covered(Arc::clone(events)));
        let (director, boot) =
            SceneDirector::spawn(test_config(initial), driver.clone(), loader).unwrap();
        boot.wait().await.unwrap();
        (director, driver)
    }

    #[tokio::test]
    async fn test_boot_loads_initial_scene() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
        let (director, driver) = booted("boot", loader, &events).await;

        // Hide only at boot, never a show
        assert_eq!(drain(&events), vec!["load:boot", "hide"]);
        assert!(director.is_loaded(&SceneId::new("boot")));
        assert!(director.is_idle());
        assert_eq!(driver.progress(), 0.0);
    }

    #[tokio::test]
    async fn test_load_additive() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
        let (director, driver) = booted("boot", loader, &events).await;
        drain(&events);

        director
            .load_additive(SceneId::new("main_menu"))
            .wait()
            .await
            .unwrap();

        // Exactly one show+hide pair around the mutation
        assert_eq!(drain(&events), vec!["show", "load:main_menu", "hide"]);
        assert_eq!(
            director.loaded_scenes(),
            ["boot", "main_menu"].map(SceneId::from)
        );
        assert_eq!(driver.progress(), 0.0);
    }

    #[tokio::test]
    async fn test_unknown_scene_fails_fast() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
        let (director, _driver) = booted("boot", loader, &events).await;
        drain(&events);

        let id = SceneId::new("does_not_exist");
        let result = director.load_additive(id.clone()).wait().await;
        assert_eq!(result, Err(SceneError::UnknownScene(id)));

        // Nothing queued, no transition consumed
        assert!(drain(&events).is_empty());
    }

    #[tokio::test]
    async fn test_fifo_order_regardless_of_durations() {
        let events: EventLog = Default::default();
        let loader = Arc::new(
            FakeLoader::new(Arc::clone(&events))
                .with_latency("main_menu", Duration::from_millis(30)),
        );
        let (director, _driver) = booted("boot", loader, &events).await;
        drain(&events);

        // First request is the slowest; completion order must still match
        // submission order, and each show begins only after the previous hide
        let h1 = director.load_additive(SceneId::new("main_menu"));
        let h2 = director.load_additive(SceneId::new("gallery"));
        let h3 = director.unload(SceneId::new("main_menu"));

        h1.wait().await.unwrap();
        h2.wait().await.unwrap();
        h3.wait().await.unwrap();

        assert_eq!(
            drain(&events),
            vec![
                "show",
                "load:main_menu",
                "hide",
                "show",
                "load:gallery",
                "hide",
                "show",
                "unload:main_menu",
                "hide",
            ]
        );
        assert_eq!(director.loaded_scenes(), ["boot", "gallery"].map(SceneId::from));
    }

    #[tokio::test]
    async fn test_switch_round_trip() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
        let (director, _driver) = booted("main_menu", loader, &events).await;

        let before = director.registry_snapshot();

        director
            .switch_scene(SceneId::new("main_menu"), SceneId::new("gallery"))
            .wait()
            .await
            .unwrap();
        director
            .switch_scene(SceneId::new("gallery"), SceneId::new("main_menu"))
            .wait()
            .await
            .unwrap();

        assert_eq!(director.registry_snapshot(), before);
    }

    #[tokio::test]
    async fn test_switch_load_failure_restores_prior_state() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)).failing_load("gallery"));
        let (director, driver) = booted("main_menu", loader, &events).await;
        drain(&events);

        let result = director
            .switch_scene(SceneId::new("main_menu"), SceneId::new("gallery"))
            .wait()
            .await;

        assert_eq!(
            result,
            Err(SceneError::LoadFailed {
                scene: SceneId::new("gallery"),
                reason: "asset missing".to_string(),
            })
        );

        // Not half-switched: the unloaded scene was restored
        assert!(director.is_loaded(&SceneId::new("main_menu")));
        assert_eq!(
            director.scene_state(&SceneId::new("gallery")),
            Some(SceneState::Unloaded)
        );

        // The hide transition still completed
        assert_eq!(driver.progress(), 0.0);
        assert_eq!(
            drain(&events),
            vec!["show", "unload:main_menu", "load:main_menu", "hide"]
        );
    }

    #[tokio::test]
    async fn test_unload_failure_keeps_scene_loaded() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)).failing_unload("main_menu"));
        let (director, driver) = booted("main_menu", loader, &events).await;
        drain(&events);

        let result = director.unload(SceneId::new("main_menu")).wait().await;
        assert!(matches!(result, Err(SceneError::UnloadFailed { .. })));

        assert!(director.is_loaded(&SceneId::new("main_menu")));
        assert_eq!(driver.progress(), 0.0);
        assert_eq!(drain(&events), vec!["show", "hide"]);
    }

    #[tokio::test]
    async fn test_back_to_back_switches() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
        let (director, _driver) = booted("main_menu", loader, &events).await;
        drain(&events);

        // Submit the second switch without awaiting the first
        let h1 = director.switch_scene(SceneId::new("main_menu"), SceneId::new("gallery"));
        let h2 = director.switch_scene(SceneId::new("gallery"), SceneId::new("credits"));

        h1.wait().await.unwrap();
        h2.wait().await.unwrap();

        // The second show begins only after the first hide completed
        assert_eq!(
            drain(&events),
            vec![
                "show",
                "unload:main_menu",
                "load:gallery",
                "hide",
                "show",
                "unload:gallery",
                "load:credits",
                "hide",
            ]
        );
        assert_eq!(director.loaded_scenes(), vec![SceneId::new("credits")]);
        assert_eq!(
            director.scene_state(&SceneId::new("main_menu")),
            Some(SceneState::Unloaded)
        );
        assert_eq!(
            director.scene_state(&SceneId::new("gallery")),
            Some(SceneState::Unloaded)
        );
    }

    #[tokio::test]
    async fn test_same_scene_switch_is_hard_reset() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
        let (director, _driver) = booted("main_menu", loader, &events).await;
        drain(&events);

        director
            .switch_scene(SceneId::new("main_menu"), SceneId::new("main_menu"))
            .wait()
            .await
            .unwrap();

        assert_eq!(
            drain(&events),
            vec!["show", "unload:main_menu", "load:main_menu", "hide"]
        );
        assert!(director.is_loaded(&SceneId::new("main_menu")));
    }

    #[tokio::test]
    async fn test_wrong_state_request_is_surfaced_not_applied() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
        let (director, _driver) = booted("main_menu", loader, &events).await;
        drain(&events);

        // Loading an already-loaded scene is rejected without touching the
        // registry; the hide transition still plays
        let result = director.load_additive(SceneId::new("main_menu")).wait().await;
        assert_eq!(
            result,
            Err(SceneError::InvalidState {
                scene: SceneId::new("main_menu"),
                expected: SceneState::Unloaded,
                actual: SceneState::Loaded,
            })
        );
        assert!(director.is_loaded(&SceneId::new("main_menu")));
        assert_eq!(drain(&events), vec!["show", "hide"]);
    }

    #[tokio::test]
    async fn test_detached_handle_does_not_abort() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
        let (director, _driver) = booted("boot", loader, &events).await;

        // Drop the handle; the request still runs to completion
        drop(director.load_additive(SceneId::new("gallery")));

        // FIFO: once this one completes, the detached one already has
        director
            .load_additive(SceneId::new("credits"))
            .wait()
            .await
            .unwrap();

        assert!(director.is_loaded(&SceneId::new("gallery")));
        assert!(director.is_loaded(&SceneId::new("credits")));
    }

    #[tokio::test]
    async fn test_failure_does_not_corrupt_queue() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)).failing_load("gallery"));
        let (director, _driver) = booted("boot", loader, &events).await;

        let failed = director.load_additive(SceneId::new("gallery"));
        let queued = director.load_additive(SceneId::new("main_menu"));

        assert!(failed.wait().await.is_err());
        queued.wait().await.unwrap();
        assert!(director.is_loaded(&SceneId::new("main_menu")));
    }

    #[tokio::test]
    async fn test_stats() {
        let events: EventLog = Default::default();
        let loader = Arc::new(FakeLoader::new(Arc::clone(&events)).failing_load("gallery"));
        let (director, _driver) = booted("boot", loader, &events).await;

        director
            .load_additive(SceneId::new("main_menu"))
            .wait()
            .await
            .unwrap();
        let _ = director.load_additive(SceneId::new("gallery")).wait().await;

        let stats = director.stats();
        assert_eq!(stats.requests_completed, 2); // boot + main_menu
        assert_eq!(stats.requests_failed, 1);
        assert_eq!(stats.scenes_loaded, 2);
        assert_eq!(stats.scenes_unloaded, 0);
        assert!(stats.peak_queue_depth >= 1);
    }

    #[tokio::test]
    async fn test_single_active_request_while_others_queued() {
        let (started_tx, mut started) = tokio::sync::mpsc::unbounded_channel();
        // One permit for the boot load; everything after is gated
        let gate = Arc::new(tokio::sync::Semaphore::new(1));
        let loader = Arc::new(GatedLoader {
            started: started_tx,
            gate: Arc::clone(&gate),
        });
        let driver = Arc::new(RecordingDriver::covered(Default::default()));
        let (director, boot) =
            SceneDirector::spawn(test_config("main_menu"), driver, loader).unwrap();
        assert_eq!(started.recv().await.unwrap(), "load:main_menu");
        boot.wait().await.unwrap();

        let h1 = director.switch_scene(SceneId::new("main_menu"), SceneId::new("gallery"));
        let h2 = director.switch_scene(SceneId::new("gallery"), SceneId::new("credits"));

        // First switch is mid-mutation; the second holds in the queue
        assert_eq!(started.recv().await.unwrap(), "unload:main_menu");
        assert_eq!(director.phase(), DirectorPhase::Mutating);
        assert_eq!(director.pending_requests(), 1);

        gate.add_permits(1);
        assert_eq!(started.recv().await.unwrap(), "load:gallery");
        assert_eq!(director.phase(), DirectorPhase::Mutating);
        assert_eq!(director.pending_requests(), 1);

        // The second switch becomes active only once the first has fully
        // completed, including its hide transition
        gate.add_permits(1);
        assert_eq!(started.recv().await.unwrap(), "unload:gallery");
        assert_eq!(director.phase(), DirectorPhase::Mutating);
        assert_eq!(director.pending_requests(), 0);

        gate.add_permits(2);
        h1.wait().await.unwrap();
        h2.wait().await.unwrap();
        assert!(director.is_idle());
        assert_eq!(director.pending_requests(), 0);
        assert_eq!(director.loaded_scenes(), vec![SceneId::new("credits")]);
    }

    #[tokio::test]
    async fn test_queue_depth_accounting() {
        // The boot submit races the freshly spawned worker: the worker may
        // dequeue before the submitter's bookkeeping runs, so the counter
        // must never dip below zero or report a wrapped depth
        for _ in 0..20 {
            let events: EventLog = Default::default();
            let loader = Arc::new(FakeLoader::new(Arc::clone(&events)));
            let (director, _driver) = booted("boot", loader, &events).await;

            let handles: Vec<_> = ["main_menu", "gallery", "credits"]
                .into_iter()
                .map(|id| director.load_additive(SceneId::new(id)))
                .collect();
            assert!(director.pending_requests() <= 3);

            for handle in handles {
                handle.wait().await.unwrap();
            }
            assert_eq!(director.pending_requests(), 0);
            assert!(director.stats().peak_queue_depth <= 3);
        }
    }

    #[tokio::test]
    async fn test_queue_full() {
        let events: EventLog = Default::default();
        let loader = Arc::new(
            FakeLoader::new(Arc::clone(&events))
                .with_latency("main_menu", Duration::from_millis(200)),
        );
        let driver = Arc::new(RecordingDriver::covered(Arc::clone(&events)));
        let config = test_config("boot").with_queue_capacity(1);
        let (director, boot) = SceneDirector::spawn(config, driver, loader).unwrap();
        boot.wait().await.unwrap();

        // Occupy the worker, then fill the single queue slot
        let slow = director.load_additive(SceneId::new("main_menu"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        let queued = director.load_additive(SceneId::new("gallery"));
        let rejected = director.load_additive(SceneId::new("credits"));

        assert_eq!(rejected.wait().await, Err(SceneError::QueueFull));
        slow.wait().await.unwrap();
        queued.wait().await.unwrap();
    }
}
