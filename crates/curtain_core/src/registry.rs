//! Scene registry
//!
//! Tracks the logical loaded/unloaded state of every scene in the scene
//! table. The registry is mutated only by the scene director, which calls
//! the `mark_*` transitions around the engine-level load/unload primitive;
//! callers observe it through read-only snapshots.

use std::collections::HashMap;

use crate::error::{SceneError, SceneResult};
use crate::scene::{SceneId, SceneState};

/// Logical scene state map
///
/// Every scene known at startup has exactly one [`SceneState`] at any time.
/// Transitions are guarded: calling a `mark_*` from the wrong predecessor
/// state is a programming error, fatal in debug builds and a logged no-op
/// error in release builds.
#[derive(Debug, Clone)]
pub struct SceneRegistry {
    states: HashMap<SceneId, SceneState>,
}

impl SceneRegistry {
    /// Create a registry with every scene in the table unloaded
    pub fn new(scenes: impl IntoIterator<Item = SceneId>) -> Self {
        Self {
            states: scenes
                .into_iter()
                .map(|id| (id, SceneState::Unloaded))
                .collect(),
        }
    }

    /// Check if a scene is in the scene table
    pub fn contains(&self, id: &SceneId) -> bool {
        self.states.contains_key(id)
    }

    /// Get the current state of a scene
    pub fn state(&self, id: &SceneId) -> Option<SceneState> {
        self.states.get(id).copied()
    }

    /// Check if a scene is loaded
    pub fn is_loaded(&self, id: &SceneId) -> bool {
        self.state(id).map(|s| s.is_loaded()).unwrap_or(false)
    }

    /// Get all currently loaded scenes
    pub fn loaded_scenes(&self) -> Vec<SceneId> {
        let mut loaded: Vec<SceneId> = self
            .states
            .iter()
            .filter(|(_, s)| s.is_loaded())
            .map(|(id, _)| id.clone())
            .collect();
        loaded.sort();
        loaded
    }

    /// Get a snapshot of the full state map
    pub fn snapshot(&self) -> HashMap<SceneId, SceneState> {
        self.states.clone()
    }

    /// Number of scenes in the table
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if the scene table is empty
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Mark a scene as loading (from `Unloaded`)
    pub fn mark_loading(&mut self, id: &SceneId) -> SceneResult<()> {
        self.transition(id, SceneState::Unloaded, SceneState::Loading)
    }

    /// Mark a scene as loaded (from `Loading`)
    pub fn mark_loaded(&mut self, id: &SceneId) -> SceneResult<()> {
        self.transition(id, SceneState::Loading, SceneState::Loaded)
    }

    /// Mark a scene as unloading (from `Loaded`)
    pub fn mark_unloading(&mut self, id: &SceneId) -> SceneResult<()> {
        self.transition(id, SceneState::Loaded, SceneState::Unloading)
    }

    /// Mark a scene as unloaded (from `Unloading`)
    pub fn mark_unloaded(&mut self, id: &SceneId) -> SceneResult<()> {
        self.transition(id, SceneState::Unloading, SceneState::Unloaded)
    }

    /// Restore a scene to a prior stable state
    ///
    /// Failure path only: after a failed load/unload primitive the director
    /// rolls the entry back to the state it held before the attempt, without
    /// going through the transition guard.
    pub fn revert(&mut self, id: &SceneId, state: SceneState) {
        if let Some(entry) = self.states.get_mut(id) {
            log::debug!("registry: reverting scene '{}' to {:?}", id, state);
            *entry = state;
        }
    }

    fn transition(
        &mut self,
        id: &SceneId,
        expected: SceneState,
        next: SceneState,
    ) -> SceneResult<()> {
        let current = match self.states.get_mut(id) {
            Some(state) => state,
            None => {
                log::warn!("registry: transition on unknown scene '{}'", id);
                return Err(SceneError::UnknownScene(id.clone()));
            }
        };

        if *current != expected {
            let actual = *current;
            debug_assert!(
                false,
                "registry: scene '{}' is {:?}, expected {:?} for transition to {:?}",
                id, actual, expected, next
            );
            log::warn!(
                "registry: ignoring transition of scene '{}' to {:?}: state is {:?}, expected {:?}",
                id,
                next,
                actual,
                expected
            );
            return Err(SceneError::InvalidState {
                scene: id.clone(),
                expected,
                actual,
            });
        }

        *current = next;
        Ok(())
    }
}
