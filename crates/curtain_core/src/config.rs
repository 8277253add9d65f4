//! Director configuration
//!
//! Static configuration supplied at startup: the scene table, the initial
//! scene loaded at boot, and the transition durations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{SceneError, SceneResult};
use crate::scene::SceneId;

/// Configuration for the scene director
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// All scenes known to the application
    pub scenes: Vec<SceneId>,
    /// Scene loaded implicitly at boot
    pub initial_scene: SceneId,
    /// Duration of the show transition (progress 0 -> 1) in milliseconds
    pub show_duration_ms: u64,
    /// Duration of the hide transition (progress 1 -> 0) in milliseconds
    pub hide_duration_ms: u64,
    /// Capacity of the pending request queue
    pub queue_capacity: usize,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            scenes: vec![SceneId::new("boot")],
            initial_scene: SceneId::new("boot"),
            show_duration_ms: 2000,
            hide_duration_ms: 2000,
            queue_capacity: 32,
        }
    }
}

impl DirectorConfig {
    /// Create a config from a scene table and initial scene
    pub fn new(scenes: impl IntoIterator<Item = SceneId>, initial_scene: SceneId) -> Self {
        Self {
            scenes: scenes.into_iter().collect(),
            initial_scene,
            ..Default::default()
        }
    }

    /// Set the show/hide transition durations
    pub fn with_durations(mut self, show_ms: u64, hide_ms: u64) -> Self {
        self.show_duration_ms = show_ms;
        self.hide_duration_ms = hide_ms;
        self
    }

    /// Set the pending request queue capacity
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Show transition duration
    pub fn show_duration(&self) -> Duration {
        Duration::from_millis(self.show_duration_ms)
    }

    /// Hide transition duration
    pub fn hide_duration(&self) -> Duration {
        Duration::from_millis(self.hide_duration_ms)
    }

    /// Parse a config from JSON
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SceneError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> SceneResult<()> {
        if self.scenes.is_empty() {
            return Err(SceneError::Config("scene table is empty".to_string()));
        }
        if !self.scenes.contains(&self.initial_scene) {
            return Err(SceneError::Config(format!(
                "initial scene '{}' is not in the scene table",
                self.initial_scene
            )));
        }
        for (i, id) in self.scenes.iter().enumerate() {
            if self.scenes[i + 1..].contains(id) {
                return Err(SceneError::Config(format!("duplicate scene '{}'", id)));
            }
        }
        if self.queue_capacity == 0 {
            return Err(SceneError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
