//! Scene identifiers and lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scene identifier
///
/// Names a loadable unit of world/UI content. The full set of valid
/// identifiers is fixed at startup by the scene table in
/// [`DirectorConfig`](crate::DirectorConfig).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(String);

impl SceneId {
    /// Create a new scene ID
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the scene name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SceneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Scene lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneState {
    /// Not loaded
    Unloaded,
    /// Currently loading
    Loading,
    /// Loaded and reachable by gameplay code
    Loaded,
    /// Currently unloading
    Unloading,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::Unloaded
    }
}

impl SceneState {
    /// Check if the scene is loaded and reachable
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Check if the scene is mid-transition (loading or unloading)
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Loading | Self::Unloading)
    }

    /// Check if the scene is in a stable state (loaded or unloaded)
    pub fn is_stable(&self) -> bool {
        !self.is_transitioning()
    }
}
