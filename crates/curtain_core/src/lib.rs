//! # Curtain Core
//!
//! Core scene types for the Curtain scene transition system.
//!
//! Provides the building blocks the director crate orchestrates:
//! - Scene identifiers and lifecycle states
//! - The scene registry tracking logical loaded/unloaded state
//! - Director configuration (scene table, transition durations)
//! - The shared error taxonomy
//!
//! The registry tracks *logical* state only; the actual asynchronous
//! engine-level load/unload is delegated to a loader primitive owned by
//! the director crate.

pub mod config;
pub mod error;
pub mod registry;
pub mod scene;

pub use config::DirectorConfig;
pub use error::{SceneError, SceneResult, TransitionError};
pub use registry::SceneRegistry;
pub use scene::{SceneId, SceneState};
