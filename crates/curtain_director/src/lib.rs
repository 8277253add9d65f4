//! # Curtain Director
//!
//! The scene transition orchestrator.
//!
//! A [`SceneDirector`] sequences asynchronous scene load/unload operations
//! against the scene registry while gating each mutation behind the
//! transition effect: show the cover, mutate, reveal. Concurrent requests
//! are queued FIFO and run one at a time, so no two registry mutations are
//! ever visible as overlapping world state.
//!
//! ## Usage
//!
//! ```ignore
//! let config = DirectorConfig::new(scenes, SceneId::new("main_menu"));
//! let driver = Arc::new(TimedTransitionDriver::covered(
//!     config.show_duration(),
//!     config.hide_duration(),
//! ));
//! let (director, boot) = SceneDirector::spawn(config, driver, loader)?;
//!
//! // Boot reveals the initial scene from behind the pre-set cover
//! boot.wait().await?;
//!
//! // Later, from a UI handler
//! director
//!     .switch_scene(SceneId::new("main_menu"), SceneId::new("gallery"))
//!     .wait()
//!     .await?;
//! ```

pub mod director;
pub mod loader;
pub mod request;

pub use curtain_core::{DirectorConfig, SceneError, SceneId, SceneRegistry, SceneResult, SceneState};
pub use director::{DirectorPhase, DirectorStats, SceneDirector};
pub use loader::{NoopSceneLoader, SceneLoader};
pub use request::{CompletionHandle, RequestKind};
