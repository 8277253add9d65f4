//! Curtain demo runtime
//!
//! Headless walkthrough of the scene transition system: boots into the
//! main menu from behind a pre-set cover, then runs a few scripted scene
//! switches against a no-op loader.
//!
//! Run with: cargo run -p curtain_runtime
//! Set RUST_LOG=debug to watch the request lifecycle.

use std::sync::Arc;
use std::time::Duration;

use curtain_core::{DirectorConfig, SceneError, SceneId};
use curtain_director::{NoopSceneLoader, SceneDirector};
use curtain_transition::TimedTransitionDriver;

#[tokio::main]
async fn main() -> Result<(), SceneError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DirectorConfig::new(
        ["boot", "main_menu", "gallery", "credits"].map(SceneId::from),
        SceneId::new("main_menu"),
    )
    .with_durations(400, 400);

    // Pre-set to full cover: boot reveals the initial scene
    let driver = Arc::new(TimedTransitionDriver::covered(
        config.show_duration(),
        config.hide_duration(),
    ));
    let progress = driver.shared_progress();
    let loader = Arc::new(NoopSceneLoader::with_latency(Duration::from_millis(150)));

    let (director, boot) = SceneDirector::spawn(config, driver, loader)?;

    // A render layer would sample progress each frame; log it instead
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(100));
        loop {
            ticker.tick().await;
            log::debug!("transition progress: {:.2}", progress.get());
        }
    });

    boot.wait().await?;
    log::info!("booted, loaded scenes: {:?}", director.loaded_scenes());

    director
        .switch_scene(SceneId::new("main_menu"), SceneId::new("gallery"))
        .wait()
        .await?;
    log::info!("in gallery, loaded scenes: {:?}", director.loaded_scenes());

    // Back-to-back requests queue FIFO; awaiting the last covers both
    let _detached = director.switch_scene(SceneId::new("gallery"), SceneId::new("credits"));
    director
        .load_additive(SceneId::new("main_menu"))
        .wait()
        .await?;
    log::info!("final loaded scenes: {:?}", director.loaded_scenes());

    let stats = director.stats();
    log::info!(
        "done: {} completed, {} failed, peak queue depth {}",
        stats.requests_completed,
        stats.requests_failed,
        stats.peak_queue_depth
    );

    Ok(())
}
