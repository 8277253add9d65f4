//! Shared transition progress value

use std::sync::atomic::{AtomicU32, Ordering};

/// Lock-free transition progress cell
///
/// Holds the current progress in `[0.0, 1.0]` as f32 bits. The driver
/// writes it while stepping; a render layer may sample it every frame to
/// draw the effect. Sequencing never depends on sampled values, only on
/// driver call completion.
#[derive(Debug)]
pub struct Progress(AtomicU32);

impl Progress {
    /// Create a progress cell at the given value (clamped to `[0, 1]`)
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.clamp(0.0, 1.0).to_bits()))
    }

    /// Create a progress cell at 0.0 (fully revealed)
    pub fn revealed() -> Self {
        Self::new(0.0)
    }

    /// Create a progress cell at 1.0 (fully covered)
    pub fn covered() -> Self {
        Self::new(1.0)
    }

    /// Get the current progress
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    /// Set the progress (clamped to `[0, 1]`)
    pub fn set(&self, value: f32) {
        self.0.store(value.clamp(0.0, 1.0).to_bits(), Ordering::Release);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::revealed()
    }
}
