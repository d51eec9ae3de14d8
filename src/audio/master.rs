use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::shared::DEFAULT_VOLUME;

// Master volume and mute, written by the control thread and read once per
// audio block. Mute forces silence without touching the stored volume.
#[derive(Debug)]
pub struct MasterGain {
    volume: AtomicU32, // f32 bits
    muted: AtomicBool,
}

impl Default for MasterGain {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

impl MasterGain {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: AtomicU32::new(volume.clamp(0.0, 1.0).to_bits()),
            muted: AtomicBool::new(false),
        }
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }

    pub fn set_volume(&self, volume: f32) {
        let v = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.volume.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    // what the engine multiplies the mix by
    pub fn gain(&self) -> f32 {
        if self.is_muted() { 0.0 } else { self.volume() }
    }
}
