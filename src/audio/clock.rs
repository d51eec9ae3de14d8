// The shared time base. The audio thread owns the truth (frames rendered so
// far); the control thread reads it to timestamp recordings and to schedule
// replays in the same units the engine starts voices in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub trait AudioClock {
    /// Seconds since the stream started.
    fn now(&self) -> f64;
    fn sample_rate(&self) -> u32;
}

// frames rendered by the engine, bumped once per block
pub type FrameCounter = Arc<AtomicU64>;

#[derive(Clone, Debug)]
pub struct SampleClock {
    frames: FrameCounter,
    sample_rate: u32,
}

impl SampleClock {
    pub fn new(frames: FrameCounter, sample_rate: u32) -> Self {
        Self { frames, sample_rate }
    }
}

impl AudioClock for SampleClock {
    fn now(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

// used when no output device could be opened: the transport still runs, just silently
#[derive(Clone, Debug)]
pub struct WallClock {
    started: Instant,
    sample_rate: u32,
}

impl WallClock {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            started: Instant::now(),
            sample_rate,
        }
    }
}

impl AudioClock for WallClock {
    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
pub use manual::ManualClock;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_clock_reads_frames_as_seconds() {
        let frames = FrameCounter::default();
        let clock = SampleClock::new(frames.clone(), 48000);
        assert_eq!(clock.now(), 0.0);
        frames.fetch_add(24000, Ordering::Release);
        assert_eq!(clock.now(), 0.5);
        assert_eq!(clock.sample_rate(), 48000);
    }

    #[test]
    fn wall_clock_moves_forward() {
        let clock = WallClock::new(44100);
        let a = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(clock.now() > a);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(44100);
        let view = clock.clone();
        clock.advance(0.25);
        clock.advance(0.25);
        assert_eq!(view.now(), 0.5);
    }
}
