use crate::audio::SampleBuffer;

use super::primitives::{frames_for, sine};

const CLICK_SECONDS: f32 = 0.1;
const CLICK_ATTACK: f32 = 0.01;
const CLICK_FLOOR: f32 = 0.001;

// Metronome tick: a short sine burst, linear rise over 10ms then an
// exponential fall to -60dB at 100ms. Accented ticks are higher and louder.
pub fn metronome_click(accent: bool, sample_rate: u32) -> SampleBuffer {
    let (hz, peak) = if accent { (1000.0, 0.3) } else { (800.0, 0.2) };
    let n = frames_for(CLICK_SECONDS, sample_rate);
    let fall = CLICK_SECONDS - CLICK_ATTACK;
    let samples: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let env = if t < CLICK_ATTACK {
                peak * t / CLICK_ATTACK
            } else {
                peak * (CLICK_FLOOR / peak).powf((t - CLICK_ATTACK) / fall)
            };
            sine(hz, t, 0.0) * env
        })
        .collect();
    SampleBuffer::from_mono(&samples, sample_rate)
}
