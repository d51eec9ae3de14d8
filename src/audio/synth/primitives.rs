// envelopes, oscillators and noise shared by every drum recipe

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

// seeded for reproducible waveforms, otherwise from OS entropy
pub type NoiseRng = Pcg32;

pub fn create_rng(seed: Option<u64>) -> NoiseRng {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    }
}

// [-1, 1)
#[inline]
pub fn white(rng: &mut NoiseRng) -> f32 {
    rng.r#gen::<f32>() * 2.0 - 1.0
}

#[inline]
pub fn exp_decay(rate: f32, t: f32) -> f32 {
    (-rate * t).exp()
}

#[inline]
pub fn linear_attack(attack: f32, t: f32) -> f32 {
    if attack <= 0.0 { 1.0 } else { (t / attack).min(1.0) }
}

pub fn frames_for(duration: f32, sample_rate: u32) -> usize {
    (duration as f64 * sample_rate as f64).round() as usize
}

#[inline]
pub fn sine(freq: f32, t: f32, phase: f32) -> f32 {
    (TAU as f32 * freq * t + phase).sin()
}

// f(t) = start * (end/start)^(t * rate); phase is accumulated per sample so
// the instantaneous frequency is exactly frequency_at(t)
#[derive(Clone, Debug)]
pub struct SweepOsc {
    start_hz: f32,
    ratio: f32,
    rate: f32,
    phase: f64,
    sample_rate: f64,
}

impl SweepOsc {
    pub fn new(start_hz: f32, end_hz: f32, rate: f32, sample_rate: u32) -> Self {
        Self {
            start_hz,
            ratio: end_hz / start_hz,
            rate,
            phase: 0.0,
            sample_rate: sample_rate as f64,
        }
    }

    pub fn frequency_at(&self, t: f32) -> f32 {
        self.start_hz * self.ratio.powf(t * self.rate)
    }

    pub fn next(&mut self, t: f32) -> f32 {
        self.next_scaled(t, 1.0)
    }

    // detuned layers
    pub fn next_scaled(&mut self, t: f32, scale: f32) -> f32 {
        let out = self.phase.sin() as f32;
        self.phase += TAU * (self.frequency_at(t) * scale) as f64 / self.sample_rate;
        if self.phase > TAU {
            self.phase -= TAU;
        }
        out
    }
}
