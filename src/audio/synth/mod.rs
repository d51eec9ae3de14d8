// Procedural drum voices: each recipe renders to a fixed-length buffer with
// identical left and right channels. No clamping; amplitudes stay around [-1, 1].

mod click;
pub mod primitives;
pub mod recipe;

pub use click::metronome_click;
pub use primitives::{create_rng, NoiseRng};
pub use recipe::Recipe;

use std::f32::consts::TAU;

use crate::audio::SampleBuffer;
use crate::shared::{KitId, PadId};

use primitives::{exp_decay, frames_for, linear_attack, sine, white, SweepOsc};
use recipe::{FilteredNoise, HarmonicStack, MultiTransient, PitchedDecay, ToneNoise};

pub fn synthesize(voice: PadId, kit: KitId, sample_rate: u32, rng: &mut NoiseRng) -> SampleBuffer {
    render_recipe(&Recipe::for_voice(voice, kit), sample_rate, rng)
}

pub fn render_recipe(recipe: &Recipe, sample_rate: u32, rng: &mut NoiseRng) -> SampleBuffer {
    let n = frames_for(recipe.duration(), sample_rate);
    let mono = match recipe {
        Recipe::PitchedDecay(r) => pitched_decay(r, n, sample_rate, rng),
        Recipe::ToneNoise(r) => tone_noise(r, n, sample_rate, rng),
        Recipe::FilteredNoise(r) => filtered_noise(r, n, sample_rate, rng),
        Recipe::MultiTransient(r) => multi_transient(r, n, sample_rate, rng),
        Recipe::HarmonicStack(r) => harmonic_stack(r, n, sample_rate, rng),
    };
    SampleBuffer::from_mono(&mono, sample_rate)
}

fn pitched_decay(r: &PitchedDecay, n: usize, sr: u32, rng: &mut NoiseRng) -> Vec<f32> {
    let mut osc = SweepOsc::new(r.start_hz, r.end_hz, r.sweep_rate, sr);
    let mut layer = osc.clone();
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            let mut s = osc.next(t) * r.tone_gain;
            if let Some(d) = r.detune {
                s += layer.next_scaled(t, d.ratio) * d.gain;
            }
            if let Some(tr) = r.transient {
                s += white(rng) * exp_decay(tr.decay, t) * tr.gain;
            }
            s * exp_decay(r.decay, t)
        })
        .collect()
}

fn tone_noise(r: &ToneNoise, n: usize, sr: u32, rng: &mut NoiseRng) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            let tone = sine(r.tone_hz, t, 0.0) * exp_decay(r.tone_decay, t);
            let noise = white(rng) * exp_decay(r.noise_decay, t);
            tone * r.tone_mix + noise * r.noise_mix
        })
        .collect()
}

fn filtered_noise(r: &FilteredNoise, n: usize, sr: u32, rng: &mut NoiseRng) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            color(white(rng), r.mod_hz, t) * exp_decay(r.decay, t)
        })
        .collect()
}

fn multi_transient(r: &MultiTransient, n: usize, sr: u32, rng: &mut NoiseRng) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            let mut s = 0.0;
            for j in 0..r.bursts {
                let onset = j as f32 * r.spacing;
                if t >= onset {
                    let gain = 1.0 - j as f32 * r.burst_falloff;
                    s += white(rng) * exp_decay(r.burst_decay, t - onset) * gain;
                }
            }
            s += white(rng) * exp_decay(r.body_decay, t) * r.body_gain;
            match r.color_hz {
                Some(hz) => color(s, hz, t),
                None => s,
            }
        })
        .collect()
}

fn harmonic_stack(r: &HarmonicStack, n: usize, sr: u32, rng: &mut NoiseRng) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sr as f32;
            let tone: f32 = r
                .partials
                .iter()
                .enumerate()
                .map(|(j, &(hz, gain))| sine(hz, t, j as f32 * r.phase_step) * gain)
                .sum();
            let noise = if r.tone_mix < 1.0 {
                let w = white(rng);
                match r.noise_color_hz {
                    Some(hz) => color(w, hz, t),
                    None => w,
                }
            } else {
                0.0
            };
            let env = linear_attack(r.attack, t) * exp_decay(r.decay, t);
            (tone * r.tone_mix + noise * (1.0 - r.tone_mix)) * env
        })
        .collect()
}

// amplitude modulation by a fast sine, a cheap stand-in for a band-pass
#[inline]
fn color(x: f32, hz: f32, t: f32) -> f32 {
    x * (0.5 + 0.5 * (TAU * hz * t).sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44100;

    fn rms(buf: &SampleBuffer, from: usize, to: usize) -> f32 {
        let slice = &buf.data[from..to];
        (slice.iter().map(|f| f.left * f.left).sum::<f32>() / slice.len() as f32).sqrt()
    }

    #[test]
    fn every_voice_has_exact_length_and_mirrored_channels() {
        let mut rng = create_rng(Some(3));
        for kit in KitId::ALL {
            for pad in PadId::ALL {
                let recipe = Recipe::for_voice(pad, kit);
                let buf = synthesize(pad, kit, SR, &mut rng);
                let expected = (recipe.duration() as f64 * SR as f64).round() as usize;
                assert_eq!(buf.len(), expected, "{pad:?}/{kit:?}");
                assert_eq!(buf.sample_rate, SR);
                assert!(buf.data.iter().all(|f| f.left == f.right), "{pad:?}/{kit:?}");
                assert!(buf.data.iter().all(|f| f.left.is_finite()));
            }
        }
    }

    #[test]
    fn durations_match_recipe_table() {
        let table = [
            (PadId::Kick, [0.5, 0.4, 0.6]),
            (PadId::Snare, [0.3, 0.25, 0.4]),
            (PadId::HiHat, [0.15, 0.1, 0.12]),
            (PadId::Clap, [0.3, 0.2, 0.3]),
            (PadId::Tom1, [0.6, 0.5, 0.6]),
            (PadId::Tom2, [0.6, 0.5, 0.6]),
            (PadId::Crash, [1.5, 1.0, 1.8]),
            (PadId::Ride, [1.0, 0.8, 0.8]),
        ];
        for (pad, durations) in table {
            for (kit, d) in KitId::ALL.into_iter().zip(durations) {
                assert_eq!(Recipe::for_voice(pad, kit).duration(), d, "{pad:?}/{kit:?}");
            }
        }
    }

    #[test]
    fn follows_sample_rate() {
        let mut rng = create_rng(Some(3));
        let buf = synthesize(PadId::Snare, KitId::Acoustic, 48000, &mut rng);
        assert_eq!(buf.len(), 14400);
    }

    #[test]
    fn pitched_voices_start_at_f0_and_sweep_down() {
        for kit in KitId::ALL {
            for pad in [PadId::Kick, PadId::Tom1, PadId::Tom2] {
                let Recipe::PitchedDecay(r) = Recipe::for_voice(pad, kit) else {
                    panic!("{pad:?} should be a pitched-decay voice");
                };
                let osc = SweepOsc::new(r.start_hz, r.end_hz, r.sweep_rate, SR);
                assert_eq!(osc.frequency_at(0.0), r.start_hz);
                let n = frames_for(r.duration, SR);
                let mut prev = f32::INFINITY;
                for i in (0..n).step_by(64) {
                    let f = osc.frequency_at(i as f32 / SR as f32);
                    assert!(f < prev, "{pad:?}/{kit:?} rose at frame {i}");
                    prev = f;
                }
            }
        }
    }

    #[test]
    fn envelopes_decay_over_the_buffer() {
        let mut rng = create_rng(Some(11));
        for kit in KitId::ALL {
            for pad in PadId::ALL {
                let buf = synthesize(pad, kit, SR, &mut rng);
                let n = buf.len();
                let head = rms(&buf, n / 20, n / 5);
                let tail = rms(&buf, n * 4 / 5, n);
                assert!(tail < head, "{pad:?}/{kit:?}: head {head} tail {tail}");
            }
        }
    }

    #[test]
    fn noise_voices_differ_between_renders_but_seeded_renders_match() {
        let mut rng = create_rng(None);
        let a = synthesize(PadId::HiHat, KitId::Acoustic, SR, &mut rng);
        let b = synthesize(PadId::HiHat, KitId::Acoustic, SR, &mut rng);
        assert_eq!(a.len(), b.len());
        assert_ne!(a.data, b.data);

        let a = synthesize(PadId::Clap, KitId::HipHop, SR, &mut create_rng(Some(9)));
        let b = synthesize(PadId::Clap, KitId::HipHop, SR, &mut create_rng(Some(9)));
        assert_eq!(a, b);
    }

    #[test]
    fn pure_tone_voices_are_deterministic() {
        let recipe = Recipe::for_voice(PadId::Kick, KitId::Acoustic);
        assert!(!recipe.uses_noise());
        let a = synthesize(PadId::Kick, KitId::Acoustic, SR, &mut create_rng(Some(1)));
        let b = synthesize(PadId::Kick, KitId::Acoustic, SR, &mut create_rng(Some(2)));
        assert_eq!(a, b);
        assert_eq!(a.data[0].left, 0.0); // sine starts at zero phase
    }

    #[test]
    fn cymbals_ramp_in() {
        let mut rng = create_rng(Some(5));
        let buf = synthesize(PadId::Ride, KitId::Electronic, SR, &mut rng);
        let attack_end = frames_for(0.01, SR);
        assert!(rms(&buf, 0, attack_end / 4) < rms(&buf, attack_end, attack_end * 2));
    }

    #[test]
    fn crash_is_denser_lower_and_faster_than_ride() {
        for kit in KitId::ALL {
            let (Recipe::HarmonicStack(c), Recipe::HarmonicStack(r)) =
                (Recipe::for_voice(PadId::Crash, kit), Recipe::for_voice(PadId::Ride, kit))
            else {
                panic!("cymbals should be harmonic stacks");
            };
            assert!(c.partials.len() >= r.partials.len());
            assert!(c.partials[0].0 <= r.partials[0].0);
            assert!(c.decay > r.decay);
        }
    }
}
