// Per-trigger effect chain: pitch, filter, distortion, delay, reverb, always in
// that order. Disabled stages (and dist/delay/reverb at 0) are skipped outright.

mod delay;
mod distortion;
mod filter;
mod pitch;
mod reverb;

use crate::audio::frame::StereoFrame;
use crate::audio::sample_buffer::SampleBuffer;
use crate::audio::synth::NoiseRng;
use crate::pipeline::effects::EffectSettings;

pub use delay::Delay;
pub use distortion::Distortion;
pub use filter::LowPass;
pub use pitch::Pitch;
pub use reverb::Reverb;

pub trait Effect: Send {
    // may change the length (pitch, delay and reverb tails)
    fn process(&mut self, buf: &mut Vec<StereoFrame>);
}

#[derive(Clone, Debug, PartialEq)]
pub enum EffectSpec {
    Pitch { cents: f32 },
    LowPass { cutoff_hz: f32 },
    Distortion { amount: f32 },
    Delay { seconds: f32, wet: f32 },
    Reverb { seconds: f32, wet: f32 },
}

impl EffectSpec {
    // knob value -> stage parameters, in chain order
    pub fn chain_for(settings: &EffectSettings) -> Vec<EffectSpec> {
        let s = settings;
        let mut chain = Vec::with_capacity(5);
        if s.enabled.pitch {
            chain.push(EffectSpec::Pitch { cents: (s.pitch - 0.5) * 1200.0 });
        }
        if s.enabled.filter {
            chain.push(EffectSpec::LowPass { cutoff_hz: s.filter * 15000.0 + 100.0 });
        }
        if s.enabled.distortion && s.distortion > 0.0 {
            chain.push(EffectSpec::Distortion { amount: s.distortion * 100.0 });
        }
        if s.enabled.delay && s.delay > 0.0 {
            chain.push(EffectSpec::Delay {
                seconds: s.delay * 0.5,
                wet: s.delay * 0.8,
            });
        }
        if s.enabled.reverb && s.reverb > 0.0 {
            chain.push(EffectSpec::Reverb {
                seconds: s.reverb * 2.0,
                wet: s.reverb * 0.5,
            });
        }
        chain
    }

    pub fn to_effect(&self, sample_rate: u32, rng: &mut NoiseRng) -> Box<dyn Effect> {
        match *self {
            EffectSpec::Pitch { cents } => Box::new(Pitch::new(cents)),
            EffectSpec::LowPass { cutoff_hz } => Box::new(LowPass::new(cutoff_hz, sample_rate)),
            EffectSpec::Distortion { amount } => Box::new(Distortion::new(amount)),
            EffectSpec::Delay { seconds, wet } => Box::new(Delay::new(seconds, wet, sample_rate)),
            // a new impulse every time, so the tail follows the knob
            EffectSpec::Reverb { seconds, wet } => Box::new(Reverb::new(seconds, wet, sample_rate, rng)),
        }
    }

    #[cfg(test)]
    pub fn label(&self) -> String {
        match self {
            EffectSpec::Pitch { cents } => format!("Pitch({cents:+.0}c)"),
            EffectSpec::LowPass { cutoff_hz } => format!("LowPass({cutoff_hz:.0}Hz)"),
            EffectSpec::Distortion { amount } => format!("Distortion({amount:.0})"),
            EffectSpec::Delay { seconds, wet } => format!("Delay({seconds:.2}s, {wet:.2})"),
            EffectSpec::Reverb { seconds, wet } => format!("Reverb({seconds:.2}s, {wet:.2})"),
        }
    }
}

pub fn apply_chain(source: &SampleBuffer, settings: &EffectSettings, rng: &mut NoiseRng) -> SampleBuffer {
    let chain = EffectSpec::chain_for(settings);
    let mut data = source.data.clone();
    for spec in &chain {
        spec.to_effect(source.sample_rate, rng).process(&mut data);
    }
    SampleBuffer::new(data, source.sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth::{create_rng, synthesize};
    use crate::pipeline::effects::EffectToggles;
    use crate::shared::{KitId, PadId};

    fn bypassed() -> EffectSettings {
        EffectSettings {
            enabled: EffectToggles::none(),
            ..EffectSettings::default()
        }
    }

    fn kick() -> SampleBuffer {
        synthesize(PadId::Kick, KitId::Acoustic, 44100, &mut create_rng(Some(1)))
    }

    #[test]
    fn default_chain_is_pitch_then_filter() {
        let chain = EffectSpec::chain_for(&EffectSettings::default());
        assert_eq!(
            chain,
            vec![
                EffectSpec::Pitch { cents: 0.0 },
                EffectSpec::LowPass { cutoff_hz: 15100.0 },
            ]
        );
    }

    #[test]
    fn stages_come_out_in_fixed_order() {
        let s = EffectSettings {
            pitch: 1.0,
            filter: 0.0,
            reverb: 0.5,
            delay: 0.5,
            distortion: 0.5,
            enabled: EffectToggles {
                pitch: true,
                filter: true,
                reverb: true,
                delay: true,
                distortion: true,
            },
        };
        let labels: Vec<String> = EffectSpec::chain_for(&s).iter().map(|e| e.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Pitch(+600c)",
                "LowPass(100Hz)",
                "Distortion(50)",
                "Delay(0.25s, 0.40)",
                "Reverb(1.00s, 0.25)",
            ]
        );
    }

    #[test]
    fn everything_disabled_passes_through() {
        let src = kick();
        let out = apply_chain(&src, &bypassed(), &mut create_rng(Some(1)));
        assert_eq!(out, src);
    }

    #[test]
    fn disabled_stages_ignore_their_values() {
        let mut s = bypassed();
        s.pitch = 0.9;
        s.filter = 0.0;
        s.distortion = 1.0;
        s.delay = 1.0;
        s.reverb = 1.0;
        assert!(EffectSpec::chain_for(&s).is_empty());
        let src = kick();
        assert_eq!(apply_chain(&src, &s, &mut create_rng(Some(1))), src);
    }

    #[test]
    fn zero_valued_stages_are_skipped_even_when_enabled() {
        let mut s = bypassed();
        s.enabled.distortion = true;
        s.enabled.delay = true;
        s.enabled.reverb = true;
        s.distortion = 0.0;
        s.delay = 0.0;
        s.reverb = 0.0;
        assert!(EffectSpec::chain_for(&s).is_empty());
        let src = kick();
        // sample-for-sample identical, no curve applied
        assert_eq!(apply_chain(&src, &s, &mut create_rng(Some(1))).data, src.data);
    }

    #[test]
    fn centered_pitch_keeps_duration() {
        let mut s = bypassed();
        s.enabled.pitch = true;
        let src = kick();
        let out = apply_chain(&src, &s, &mut create_rng(Some(1)));
        assert_eq!(out.len(), src.len());
    }

    #[test]
    fn tails_only_extend() {
        let mut s = bypassed();
        s.enabled.delay = true;
        s.delay = 0.2;
        s.enabled.reverb = true;
        s.reverb = 0.1;
        let src = kick();
        let out = apply_chain(&src, &s, &mut create_rng(Some(1)));
        assert!(out.len() > src.len());
        // the dry signal is still there at the head
        assert!((out.data[100].left - src.data[100].left).abs() < 0.05);
    }
}
