// the five drum models and the 24 kit recipes built from them

use crate::shared::{KitId, PadId};

// kicks, toms
#[derive(Clone, Debug, PartialEq)]
pub struct PitchedDecay {
    pub duration: f32,
    pub start_hz: f32,
    pub end_hz: f32,
    pub sweep_rate: f32,
    pub decay: f32,
    pub tone_gain: f32,
    pub detune: Option<Detune>,
    pub transient: Option<NoiseTransient>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detune {
    pub ratio: f32,
    pub gain: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseTransient {
    pub gain: f32,
    pub decay: f32,
}

// snares
#[derive(Clone, Debug, PartialEq)]
pub struct ToneNoise {
    pub duration: f32,
    pub tone_hz: f32,
    pub tone_decay: f32,
    pub noise_decay: f32,
    pub tone_mix: f32,
    pub noise_mix: f32,
}

// hi-hats: noise under a fast amplitude modulation
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredNoise {
    pub duration: f32,
    pub mod_hz: f32,
    pub decay: f32,
}

// claps
#[derive(Clone, Debug, PartialEq)]
pub struct MultiTransient {
    pub duration: f32,
    pub bursts: u32,
    pub spacing: f32,
    pub burst_decay: f32,
    // burst j gets 1 - j * burst_falloff
    pub burst_falloff: f32,
    pub body_decay: f32,
    pub body_gain: f32,
    pub color_hz: Option<f32>,
}

// crash, ride
#[derive(Clone, Debug, PartialEq)]
pub struct HarmonicStack {
    pub duration: f32,
    pub partials: &'static [(f32, f32)],
    pub phase_step: f32,
    // noise gets 1 - tone_mix
    pub tone_mix: f32,
    pub attack: f32,
    pub decay: f32,
    pub noise_color_hz: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Recipe {
    PitchedDecay(PitchedDecay),
    ToneNoise(ToneNoise),
    FilteredNoise(FilteredNoise),
    MultiTransient(MultiTransient),
    HarmonicStack(HarmonicStack),
}

impl Recipe {
    pub fn duration(&self) -> f32 {
        match self {
            Recipe::PitchedDecay(r) => r.duration,
            Recipe::ToneNoise(r) => r.duration,
            Recipe::FilteredNoise(r) => r.duration,
            Recipe::MultiTransient(r) => r.duration,
            Recipe::HarmonicStack(r) => r.duration,
        }
    }

    #[cfg(test)]
    pub fn uses_noise(&self) -> bool {
        match self {
            Recipe::PitchedDecay(r) => r.transient.is_some(),
            Recipe::HarmonicStack(r) => r.tone_mix < 1.0,
            _ => true,
        }
    }

    pub fn for_voice(voice: PadId, kit: KitId) -> Recipe {
        match voice {
            PadId::Kick => kick(kit),
            PadId::Snare => snare(kit),
            PadId::HiHat => hihat(kit),
            PadId::Clap => clap(kit),
            PadId::Tom1 => tom(kit, tom_base(kit, 180.0, 200.0, 160.0)),
            PadId::Tom2 => tom(kit, tom_base(kit, 140.0, 150.0, 120.0)),
            PadId::Crash => crash(kit),
            PadId::Ride => ride(kit),
        }
    }
}

const CRASH_PARTIALS: [(f32, f32); 10] = [
    (300.0, 0.1),
    (450.0, 0.1),
    (600.0, 0.1),
    (750.0, 0.1),
    (900.0, 0.1),
    (1200.0, 0.1),
    (1600.0, 0.1),
    (2000.0, 0.1),
    (2500.0, 0.1),
    (3000.0, 0.1),
];

const RIDE_PARTIALS: [(f32, f32); 7] = [
    (400.0, 0.1),
    (800.0, 0.1),
    (1200.0, 0.1),
    (1800.0, 0.1),
    (2400.0, 0.1),
    (3000.0, 0.1),
    (3600.0, 0.1),
];

const ELECTRONIC_CRASH_PARTIALS: [(f32, f32); 4] = [
    (540.0, 0.1),
    (1120.0, 0.1),
    (2650.0, 0.1),
    (5000.0, 0.1),
];

// bell-like ride: fundamental plus fifth and octave
const ELECTRONIC_RIDE_PARTIALS: [(f32, f32); 3] = [(800.0, 1.0), (1200.0, 0.3), (1600.0, 0.2)];

const CYMBAL_ATTACK: f32 = 0.01;

fn kick(kit: KitId) -> Recipe {
    let r = match kit {
        KitId::Acoustic => PitchedDecay {
            duration: 0.5,
            start_hz: 150.0,
            end_hz: 40.0,
            sweep_rate: 10.0,
            decay: 5.0,
            tone_gain: 1.0,
            detune: None,
            transient: None,
        },
        KitId::Electronic => PitchedDecay {
            duration: 0.4,
            start_hz: 60.0,
            end_hz: 40.0,
            sweep_rate: 8.0,
            decay: 8.0,
            tone_gain: 1.0,
            detune: Some(Detune { ratio: 1.01, gain: 0.2 }),
            transient: None,
        },
        // deeper and longer
        KitId::HipHop => PitchedDecay {
            duration: 0.6,
            start_hz: 80.0,
            end_hz: 30.0,
            sweep_rate: 5.0,
            decay: 4.0,
            tone_gain: 1.0,
            detune: None,
            transient: None,
        },
    };
    Recipe::PitchedDecay(r)
}

fn snare(kit: KitId) -> Recipe {
    let r = match kit {
        KitId::Acoustic => ToneNoise {
            duration: 0.3,
            tone_hz: 180.0,
            tone_decay: 15.0,
            noise_decay: 7.0,
            tone_mix: 0.7,
            noise_mix: 0.3,
        },
        KitId::Electronic => ToneNoise {
            duration: 0.25,
            tone_hz: 220.0,
            tone_decay: 20.0,
            noise_decay: 10.0,
            tone_mix: 0.5,
            noise_mix: 0.5,
        },
        KitId::HipHop => ToneNoise {
            duration: 0.4,
            tone_hz: 150.0,
            tone_decay: 10.0,
            noise_decay: 5.0,
            tone_mix: 0.6,
            noise_mix: 0.4,
        },
    };
    Recipe::ToneNoise(r)
}

fn hihat(kit: KitId) -> Recipe {
    let r = match kit {
        KitId::Acoustic => FilteredNoise { duration: 0.15, mod_hz: 8000.0, decay: 50.0 },
        KitId::Electronic => FilteredNoise { duration: 0.1, mod_hz: 10000.0, decay: 70.0 },
        KitId::HipHop => FilteredNoise { duration: 0.12, mod_hz: 7000.0, decay: 60.0 },
    };
    Recipe::FilteredNoise(r)
}

fn clap(kit: KitId) -> Recipe {
    let r = match kit {
        KitId::Acoustic => MultiTransient {
            duration: 0.3,
            bursts: 5,
            spacing: 0.005,
            burst_decay: 40.0,
            burst_falloff: 0.15,
            body_decay: 10.0,
            body_gain: 0.5,
            color_hz: None,
        },
        // tight, band-limited
        KitId::Electronic => MultiTransient {
            duration: 0.2,
            bursts: 3,
            spacing: 0.003,
            burst_decay: 60.0,
            burst_falloff: 0.25,
            body_decay: 15.0,
            body_gain: 0.5,
            color_hz: Some(2000.0),
        },
        // wider spacing, roomier tail
        KitId::HipHop => MultiTransient {
            duration: 0.3,
            bursts: 4,
            spacing: 0.008,
            burst_decay: 30.0,
            burst_falloff: 0.2,
            body_decay: 8.0,
            body_gain: 0.6,
            color_hz: None,
        },
    };
    Recipe::MultiTransient(r)
}

fn tom_base(kit: KitId, acoustic: f32, electronic: f32, hiphop: f32) -> f32 {
    match kit {
        KitId::Acoustic => acoustic,
        KitId::Electronic => electronic,
        KitId::HipHop => hiphop,
    }
}

fn tom(kit: KitId, base_hz: f32) -> Recipe {
    let (duration, drop, decay) = match kit {
        KitId::Electronic => (0.5, 0.7, 7.0),
        KitId::Acoustic | KitId::HipHop => (0.6, 0.8, 5.0),
    };
    Recipe::PitchedDecay(PitchedDecay {
        duration,
        start_hz: base_hz,
        end_hz: base_hz * drop,
        sweep_rate: 5.0,
        decay,
        tone_gain: 0.8,
        detune: None,
        transient: Some(NoiseTransient { gain: 0.2, decay: 50.0 }),
    })
}

fn crash(kit: KitId) -> Recipe {
    let r = match kit {
        KitId::Acoustic | KitId::HipHop => HarmonicStack {
            duration: if kit == KitId::HipHop { 1.8 } else { 1.5 },
            partials: &CRASH_PARTIALS,
            phase_step: 0.2,
            tone_mix: 0.3,
            attack: CYMBAL_ATTACK,
            decay: 5.0,
            noise_color_hz: None,
        },
        KitId::Electronic => HarmonicStack {
            duration: 1.0,
            partials: &ELECTRONIC_CRASH_PARTIALS,
            phase_step: 0.2,
            tone_mix: 0.1,
            attack: CYMBAL_ATTACK,
            decay: 4.0,
            noise_color_hz: Some(5000.0),
        },
    };
    Recipe::HarmonicStack(r)
}

fn ride(kit: KitId) -> Recipe {
    let r = match kit {
        KitId::Acoustic | KitId::HipHop => HarmonicStack {
            duration: if kit == KitId::HipHop { 0.8 } else { 1.0 },
            partials: &RIDE_PARTIALS,
            phase_step: 0.2,
            tone_mix: 0.4,
            attack: CYMBAL_ATTACK,
            decay: 3.0,
            noise_color_hz: None,
        },
        KitId::Electronic => HarmonicStack {
            duration: 0.8,
            partials: &ELECTRONIC_RIDE_PARTIALS,
            phase_step: 0.0,
            tone_mix: 1.0,
            attack: CYMBAL_ATTACK,
            decay: 3.5,
            noise_color_hz: None,
        },
    };
    Recipe::HarmonicStack(r)
}
