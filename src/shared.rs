// Types shared between the front end, the middle layer and the core.
//
// Key plan for the terminal front end:
//
// Pads (the 8 drum voices):
//   q w e r       //  TriggerPad(kick, snare, hihat, clap)
//   a s d f       //  TriggerPad(tom1, tom2, crash, ride)
//   Q W E R / A S D F (shifted)  //  SelectPad(...) for effect editing
//
// Transport:
//   Space         //  TogglePlay (stops recording first if recording)
//   b             //  ToggleRecord
//   .             //  Stop
//   o             //  ToggleLoop
//   m             //  ToggleMute
//   t             //  ToggleMetronome
//   - / =         //  AdjustTempo(-1 / +1)
//   [ / ]         //  AdjustVolume(-0.05 / +0.05)
//
// Kits and effects:
//   1 2 3         //  SelectKit(acoustic, electronic, hiphop)
//   g             //  NextParam (pitch -> filter -> reverb -> delay -> distortion)
//   , / /         //  AdjustParam(-0.05 / +0.05) on the selected pad
//   h             //  ToggleParam (enable flag of the current param)
//
// Files:
//   k / K         //  SaveKit / LoadKit
//   i / I         //  ImportSample / RemoveSample for the selected pad
//
// Quit:
//   Esc           //  Quit

use serde::{Deserialize, Serialize};

pub const NUM_PADS: usize = 8;
pub const LED_SLOTS: i8 = 8;
pub const LED_OFF: i8 = -1;

pub const MIN_BPM: u32 = 60;
pub const MAX_BPM: u32 = 180;
pub const DEFAULT_BPM: u32 = 120;
pub const DEFAULT_VOLUME: f32 = 0.7;

// the pad id doubles as the voice kind: each pad plays exactly one drum voice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadId {
    Kick,
    Snare,
    HiHat,
    Clap,
    Tom1,
    Tom2,
    Crash,
    Ride,
}

impl PadId {
    pub const ALL: [PadId; NUM_PADS] = [
        PadId::Kick,
        PadId::Snare,
        PadId::HiHat,
        PadId::Clap,
        PadId::Tom1,
        PadId::Tom2,
        PadId::Crash,
        PadId::Ride,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    // stable key used for file names and the kit file
    pub fn as_str(self) -> &'static str {
        match self {
            PadId::Kick => "kick",
            PadId::Snare => "snare",
            PadId::HiHat => "hihat",
            PadId::Clap => "clap",
            PadId::Tom1 => "tom1",
            PadId::Tom2 => "tom2",
            PadId::Crash => "crash",
            PadId::Ride => "ride",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PadId::Kick => "KICK",
            PadId::Snare => "SNARE",
            PadId::HiHat => "HIHAT",
            PadId::Clap => "CLAP",
            PadId::Tom1 => "TOM 1",
            PadId::Tom2 => "TOM 2",
            PadId::Crash => "CRASH",
            PadId::Ride => "RIDE",
        }
    }

    pub fn key(self) -> char {
        match self {
            PadId::Kick => 'Q',
            PadId::Snare => 'W',
            PadId::HiHat => 'E',
            PadId::Clap => 'R',
            PadId::Tom1 => 'A',
            PadId::Tom2 => 'S',
            PadId::Crash => 'D',
            PadId::Ride => 'F',
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KitId {
    #[default]
    Acoustic,
    Electronic,
    HipHop,
}

impl KitId {
    pub const ALL: [KitId; 3] = [KitId::Acoustic, KitId::Electronic, KitId::HipHop];

    pub fn as_str(self) -> &'static str {
        match self {
            KitId::Acoustic => "acoustic",
            KitId::Electronic => "electronic",
            KitId::HipHop => "hiphop",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    #[default]
    Idle,
    Recording,
    Playing,
}

impl TransportState {
    pub fn label(self) -> &'static str {
        match self {
            TransportState::Idle => "READY",
            TransportState::Recording => "RECORDING",
            TransportState::Playing => "PLAYING",
        }
    }
}

// which effect knob the adjust keys are bound to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EffectParam {
    #[default]
    Pitch,
    Filter,
    Reverb,
    Delay,
    Distortion,
}

impl EffectParam {
    pub fn next(self) -> Self {
        match self {
            EffectParam::Pitch => EffectParam::Filter,
            EffectParam::Filter => EffectParam::Reverb,
            EffectParam::Reverb => EffectParam::Delay,
            EffectParam::Delay => EffectParam::Distortion,
            EffectParam::Distortion => EffectParam::Pitch,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectParam::Pitch => "PITCH",
            EffectParam::Filter => "FILTER",
            EffectParam::Reverb => "REVERB",
            EffectParam::Delay => "DELAY",
            EffectParam::Distortion => "DIST",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    TriggerPad(PadId),
    SelectPad(PadId),
    SelectKit(KitId),

    TogglePlay,
    ToggleRecord,
    Stop,
    ToggleLoop,
    ToggleMute,
    ToggleMetronome,
    AdjustTempo(i32),
    AdjustVolume(f32),

    NextParam,
    AdjustParam(f32),
    ToggleParam,

    SaveKit,
    LoadKit,
    ImportSample,
    RemoveSample,

    Quit,
}

// what the core reports back to whoever is drawing it
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Triggered { pad: PadId, label: &'static str },
    Led(i8),
    Progress { remaining: f64, fraction: f64 },
    Status(String),
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub message: String,
    pub transport: TransportState,
    pub looping: bool,
    pub muted: bool,
    pub metronome: bool,
    pub bpm: u32,
    pub volume: f32,
    pub led: i8,                      // -1 = all off, 0..=7 lit slot
    pub active_pad: Option<PadId>,    // flashes on trigger
    pub selected_pad: Option<PadId>,  // pad whose effects are being edited
    pub kit: KitId,
    pub param: EffectParam,
    pub param_value: f32,
    pub param_enabled: bool,
    pub custom: [bool; NUM_PADS],     // pads playing a user sample
    pub audio_ok: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            message: "READY".to_string(),
            transport: TransportState::Idle,
            looping: false,
            muted: false,
            metronome: false,
            bpm: DEFAULT_BPM,
            volume: DEFAULT_VOLUME,
            led: LED_OFF,
            active_pad: None,
            selected_pad: None,
            kit: KitId::Acoustic,
            param: EffectParam::Pitch,
            param_value: 0.5,
            param_enabled: true,
            custom: [false; NUM_PADS],
            audio_ok: true,
        }
    }
}

pub fn clamp_bpm(bpm: i64) -> u32 {
    bpm.clamp(MIN_BPM as i64, MAX_BPM as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_ids_serialize_as_lowercase_keys() {
        for pad in PadId::ALL {
            let json = serde_json::to_string(&pad).unwrap();
            assert_eq!(json, format!("\"{}\"", pad.as_str()));
        }
        let kit: KitId = serde_json::from_str("\"hiphop\"").unwrap();
        assert_eq!(kit, KitId::HipHop);
    }

    #[test]
    fn pad_index_round_trips() {
        for (i, pad) in PadId::ALL.iter().enumerate() {
            assert_eq!(pad.index(), i);
            assert_eq!(PadId::from_index(i), Some(*pad));
        }
        assert_eq!(PadId::from_index(NUM_PADS), None);
    }

    #[test]
    fn tempo_is_clamped_to_range() {
        assert_eq!(clamp_bpm(10), MIN_BPM);
        assert_eq!(clamp_bpm(500), MAX_BPM);
        assert_eq!(clamp_bpm(121), 121);
    }
}
