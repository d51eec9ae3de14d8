// What survives a restart. Everything else (the recorded sequence, transport
// state, which pad is selected) starts fresh each session.

use serde::{Deserialize, Serialize};

use crate::pipeline::effects::SettingsStore;
use crate::shared::{DEFAULT_BPM, DEFAULT_VOLUME, KitId, clamp_bpm};

// Unknown or missing fields fall back to the defaults, so older or hand-edited
// project files still load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectState {
    pub kit: KitId,
    pub tempo: u32,
    pub volume: f32,
    pub muted: bool,
    pub looping: bool,
    pub effects: SettingsStore, // kit -> pad -> settings
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            kit: KitId::Acoustic,
            tempo: DEFAULT_BPM,
            volume: DEFAULT_VOLUME,
            muted: false,
            looping: false,
            effects: SettingsStore::default(),
        }
    }
}

impl ProjectState {
    // pull anything out of range back in
    pub fn sanitized(mut self) -> Self {
        self.tempo = clamp_bpm(self.tempo as i64);
        self.volume = if self.volume.is_finite() { self.volume.clamp(0.0, 1.0) } else { DEFAULT_VOLUME };
        self.effects = self.effects.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::PadId;

    #[test]
    fn empty_object_is_all_defaults() {
        let state: ProjectState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, ProjectState::default());
        assert_eq!(state.tempo, 120);
        assert_eq!(state.volume, 0.7);
    }

    #[test]
    fn out_of_range_values_are_pulled_in() {
        let state: ProjectState = serde_json::from_str(
            r#"{"tempo":999,"volume":3.0,"effects":{"acoustic":{"kick":{"pitch":7.0}}}}"#,
        )
        .unwrap();
        let state = state.sanitized();
        assert_eq!(state.tempo, 180);
        assert_eq!(state.volume, 1.0);
        assert_eq!(state.effects.get(PadId::Kick, KitId::Acoustic).pitch, 1.0);
    }
}
