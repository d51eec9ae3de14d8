// Kit export/import: tempo plus every pad's effect knobs for one kit, as JSON.
// Sample audio never goes in the file, only a flag saying a pad had one.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DrumError, DrumResult};
use crate::pipeline::effects::{EffectSettings, SettingsStore};
use crate::shared::{KitId, NUM_PADS, PadId, clamp_bpm};

pub const CUSTOM_SAMPLE_WARNING: &str = "Custom samples must be uploaded separately";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PadEntry {
    #[serde(flatten)]
    pub settings: EffectSettings,
    #[serde(default, rename = "hasCustomSample")]
    pub has_custom_sample: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitFile {
    #[serde(default)]
    pub name: Option<KitId>,
    #[serde(default)]
    pub tempo: Option<i64>,
    #[serde(default)]
    pub has_custom_samples: bool,
    #[serde(default)]
    pub pads: BTreeMap<PadId, PadEntry>,
}

// what loading changed, for the caller to act on
#[derive(Clone, Debug, PartialEq)]
pub struct KitLoad {
    pub kit: KitId,
    pub tempo: Option<u32>,
    pub pads: usize,
    pub missing_samples: Vec<PadId>,
}

impl KitFile {
    pub fn capture(kit: KitId, tempo: u32, store: &SettingsStore, custom: [bool; NUM_PADS]) -> Self {
        let pads = PadId::ALL
            .into_iter()
            .map(|pad| {
                let entry = PadEntry {
                    settings: store.get(pad, kit),
                    has_custom_sample: custom[pad.index()],
                };
                (pad, entry)
            })
            .collect();
        Self {
            name: Some(kit),
            tempo: Some(tempo as i64),
            has_custom_samples: custom.iter().any(|&c| c),
            pads,
        }
    }

    pub fn parse(text: &str) -> DrumResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> DrumResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Settings land on the kit named in the file (or `active` if unnamed).
    // Pads the file doesn't mention are left as they are.
    pub fn apply(&self, store: &mut SettingsStore, active: KitId, custom: [bool; NUM_PADS]) -> KitLoad {
        let kit = self.name.unwrap_or(active);
        let mut missing_samples = Vec::new();
        for (pad, entry) in &self.pads {
            store.set(*pad, kit, entry.settings);
            if entry.has_custom_sample && !custom[pad.index()] {
                missing_samples.push(*pad);
            }
        }
        KitLoad {
            kit,
            tempo: self.tempo.map(clamp_bpm),
            pads: self.pads.len(),
            missing_samples,
        }
    }
}

pub fn save(path: &Path, file: &KitFile) -> DrumResult<()> {
    let json = file.to_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DrumError::Store {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, json).map_err(|source| DrumError::Store {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load(path: &Path) -> DrumResult<KitFile> {
    let text = std::fs::read_to_string(path).map_err(|source| DrumError::Store {
        path: path.to_path_buf(),
        source,
    })?;
    KitFile::parse(&text)
}
