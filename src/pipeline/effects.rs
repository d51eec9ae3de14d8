// The effect data: per (pad, kit) knob values and enable flags, plus the
// store that holds them for every pad of every kit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shared::{EffectParam, KitId, PadId};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectToggles {
    pub pitch: bool,
    pub filter: bool,
    pub reverb: bool,
    pub delay: bool,
    pub distortion: bool,
}

impl Default for EffectToggles {
    fn default() -> Self {
        Self {
            pitch: true,
            filter: true,
            reverb: false,
            delay: false,
            distortion: false,
        }
    }
}

impl EffectToggles {
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            pitch: false,
            filter: false,
            reverb: false,
            delay: false,
            distortion: false,
        }
    }
}

// Every value is normalized to [0, 1]; the effect chain maps it to real units.
// Missing fields in persisted data fall back to the defaults below, which kit
// files round-trip through, so don't change them lightly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    pub pitch: f32,
    pub filter: f32,
    pub reverb: f32,
    pub delay: f32,
    pub distortion: f32,
    #[serde(rename = "effectsEnabled")]
    pub enabled: EffectToggles,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            pitch: 0.5,
            filter: 1.0,
            reverb: 0.3,
            delay: 0.0,
            distortion: 0.0,
            enabled: EffectToggles::default(),
        }
    }
}

impl EffectSettings {
    pub fn value(&self, param: EffectParam) -> f32 {
        match param {
            EffectParam::Pitch => self.pitch,
            EffectParam::Filter => self.filter,
            EffectParam::Reverb => self.reverb,
            EffectParam::Delay => self.delay,
            EffectParam::Distortion => self.distortion,
        }
    }

    pub fn set_value(&mut self, param: EffectParam, v: f32) {
        let v = normalize(v);
        match param {
            EffectParam::Pitch => self.pitch = v,
            EffectParam::Filter => self.filter = v,
            EffectParam::Reverb => self.reverb = v,
            EffectParam::Delay => self.delay = v,
            EffectParam::Distortion => self.distortion = v,
        }
    }

    pub fn is_enabled(&self, param: EffectParam) -> bool {
        match param {
            EffectParam::Pitch => self.enabled.pitch,
            EffectParam::Filter => self.enabled.filter,
            EffectParam::Reverb => self.enabled.reverb,
            EffectParam::Delay => self.enabled.delay,
            EffectParam::Distortion => self.enabled.distortion,
        }
    }

    pub fn toggle(&mut self, param: EffectParam) {
        let flag = match param {
            EffectParam::Pitch => &mut self.enabled.pitch,
            EffectParam::Filter => &mut self.enabled.filter,
            EffectParam::Reverb => &mut self.enabled.reverb,
            EffectParam::Delay => &mut self.enabled.delay,
            EffectParam::Distortion => &mut self.enabled.distortion,
        };
        *flag = !*flag;
    }

    // clamp anything that came from outside (files, knobs) into range
    pub fn sanitized(mut self) -> Self {
        self.pitch = normalize(self.pitch);
        self.filter = normalize(self.filter);
        self.reverb = normalize(self.reverb);
        self.delay = normalize(self.delay);
        self.distortion = normalize(self.distortion);
        self
    }
}

fn normalize(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

// (pad, kit) -> settings. Readers get a copy, so a trigger's snapshot never
// changes under it; last write wins.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsStore {
    kits: BTreeMap<KitId, BTreeMap<PadId, EffectSettings>>,
}

impl SettingsStore {
    pub fn get(&self, pad: PadId, kit: KitId) -> EffectSettings {
        self.kits
            .get(&kit)
            .and_then(|pads| pads.get(&pad))
            .copied()
            .unwrap_or_default()
    }

    pub fn set(&mut self, pad: PadId, kit: KitId, settings: EffectSettings) {
        self.kits.entry(kit).or_default().insert(pad, settings.sanitized());
    }

    pub fn update(&mut self, pad: PadId, kit: KitId, f: impl FnOnce(&mut EffectSettings)) -> EffectSettings {
        let mut s = self.get(pad, kit);
        f(&mut s);
        self.set(pad, kit, s);
        self.get(pad, kit)
    }

    pub fn sanitized(mut self) -> Self {
        for pads in self.kits.values_mut() {
            for s in pads.values_mut() {
                *s = s.sanitized();
            }
        }
        self
    }
}
