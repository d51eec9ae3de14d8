// Which buffer a pad plays, and the rendering step that turns a replay handle
// into something the engine can start.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::audio::effect::apply_chain;
use crate::audio::effect::EffectSpec;
use crate::audio::synth::{create_rng, metronome_click, synthesize, NoiseRng};
use crate::audio::SampleBuffer;
use crate::error::{DrumError, DrumResult};
use crate::pipeline::sequence::ReplayHandle;
use crate::shared::{KitId, NUM_PADS, PadId};

// (pad, kit) -> buffer. Built-in voices are synthesized on first use and kept
// for the session; a user sample on a pad overrides every kit until removed.
pub struct KitRegistry {
    sample_rate: u32,
    synthesized: HashMap<(PadId, KitId), Arc<SampleBuffer>>,
    custom: [Option<Arc<SampleBuffer>>; NUM_PADS],
}

impl KitRegistry {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            synthesized: HashMap::new(),
            custom: Default::default(),
        }
    }

    pub fn resolve(&mut self, pad: PadId, kit: KitId, rng: &mut NoiseRng) -> Arc<SampleBuffer> {
        if let Some(buf) = &self.custom[pad.index()] {
            return buf.clone();
        }
        let sample_rate = self.sample_rate;
        self.synthesized
            .entry((pad, kit))
            .or_insert_with(|| {
                debug!(pad = pad.as_str(), kit = kit.as_str(), "synthesizing voice");
                Arc::new(synthesize(pad, kit, sample_rate, rng))
            })
            .clone()
    }

    // decode user WAV bytes at the engine rate; the pad is untouched on failure
    pub fn decode_custom(&mut self, pad: PadId, bytes: &[u8]) -> DrumResult<()> {
        let buffer = SampleBuffer::decode_wav(bytes, self.sample_rate)
            .map_err(|source| DrumError::Decode { pad, source })?;
        if buffer.is_empty() {
            warn!(pad = pad.as_str(), "custom sample has no audio; pad will be silent");
        }
        debug!(pad = pad.as_str(), frames = buffer.len(), "decoded custom sample");
        self.set_custom(pad, buffer);
        Ok(())
    }

    pub fn set_custom(&mut self, pad: PadId, buffer: SampleBuffer) {
        self.custom[pad.index()] = Some(Arc::new(buffer));
    }

    // back to the synthesized voice; true if there was a custom sample
    pub fn clear_custom(&mut self, pad: PadId) -> bool {
        self.custom[pad.index()].take().is_some()
    }

    pub fn has_custom(&self, pad: PadId) -> bool {
        self.custom[pad.index()].is_some()
    }

    pub fn custom_flags(&self) -> [bool; NUM_PADS] {
        PadId::ALL.map(|pad| self.has_custom(pad))
    }
}

// Owns the registry and the noise source. Every trigger, live or replayed,
// goes through `render`.
pub struct Renderer {
    pub registry: KitRegistry,
    rng: NoiseRng,
    clicks: [Arc<SampleBuffer>; 2], // [plain, accent]
}

impl Renderer {
    pub fn new(sample_rate: u32, seed: Option<u64>) -> Self {
        Self {
            registry: KitRegistry::new(sample_rate),
            rng: create_rng(seed),
            clicks: [
                Arc::new(metronome_click(false, sample_rate)),
                Arc::new(metronome_click(true, sample_rate)),
            ],
        }
    }

    pub fn render(&mut self, handle: &ReplayHandle) -> Arc<SampleBuffer> {
        let source = self.registry.resolve(handle.pad, handle.kit, &mut self.rng);
        if EffectSpec::chain_for(&handle.settings).is_empty() {
            return source; // nothing to bake, share the cached buffer
        }
        Arc::new(apply_chain(&source, &handle.settings, &mut self.rng))
    }

    pub fn click(&self, accent: bool) -> Arc<SampleBuffer> {
        self.clicks[accent as usize].clone()
    }
}
