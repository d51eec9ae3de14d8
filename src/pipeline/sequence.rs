// A recorded performance: pad hits with their offset from the moment
// recording started. Each hit keeps everything needed to render it again.

use crate::pipeline::effects::EffectSettings;
use crate::shared::{KitId, PadId};

// trailing room after the last hit
pub const SEQUENCE_TAIL: f64 = 1.0;

// what to play on replay: the voice, its kit, and the effect knobs as they
// were when the pad was hit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayHandle {
    pub pad: PadId,
    pub kit: KitId,
    pub settings: EffectSettings,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TriggerEvent {
    pub pad: PadId,
    pub label: &'static str,
    pub offset: f64, // seconds from recording start
    pub handle: ReplayHandle,
}

#[derive(Clone, Debug, Default)]
pub struct Sequence {
    events: Vec<TriggerEvent>,
    duration: f64,
}

impl Sequence {
    pub fn clear(&mut self) {
        self.events.clear();
        self.duration = 0.0;
    }

    // offsets never go backwards, even if the clock jitters
    pub fn push(&mut self, mut event: TriggerEvent) {
        let floor = self.events.last().map_or(0.0, |e| e.offset);
        event.offset = event.offset.max(floor);
        self.events.push(event);
    }

    // close the recording; returns the duration, or None when nothing was hit
    pub fn finish(&mut self) -> Option<f64> {
        let last = self.events.last()?.offset;
        self.duration = last + SEQUENCE_TAIL;
        Some(self.duration)
    }

    pub fn events(&self) -> &[TriggerEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}
