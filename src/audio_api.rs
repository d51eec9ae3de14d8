use std::sync::Arc;

pub use crate::audio::SampleBuffer;

// who asked for a sound; stop only ever cancels the scheduled kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleTag {
    Live,
    Replay,
    Metronome,
}

impl ScheduleTag {
    pub fn cancellable(self) -> bool {
        !matches!(self, ScheduleTag::Live)
    }
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't render effects or decode anything (that would stall the
    // callback), so the control thread hands over a finished buffer and the
    // absolute clock time (seconds) it should start at. Times already in the
    // past start at the top of the next block.
    PlayAt {
        at: f64,
        buffer: Arc<SampleBuffer>,
        tag: ScheduleTag,
    },

    // drop every not-yet-started request carrying `tag`; voices already playing
    // finish on their own and live triggers are never cancelled
    CancelPending { tag: ScheduleTag },
}
