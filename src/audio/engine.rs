use std::sync::atomic::Ordering;
use std::sync::Arc;

use crossbeam_channel::Sender;

use super::clock::FrameCounter;
use super::frame::StereoFrame;
use super::master::MasterGain;
use super::sample_buffer::SampleBuffer;
use super::voice::Voice;
use crate::audio_api::{AudioCommand, ScheduleTag};

pub const MAX_VOICES: usize = 32; // hard cap so we wont malloc in audio callback
pub const MAX_PENDING: usize = 4096;

// a PlayAt that hasn't reached its start frame yet
#[derive(Debug)]
struct Pending {
    start_frame: u64,
    buffer: Arc<SampleBuffer>,
    tag: ScheduleTag,
}

pub struct Engine {
    sample_rate: u32,
    frames: FrameCounter,
    gain: Arc<MasterGain>,
    voices: Vec<Option<Voice>>, // fixed pool of voices, never resized
    pending: Vec<Pending>,      // capacity reserved up front
    retired: Sender<Arc<SampleBuffer>>,
}

impl Engine {
    pub fn new(
        sample_rate: u32,
        frames: FrameCounter,
        gain: Arc<MasterGain>,
        retired: Sender<Arc<SampleBuffer>>,
    ) -> Self {
        Self {
            sample_rate,
            frames,
            gain,
            voices: (0..MAX_VOICES).map(|_| None).collect(),
            pending: Vec::with_capacity(MAX_PENDING),
            retired,
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::PlayAt { at, buffer, tag } => {
                if self.pending.len() == MAX_PENDING {
                    self.retire(buffer); // full, drop rather than grow
                    return;
                }
                let start_frame = (at.max(0.0) * self.sample_rate as f64).round() as u64;
                self.pending.push(Pending {
                    start_frame,
                    buffer,
                    tag,
                });
            }
            AudioCommand::CancelPending { tag } => {
                if !tag.cancellable() {
                    return;
                }
                let mut i = 0;
                while i < self.pending.len() {
                    if self.pending[i].tag == tag {
                        let p = self.pending.swap_remove(i);
                        self.retire(p.buffer);
                    } else {
                        i += 1;
                    }
                }
            }
        }
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        let block_start = self.frames.load(Ordering::Relaxed);
        let block_end = block_start + out.len() as u64;

        // voices already playing cover the whole block
        for slot in self.voices.iter_mut() {
            if let Some(v) = slot {
                v.render_into(out);
                if v.is_finished() {
                    if let Some(done) = slot.take() {
                        let _ = self.retired.try_send(done.into_buffer());
                    }
                }
            }
        }

        // anything due in this block starts at its exact frame (late ones at 0)
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].start_frame >= block_end {
                i += 1;
                continue;
            }
            let p = self.pending.swap_remove(i);
            let offset = p.start_frame.saturating_sub(block_start) as usize;
            let mut voice = Voice::new(p.buffer);
            voice.render_into(&mut out[offset..]);
            if voice.is_finished() {
                self.retire(voice.into_buffer());
            } else if let Some(slot) = self.voices.iter_mut().find(|s| s.is_none()) {
                *slot = Some(voice);
            } else {
                self.retire(voice.into_buffer()); // pool exhausted
            }
        }

        let g = self.gain.gain();
        for frame in out.iter_mut() {
            *frame = frame.scaled(g);
        }

        self.frames.fetch_add(out.len() as u64, Ordering::Release);
    }

    fn retire(&self, buffer: Arc<SampleBuffer>) {
        // if the control thread fell behind the buffer just drops here
        let _ = self.retired.try_send(buffer);
    }
}
