use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info, warn};

use crate::audio_api::AudioCommand;
use crate::error::{DrumError, DrumResult};

pub mod clock;
pub mod effect;
mod engine;
mod frame;
mod master;
pub mod sample_buffer;
pub mod synth;
mod voice;

pub use clock::{AudioClock, FrameCounter, SampleClock, WallClock};
pub use frame::StereoFrame;
pub use master::MasterGain;
pub use sample_buffer::SampleBuffer;

use engine::Engine;

const COMMAND_QUEUE: usize = 4096;
const RETIRE_QUEUE: usize = 4096;
const SCRATCH_FRAMES: usize = 8192;

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    retired_rx: Receiver<Arc<SampleBuffer>>,
    clock: SampleClock,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn sender(&self) -> Sender<AudioCommand> {
        self.tx.clone()
    }

    pub fn clock(&self) -> SampleClock {
        self.clock.clone()
    }

    pub fn retired(&self) -> Receiver<Arc<SampleBuffer>> {
        self.retired_rx.clone()
    }
}

// Open the default output device and start rendering. The engine runs inside
// the cpal callback; everything it needs crosses over through channels and
// atomics.
pub fn start_audio(gain: Arc<MasterGain>) -> DrumResult<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(COMMAND_QUEUE);
    let (retired_tx, retired_rx) = crossbeam_channel::bounded::<Arc<SampleBuffer>>(RETIRE_QUEUE);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| DrumError::AudioInit("no default output device".into()))?;
    let config = device
        .default_output_config()
        .map_err(|e| DrumError::AudioInit(format!("no default output config: {e}")))?;

    let sample_rate: u32 = config.sample_rate().into();
    let channels = config.channels() as usize;
    let frames = FrameCounter::default();

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let engine = Engine::new(sample_rate, frames.clone(), gain, retired_tx);
            build_output_stream_f32(&device, &config.into(), rx, engine, channels)?
        }
        other => {
            return Err(DrumError::AudioInit(format!(
                "unsupported sample format {other:?} (only f32 supported for now)"
            )));
        }
    };
    stream
        .play()
        .map_err(|e| DrumError::AudioInit(format!("failed to play output stream: {e}")))?;

    info!(sample_rate, channels, "audio output started");

    Ok(AudioHandle {
        tx,
        retired_rx,
        clock: SampleClock::new(frames, sample_rate),
        _output_stream: stream,
    })
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    mut engine: Engine,
    channels: usize,
) -> DrumResult<cpal::Stream> {
    let mut scratch = vec![StereoFrame::zero(); SCRATCH_FRAMES];

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                while let Ok(cmd) = rx.try_recv() {
                    engine.handle_cmd(cmd);
                }

                let n_frames = data.len() / channels.max(1);
                if scratch.len() < n_frames {
                    scratch.resize(n_frames, StereoFrame::zero()); // only if the host grew its block size
                }
                let frames = &mut scratch[..n_frames];
                engine.render_block(frames);
                interleave(frames, data, channels);
            },
            |err| error!("audio output stream error: {err}"),
            None,
        )
        .map_err(|e| DrumError::AudioInit(format!("failed to build output stream: {e}")))?;

    Ok(stream)
}

// stereo frames -> device layout; mono devices get the average, extra channels silence
fn interleave(frames: &[StereoFrame], data: &mut [f32], channels: usize) {
    if channels == 0 {
        return;
    }
    for (frame, out) in frames.iter().zip(data.chunks_exact_mut(channels)) {
        match out {
            [mono] => *mono = 0.5 * (frame.left + frame.right),
            [l, r, rest @ ..] => {
                *l = frame.left;
                *r = frame.right;
                rest.fill(0.0);
            }
            [] => {}
        }
    }
}

// log-and-continue wrapper for the control thread
pub fn send(tx: &Sender<AudioCommand>, cmd: AudioCommand) {
    if let Err(e) = tx.try_send(cmd) {
        warn!("audio command dropped: {e}");
    }
}
