// Glue between the front end and the core: input events come in, audio
// commands go out, and a display snapshot is kept up to date for drawing.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::audio::{AudioClock, MasterGain};
use crate::audio_api::AudioCommand;
use crate::error::DrumResult;
use crate::loader::{SampleStore, import_candidate, read_import};
use crate::pipeline::kit::Renderer;
use crate::pipeline::kit_file::{self, CUSTOM_SAMPLE_WARNING, KitFile};
use crate::pipeline::persistence;
use crate::pipeline::project::ProjectState;
use crate::pipeline::sequence::ReplayHandle;
use crate::pipeline::transport::Transport;
use crate::shared::{DisplayState, InputEvent, KitId, PadId, TransportState, UiEvent, clamp_bpm};

const PROGRESS_BLOCKS: usize = 10;

pub struct Middle {
    pub state: ProjectState,
    transport: Transport,
    renderer: Renderer,
    gain: Arc<MasterGain>,
    store: Box<dyn SampleStore>,
    project_dir: PathBuf,
    kit_file: PathBuf,
    display: DisplayState,
}

impl Middle {
    pub fn new(
        state: ProjectState,
        clock: Box<dyn AudioClock>,
        renderer: Renderer,
        gain: Arc<MasterGain>,
        store: Box<dyn SampleStore>,
        project_dir: PathBuf,
        kit_file: PathBuf,
    ) -> Self {
        let state = state.sanitized();
        let mut transport = Transport::new(clock, state.tempo);
        transport.set_looping(state.looping);
        gain.set_volume(state.volume);
        gain.set_muted(state.muted);
        let mut middle = Self {
            state,
            transport,
            renderer,
            gain,
            store,
            project_dir,
            kit_file,
            display: DisplayState::default(),
        };
        middle.refresh_display();
        middle
    }

    // decode every stored user sample; a bad one only costs that pad its sample
    pub fn load_custom_samples(&mut self) {
        for pad in PadId::ALL {
            let bytes = match self.store.get(pad) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => {
                    warn!(pad = pad.as_str(), "could not read stored sample: {e}");
                    continue;
                }
            };
            match self.renderer.registry.decode_custom(pad, &bytes) {
                Ok(()) => info!(pad = pad.as_str(), "restored custom sample"),
                Err(e) => warn!("{e}; using the synthesized voice"),
            }
        }
        self.refresh_display();
    }

    pub fn set_audio_unavailable(&mut self, reason: &str) {
        self.display.audio_ok = false;
        self.display.message = format!("NO AUDIO: {reason}");
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<AudioCommand> {
        match event {
            InputEvent::TriggerPad(pad) => {
                let handle = ReplayHandle {
                    pad,
                    kit: self.state.kit,
                    settings: self.state.effects.get(pad, self.state.kit),
                };
                self.transport.trigger(&mut self.renderer, handle);
            }
            InputEvent::SelectPad(pad) => {
                self.display.selected_pad = Some(pad);
                self.message(format!("EDIT: {}", pad.as_str().to_uppercase()));
            }
            InputEvent::SelectKit(kit) => {
                self.state.kit = kit;
                self.message(format!("KIT: {}", kit.as_str().to_uppercase()));
            }

            InputEvent::TogglePlay => self.transport.toggle_play(),
            InputEvent::ToggleRecord => self.transport.toggle_record(),
            InputEvent::Stop => {
                if self.transport.state() == TransportState::Recording {
                    self.transport.stop_recording();
                } else {
                    self.transport.stop_playback();
                }
            }
            InputEvent::ToggleLoop => {
                self.transport.toggle_loop();
                self.state.looping = self.transport.is_looping();
            }
            InputEvent::ToggleMute => {
                self.state.muted = !self.state.muted;
                self.gain.set_muted(self.state.muted);
                self.message(if self.state.muted { "MUTED" } else { "UNMUTED" });
            }
            InputEvent::ToggleMetronome => {
                self.transport.toggle_metronome(&self.renderer);
                let on = self.transport.metronome_enabled();
                self.message(if on { "METRONOME ON" } else { "METRONOME OFF" });
            }
            InputEvent::AdjustTempo(delta) => {
                self.set_tempo(self.state.tempo as i64 + delta as i64);
                self.message(format!("TEMPO: {} BPM", self.state.tempo));
            }
            InputEvent::AdjustVolume(delta) => {
                self.gain.set_volume(self.state.volume + delta);
                self.state.volume = self.gain.volume();
                self.message(format!("VOLUME: {:.0}%", self.state.volume * 100.0));
            }

            InputEvent::NextParam => {
                self.display.param = self.display.param.next();
                self.message(format!("PARAM: {}", self.display.param.label()));
            }
            InputEvent::AdjustParam(delta) => self.adjust_param(delta),
            InputEvent::ToggleParam => self.toggle_param(),

            InputEvent::SaveKit => self.save_kit(),
            InputEvent::LoadKit => self.load_kit(),
            InputEvent::ImportSample => self.import_sample(),
            InputEvent::RemoveSample => self.remove_sample(),

            InputEvent::Quit => {} // main saves and exits
        }
        self.drain_transport();
        self.refresh_display();
        self.transport.take_commands()
    }

    // called every UI tick (100ms)
    pub fn tick(&mut self) -> Vec<AudioCommand> {
        self.display.active_pad = None; // flashes last until the next tick
        self.transport.tick(&self.renderer);
        self.drain_transport();
        self.refresh_display();
        self.transport.take_commands()
    }

    pub fn display_state(&self) -> &DisplayState {
        &self.display
    }

    pub fn save(&self) -> DrumResult<()> {
        persistence::save_project(&self.project_dir, &self.state)
    }

    // ── Effects ───────────────────────────────────────────────────

    fn selected_pad(&mut self) -> Option<PadId> {
        if self.display.selected_pad.is_none() {
            self.message("SELECT A PAD FIRST (SHIFT + PAD KEY)");
        }
        self.display.selected_pad
    }

    fn adjust_param(&mut self, delta: f32) {
        let Some(pad) = self.selected_pad() else { return };
        let param = self.display.param;
        let s = self.state.effects.update(pad, self.state.kit, |s| {
            s.set_value(param, s.value(param) + delta);
        });
        self.message(format!("{} {}: {:.2}", pad.label(), param.label(), s.value(param)));
    }

    fn toggle_param(&mut self) {
        let Some(pad) = self.selected_pad() else { return };
        let param = self.display.param;
        let s = self.state.effects.update(pad, self.state.kit, |s| s.toggle(param));
        let on = if s.is_enabled(param) { "ON" } else { "OFF" };
        self.message(format!("{} {} {on}", pad.label(), param.label()));
    }

    fn set_tempo(&mut self, bpm: i64) {
        self.state.tempo = clamp_bpm(bpm);
        self.transport.set_bpm(self.state.tempo);
    }

    // ── Kit files ─────────────────────────────────────────────────

    fn kit_file_name(&self) -> String {
        self.kit_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.kit_file.display().to_string())
    }

    fn save_kit(&mut self) {
        let custom = self.renderer.registry.custom_flags();
        let file = KitFile::capture(self.state.kit, self.state.tempo, &self.state.effects, custom);
        match kit_file::save(&self.kit_file, &file) {
            Ok(()) => {
                info!(path = %self.kit_file.display(), kit = self.state.kit.as_str(), "kit saved");
                let mut msg = format!("KIT SAVED: {}", self.kit_file_name());
                if file.has_custom_samples {
                    msg = format!("{msg} - NOTE: {CUSTOM_SAMPLE_WARNING}");
                }
                self.message(msg);
            }
            Err(e) => {
                warn!("kit save failed: {e}");
                self.message("ERROR SAVING KIT");
            }
        }
    }

    fn load_kit(&mut self) {
        // parse fully before touching anything so a bad file changes nothing
        let file = match kit_file::load(&self.kit_file) {
            Ok(file) => file,
            Err(e) => {
                warn!("kit load failed: {e}");
                self.message("ERROR LOADING KIT");
                return;
            }
        };
        let custom = self.renderer.registry.custom_flags();
        let load = file.apply(&mut self.state.effects, self.state.kit, custom);
        self.state.kit = load.kit;
        if let Some(bpm) = load.tempo {
            self.set_tempo(bpm as i64);
        }
        info!(kit = load.kit.as_str(), pads = load.pads, "kit loaded");
        if load.missing_samples.is_empty() {
            self.message(format!("KIT LOADED: {}", self.kit_file_name()));
        } else {
            self.message(CUSTOM_SAMPLE_WARNING);
        }
    }

    // ── Samples ───────────────────────────────────────────────────

    fn import_sample(&mut self) {
        let Some(pad) = self.selected_pad() else { return };
        let Some(path) = import_candidate(&self.project_dir, pad) else {
            self.message(format!("NO FILE: {}.wav", pad.as_str()));
            return;
        };
        let bytes = match read_import(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{e}");
                self.message(format!("CANNOT READ {}", path.display()));
                return;
            }
        };
        if let Err(e) = self.renderer.registry.decode_custom(pad, &bytes) {
            warn!("{e}");
            self.message(format!("INVALID SAMPLE: {}", pad.label()));
            return;
        }
        if let Err(e) = self.store.put(pad, &bytes) {
            // still plays this session, just won't come back next time
            warn!("could not store sample: {e}");
        }
        info!(pad = pad.as_str(), path = %path.display(), "custom sample imported");
        self.message(format!("SAMPLE LOADED: {}", pad.label()));
    }

    fn remove_sample(&mut self) {
        let Some(pad) = self.selected_pad() else { return };
        if !self.renderer.registry.clear_custom(pad) {
            self.message(format!("NO CUSTOM SAMPLE: {}", pad.label()));
            return;
        }
        if let Err(e) = self.store.delete(pad) {
            warn!("could not delete stored sample: {e}");
        }
        self.message(format!("SAMPLE REMOVED: {}", pad.label()));
    }

    // ── Display ───────────────────────────────────────────────────

    fn message(&mut self, msg: impl Into<String>) {
        self.display.message = msg.into();
    }

    fn drain_transport(&mut self) {
        for event in self.transport.take_events() {
            match event {
                UiEvent::Triggered { pad, label } => {
                    self.display.active_pad = Some(pad);
                    self.message(label);
                }
                UiEvent::Led(led) => self.display.led = led,
                UiEvent::Progress { remaining, fraction } => {
                    self.message(format!("{} {remaining:.1}s", progress_bar(fraction)));
                }
                UiEvent::Status(msg) => self.message(msg),
            }
        }
    }

    fn refresh_display(&mut self) {
        let d = &mut self.display;
        d.transport = self.transport.state();
        d.looping = self.transport.is_looping();
        d.metronome = self.transport.metronome_enabled();
        d.bpm = self.transport.bpm();
        d.volume = self.state.volume;
        d.muted = self.state.muted;
        d.kit = self.state.kit;
        d.custom = self.renderer.registry.custom_flags();
        let settings = match d.selected_pad {
            Some(pad) => self.state.effects.get(pad, self.state.kit),
            None => Default::default(),
        };
        d.param_value = settings.value(d.param);
        d.param_enabled = settings.is_enabled(d.param);
    }
}

fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * PROGRESS_BLOCKS as f64).floor() as usize;
    let filled = filled.min(PROGRESS_BLOCKS);
    format!("{}{}", "▮".repeat(filled), "▯".repeat(PROGRESS_BLOCKS - filled))
}

// kit keys on the front end map straight to kit ids
pub fn kit_for_key(n: u8) -> Option<KitId> {
    KitId::ALL.get(n.checked_sub(1)? as usize).copied()
}
