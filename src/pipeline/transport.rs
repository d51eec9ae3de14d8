// Record, replay and loop against the shared audio clock. Nothing here sleeps:
// everything is sent as an absolute-time PlayAt, and tick() moves progress,
// the LED, metronome clicks and the next loop pass along.

use std::sync::Arc;

use tracing::{debug, info};

use crate::audio::{AudioClock, SampleBuffer};
use crate::audio_api::{AudioCommand, ScheduleTag};
use crate::pipeline::kit::Renderer;
use crate::pipeline::metronome::Metronome;
use crate::pipeline::sequence::{ReplayHandle, Sequence, TriggerEvent};
use crate::shared::{LED_OFF, LED_SLOTS, TransportState, UiEvent};

// how often the control loop calls tick()
pub const UI_TICK: f64 = 0.1;

// anything starting within this window gets queued on the current tick; ticks
// arrive late (poll + draw), so it has to cover more than one tick period
const LOOKAHEAD: f64 = 2.0 * UI_TICK;

#[derive(Clone, Copy, Debug)]
struct Pass {
    start: f64,
    reported: usize,   // events already announced to the UI
    next_queued: bool, // the following loop pass is already with the engine
}

pub struct Transport {
    clock: Box<dyn AudioClock>,
    state: TransportState,
    sequence: Sequence,
    rendered: Vec<Arc<SampleBuffer>>, // what each recorded hit sounded like, replayed as is
    looping: bool,
    record_start: f64,
    pass: Option<Pass>,
    passes: u64,
    metronome: Metronome,
    commands: Vec<AudioCommand>,
    events: Vec<UiEvent>,
}

impl Transport {
    pub fn new(clock: Box<dyn AudioClock>, bpm: u32) -> Self {
        Self {
            clock,
            state: TransportState::Idle,
            sequence: Sequence::default(),
            rendered: Vec::new(),
            looping: false,
            record_start: 0.0,
            pass: None,
            passes: 0,
            metronome: Metronome::new(bpm),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    #[cfg(test)]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn metronome_enabled(&self) -> bool {
        self.metronome.is_enabled()
    }

    pub fn bpm(&self) -> u32 {
        self.metronome.bpm()
    }

    pub fn take_commands(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn take_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Live ──────────────────────────────────────────────────────

    // play a pad now; appended to the sequence while recording
    pub fn trigger(&mut self, renderer: &mut Renderer, handle: ReplayHandle) {
        let now = self.now();
        let buffer = renderer.render(&handle);
        self.commands.push(AudioCommand::PlayAt {
            at: now,
            buffer: buffer.clone(),
            tag: ScheduleTag::Live,
        });
        let label = handle.pad.label();
        self.events.push(UiEvent::Triggered { pad: handle.pad, label });

        if self.state == TransportState::Recording {
            self.sequence.push(TriggerEvent {
                pad: handle.pad,
                label,
                offset: now - self.record_start,
                handle,
            });
            self.rendered.push(buffer);
        }
    }

    // ── Recording ─────────────────────────────────────────────────

    pub fn toggle_record(&mut self) {
        if self.state == TransportState::Recording {
            self.stop_recording();
        } else {
            self.start_recording();
        }
    }

    pub fn start_recording(&mut self) {
        self.stop_playback();
        self.sequence.clear();
        self.rendered.clear();
        self.record_start = self.now();
        self.state = TransportState::Recording;
        info!(at = self.record_start, "recording started");
        self.status("RECORDING");
    }

    pub fn stop_recording(&mut self) {
        if self.state != TransportState::Recording {
            return;
        }
        self.state = TransportState::Idle;
        match self.sequence.finish() {
            Some(duration) => {
                info!(hits = self.sequence.len(), duration, "recording stopped");
                let msg = format!("RECORDED {} HITS ({:.1}s)", self.sequence.len(), duration);
                self.status(msg);
            }
            None => self.status("NOTHING RECORDED"),
        }
    }

    // ── Playback ──────────────────────────────────────────────────

    pub fn toggle_play(&mut self) {
        match self.state {
            TransportState::Recording => {
                self.stop_recording();
                self.start_playback();
            }
            TransportState::Playing => self.stop_playback(),
            TransportState::Idle => self.start_playback(),
        }
    }

    pub fn start_playback(&mut self) {
        self.stop_recording();
        if self.sequence.is_empty() {
            self.status("NO SEQUENCE RECORDED");
            return;
        }
        self.stop_playback();

        let start = self.now();
        self.schedule_pass(start);
        self.pass = Some(Pass {
            start,
            reported: 0,
            next_queued: false,
        });
        self.passes = 1;
        self.state = TransportState::Playing;
        info!(start, duration = self.sequence.duration(), "playback started");
        self.status("PLAYING");
    }

    // cancel whatever replay hasn't started yet; fine in any state
    pub fn stop_playback(&mut self) {
        self.commands.push(AudioCommand::CancelPending { tag: ScheduleTag::Replay });
        self.pass = None;
        self.led(LED_OFF);
        if self.state == TransportState::Playing {
            self.state = TransportState::Idle;
            info!(passes = self.passes, "playback stopped");
            self.status("STOPPED");
        }
    }

    pub fn toggle_loop(&mut self) {
        self.looping = !self.looping;
        self.status(if self.looping { "LOOP ON" } else { "LOOP OFF" });
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn schedule_pass(&mut self, start: f64) {
        debug!(start, events = self.rendered.len(), "scheduling pass");
        for (event, buffer) in self.sequence.events().iter().zip(&self.rendered) {
            self.commands.push(AudioCommand::PlayAt {
                at: start + event.offset,
                buffer: buffer.clone(),
                tag: ScheduleTag::Replay,
            });
        }
    }

    // ── Metronome ─────────────────────────────────────────────────

    pub fn toggle_metronome(&mut self, renderer: &Renderer) {
        if self.metronome.is_enabled() {
            self.metronome.stop();
            self.commands.push(AudioCommand::CancelPending { tag: ScheduleTag::Metronome });
            if self.state != TransportState::Playing {
                self.led(LED_OFF);
            }
        } else {
            let now = self.now();
            self.metronome.start(now);
            self.schedule_clicks(renderer, now);
        }
    }

    pub fn set_bpm(&mut self, bpm: u32) {
        self.metronome.set_bpm(bpm);
    }

    fn schedule_clicks(&mut self, renderer: &Renderer, now: f64) {
        for tick in self.metronome.schedule_until(now + LOOKAHEAD) {
            self.commands.push(AudioCommand::PlayAt {
                at: tick.at,
                buffer: renderer.click(tick.accent),
                tag: ScheduleTag::Metronome,
            });
        }
    }

    // ── UI tick ───────────────────────────────────────────────────

    pub fn tick(&mut self, renderer: &Renderer) {
        let now = self.now();

        if self.state == TransportState::Recording {
            self.status(format!("REC: {:.1}s", now - self.record_start));
        }
        if self.state == TransportState::Playing {
            self.advance_pass(now);
        }

        self.schedule_clicks(renderer, now);
        if let Some(led) = self.metronome.passed(now) {
            // playback position owns the LED while playing
            if self.state != TransportState::Playing {
                self.led(led);
            }
        }
    }

    fn advance_pass(&mut self, now: f64) {
        let duration = self.sequence.duration();
        while let Some(mut pass) = self.pass {
            let events = self.sequence.events();
            while pass.reported < events.len() && pass.start + events[pass.reported].offset <= now {
                let e = &events[pass.reported];
                self.events.push(UiEvent::Triggered { pad: e.pad, label: e.label });
                pass.reported += 1;
            }

            let end = pass.start + duration;
            if self.looping && !pass.next_queued && now < end && now + LOOKAHEAD >= end {
                // seamless: the next pass starts on the exact frame this one ends
                self.schedule_pass(end);
                pass.next_queued = true;
            }

            if now < end {
                let elapsed = now - pass.start;
                let fraction = (elapsed / duration).clamp(0.0, 1.0);
                self.events.push(UiEvent::Progress {
                    remaining: (duration - elapsed).max(0.0),
                    fraction,
                });
                self.led(((fraction * LED_SLOTS as f64).floor() as i8) % LED_SLOTS);
                self.pass = Some(pass);
                return;
            }

            if pass.next_queued {
                self.passes += 1;
                debug!(pass = self.passes, start = end, "loop restart");
                self.pass = Some(Pass {
                    start: end,
                    reported: 0,
                    next_queued: false,
                });
            } else if self.looping {
                // loop switched on too late to line up; restart from here
                self.schedule_pass(now);
                self.passes += 1;
                self.pass = Some(Pass {
                    start: now,
                    reported: 0,
                    next_queued: false,
                });
            } else {
                self.pass = None;
                self.state = TransportState::Idle;
                self.led(LED_OFF);
                info!(passes = self.passes, "playback finished");
                self.status("STOPPED");
            }
        }
    }

    fn led(&mut self, led: i8) {
        self.events.push(UiEvent::Led(led));
    }

    fn status(&mut self, msg: impl Into<String>) {
        self.events.push(UiEvent::Status(msg.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::clock::ManualClock;
    use crate::pipeline::effects::EffectSettings;
    use crate::shared::{KitId, PadId};

    const SR: u32 = 8000;

    fn setup() -> (Transport, ManualClock, Renderer) {
        let clock = ManualClock::new(SR);
        let transport = Transport::new(Box::new(clock.clone()), 120);
        (transport, clock, Renderer::new(SR, Some(7)))
    }

    fn handle(pad: PadId) -> ReplayHandle {
        ReplayHandle {
            pad,
            kit: KitId::Acoustic,
            settings: EffectSettings::default(),
        }
    }

    // (start time, tag) of every PlayAt, in send order
    fn plays(t: &mut Transport) -> Vec<(f64, ScheduleTag)> {
        t.take_commands()
            .into_iter()
            .filter_map(|c| match c {
                AudioCommand::PlayAt { at, tag, .. } => Some((at, tag)),
                AudioCommand::CancelPending { .. } => None,
            })
            .collect()
    }

    fn replays(t: &mut Transport) -> Vec<f64> {
        plays(t)
            .into_iter()
            .filter(|(_, tag)| *tag == ScheduleTag::Replay)
            .map(|(at, _)| at)
            .collect()
    }

    fn statuses(t: &mut Transport) -> Vec<String> {
        t.take_events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // kick at 0.0, snare at 0.5, stop at 1.0
    fn record_kick_snare(t: &mut Transport, clock: &ManualClock, r: &mut Renderer) {
        clock.set(10.0);
        t.start_recording();
        t.trigger(r, handle(PadId::Kick));
        clock.advance(0.5);
        t.trigger(r, handle(PadId::Snare));
        clock.advance(0.5);
        t.stop_recording();
    }

    #[test]
    fn live_trigger_plays_now_and_reports_the_pad() {
        let (mut t, clock, mut r) = setup();
        clock.set(3.25);
        t.trigger(&mut r, handle(PadId::Tom1));
        assert_eq!(plays(&mut t), vec![(3.25, ScheduleTag::Live)]);
        assert_eq!(
            t.take_events(),
            vec![UiEvent::Triggered { pad: PadId::Tom1, label: "TOM 1" }]
        );
        assert!(t.sequence().is_empty());
    }

    #[test]
    fn recording_captures_offsets_and_duration() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        let seq = t.sequence();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.events()[0].pad, PadId::Kick);
        assert!(close(seq.events()[0].offset, 0.0));
        assert!(close(seq.events()[1].offset, 0.5));
        assert!(close(seq.duration(), 1.5));
        assert_eq!(t.state(), TransportState::Idle);
        assert_eq!(statuses(&mut t).last().unwrap(), "RECORDED 2 HITS (1.5s)");
    }

    #[test]
    fn playback_schedules_at_absolute_offsets() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        t.take_commands();
        clock.set(20.0);
        t.start_playback();
        let at = replays(&mut t);
        assert_eq!(at.len(), 2);
        assert!(close(at[0], 20.0));
        assert!(close(at[1], 20.5));
        assert_eq!(t.state(), TransportState::Playing);
    }

    #[test]
    fn replay_preserves_order_and_spacing() {
        let (mut t, clock, mut r) = setup();
        t.start_recording();
        let pads = [PadId::HiHat, PadId::Clap, PadId::HiHat, PadId::Crash];
        let gaps = [0.0, 0.125, 0.3, 0.05];
        for (pad, gap) in pads.iter().zip(gaps) {
            clock.advance(gap);
            t.trigger(&mut r, handle(*pad));
        }
        t.stop_recording();
        t.take_commands();
        clock.advance(2.0);
        t.start_playback();
        let at = replays(&mut t);
        let offsets: Vec<f64> = t.sequence().events().iter().map(|e| e.offset).collect();
        for i in 1..at.len() {
            assert!(close(at[i] - at[i - 1], offsets[i] - offsets[i - 1]));
        }
        let order: Vec<PadId> = t.sequence().events().iter().map(|e| e.pad).collect();
        assert_eq!(order, pads);
    }

    #[test]
    fn empty_sequence_does_not_play() {
        let (mut t, _clock, _r) = setup();
        t.start_playback();
        assert_eq!(t.state(), TransportState::Idle);
        assert!(replays(&mut t).is_empty());
        assert_eq!(statuses(&mut t), vec!["NO SEQUENCE RECORDED"]);
    }

    #[test]
    fn recording_nothing_says_so() {
        let (mut t, _clock, _r) = setup();
        t.toggle_record();
        t.toggle_record();
        assert_eq!(statuses(&mut t), vec!["RECORDING", "NOTHING RECORDED"]);
        assert!(t.sequence().is_empty());
    }

    #[test]
    fn stop_twice_is_idle_both_times() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        t.start_playback();
        t.stop_playback();
        assert_eq!(t.state(), TransportState::Idle);
        t.stop_playback();
        assert_eq!(t.state(), TransportState::Idle);
        let cancels = t
            .take_commands()
            .iter()
            .filter(|c| matches!(c, AudioCommand::CancelPending { tag: ScheduleTag::Replay }))
            .count();
        assert!(cancels >= 2);
    }

    #[test]
    fn non_looping_pass_ends_idle_with_led_off() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        clock.set(20.0);
        t.start_playback();
        t.take_events();
        for _ in 0..20 {
            clock.advance(UI_TICK);
            t.tick(&r);
        }
        assert_eq!(t.state(), TransportState::Idle);
        let events = t.take_events();
        assert!(events.contains(&UiEvent::Led(LED_OFF)));
        assert!(events.contains(&UiEvent::Status("STOPPED".into())));
    }

    #[test]
    fn tick_reports_progress_led_and_passed_events() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        clock.set(20.0);
        t.start_playback();
        t.take_events();

        clock.set(20.75); // half way through 1.5s
        t.tick(&r);
        let events = t.take_events();
        assert_eq!(
            &events[..2],
            &[
                UiEvent::Triggered { pad: PadId::Kick, label: "KICK" },
                UiEvent::Triggered { pad: PadId::Snare, label: "SNARE" },
            ]
        );
        let Some(UiEvent::Progress { remaining, fraction }) = events.get(2).cloned() else {
            panic!("expected progress, got {events:?}");
        };
        assert!(close(remaining, 0.75));
        assert!(close(fraction, 0.5));
        assert_eq!(events[3], UiEvent::Led(4));

        // nothing is announced twice
        clock.set(20.85);
        t.tick(&r);
        assert!(!t.take_events().iter().any(|e| matches!(e, UiEvent::Triggered { .. })));
    }

    #[test]
    fn loop_restarts_are_seamless_and_identical() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        t.toggle_loop();
        clock.set(20.0);
        t.start_playback();

        let mut at = replays(&mut t);
        // run long enough for 3 restarts: passes start at 20, 21.5, 23, 24.5
        for _ in 0..46 {
            clock.advance(UI_TICK);
            t.tick(&r);
            at.extend(replays(&mut t));
        }
        assert_eq!(t.state(), TransportState::Playing);

        let passes: Vec<&[f64]> = at.chunks(2).collect();
        assert_eq!(passes.len(), 4);
        for (n, pass) in passes.iter().enumerate() {
            let start = 20.0 + 1.5 * n as f64;
            assert!(close(pass[0], start), "pass {n} starts at {}", pass[0]);
            assert!(close(pass[1] - pass[0], 0.5));
        }
    }

    #[test]
    fn next_pass_is_queued_ahead_of_the_end() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        t.toggle_loop();
        clock.set(20.0);
        t.start_playback();
        replays(&mut t);

        clock.set(21.2);
        t.tick(&r);
        assert!(replays(&mut t).is_empty());
        clock.set(21.31);
        t.tick(&r);
        let next = replays(&mut t);
        assert_eq!(next.len(), 2);
        assert!(close(next[0], 21.5));
    }

    #[test]
    fn stop_drops_a_queued_loop_pass() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        t.toggle_loop();
        clock.set(20.0);
        t.start_playback();
        clock.set(21.45);
        t.tick(&r);
        t.take_commands();
        t.stop_playback();
        assert!(matches!(
            t.take_commands()[..],
            [AudioCommand::CancelPending { tag: ScheduleTag::Replay }]
        ));
        clock.set(22.0);
        t.tick(&r);
        assert!(replays(&mut t).is_empty());
        assert_eq!(t.state(), TransportState::Idle);
    }

    #[test]
    fn play_while_recording_stops_the_recording_first() {
        let (mut t, clock, mut r) = setup();
        t.start_recording();
        t.trigger(&mut r, handle(PadId::Kick));
        clock.advance(0.2);
        t.toggle_play();
        assert_eq!(t.state(), TransportState::Playing);
        assert_eq!(t.sequence().len(), 1);
        assert!(close(t.sequence().duration(), 1.0));
    }

    #[test]
    fn recording_stops_playback_and_replaces_the_sequence() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        t.start_playback();
        t.start_recording();
        assert_eq!(t.state(), TransportState::Recording);
        assert!(t.sequence().is_empty());
        t.trigger(&mut r, handle(PadId::Ride));
        t.stop_recording();
        assert_eq!(t.sequence().len(), 1);
        assert_eq!(t.sequence().events()[0].pad, PadId::Ride);
    }

    #[test]
    fn recording_timer_reads_elapsed_time() {
        let (mut t, clock, r) = setup();
        clock.set(5.0);
        t.start_recording();
        t.take_events();
        clock.advance(1.26);
        t.tick(&r);
        assert_eq!(statuses(&mut t), vec!["REC: 1.3s"]);
    }

    #[test]
    fn metronome_clicks_on_the_beat_with_accents() {
        let (mut t, clock, r) = setup();
        clock.set(1.0);
        t.toggle_metronome(&r);
        let mut clicks = t.take_commands();
        for _ in 0..20 {
            clock.advance(UI_TICK);
            t.tick(&r);
            clicks.extend(t.take_commands());
        }
        // 1.0 .. 3.0, the last one queued a tick ahead
        let accent = r.click(true);
        let ticks: Vec<(f64, bool)> = clicks
            .iter()
            .map(|c| match c {
                AudioCommand::PlayAt { at, buffer, tag } => {
                    assert_eq!(*tag, ScheduleTag::Metronome);
                    (*at, Arc::ptr_eq(buffer, &accent))
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(ticks.len(), 5);
        for (i, (at, accented)) in ticks.iter().enumerate() {
            assert!(close(*at, 1.0 + 0.5 * i as f64));
            assert_eq!(*accented, i % 4 == 0, "tick {i}");
        }
    }

    #[test]
    fn metronome_led_counts_beats_and_resets_when_disabled() {
        let (mut t, clock, r) = setup();
        t.toggle_metronome(&r);
        t.tick(&r);
        assert!(t.take_events().contains(&UiEvent::Led(0)));
        clock.set(0.55);
        t.tick(&r);
        assert!(t.take_events().contains(&UiEvent::Led(1)));
        t.toggle_metronome(&r);
        assert_eq!(t.take_events(), vec![UiEvent::Led(LED_OFF)]);
        assert!(matches!(
            t.take_commands().last(),
            Some(AudioCommand::CancelPending { tag: ScheduleTag::Metronome })
        ));
    }

    #[test]
    fn stopping_playback_keeps_metronome_clicks() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        t.toggle_metronome(&r);
        t.start_playback();
        t.stop_playback();
        assert!(!t
            .take_commands()
            .iter()
            .any(|c| matches!(c, AudioCommand::CancelPending { tag: ScheduleTag::Metronome })));
        assert!(t.metronome_enabled());
    }

    #[test]
    fn late_ticks_never_schedule_in_the_past() {
        let (mut t, clock, mut r) = setup();
        t.start_recording();
        t.trigger(&mut r, handle(PadId::Kick));
        clock.advance(0.5);
        t.trigger(&mut r, handle(PadId::Kick));
        t.stop_recording();
        t.toggle_loop();
        t.toggle_metronome(&r);
        t.start_playback(); // at 0.5, passes of 1.5s
        t.take_commands();

        // real ticks come in a little late and uneven
        let steps = [0.108, 0.116];
        let mut replayed = Vec::new();
        for i in 0..120 {
            clock.advance(steps[i % 2]);
            let now = clock.now();
            t.tick(&r);
            for (at, tag) in plays(&mut t) {
                assert!(at >= now - 1e-9, "{tag:?} at {at} sent at {now}");
                if tag == ScheduleTag::Replay {
                    replayed.push(at);
                }
            }
        }

        // every following pass starts exactly where the previous one ended
        let passes: Vec<&[f64]> = replayed.chunks(2).collect();
        assert!(passes.len() >= 8, "{} passes", passes.len());
        for (n, pass) in passes.iter().enumerate() {
            assert!(close(pass[0], 2.0 + 1.5 * n as f64), "pass {n} starts at {}", pass[0]);
            assert!(close(pass[1] - pass[0], 0.5));
        }
    }

    #[test]
    fn late_loop_toggle_restarts_from_now() {
        let (mut t, clock, mut r) = setup();
        record_kick_snare(&mut t, &clock, &mut r);
        clock.set(20.0);
        t.start_playback();
        replays(&mut t);

        clock.set(21.2);
        t.tick(&r);
        t.toggle_loop(); // too late to line up with 21.5
        clock.set(21.56);
        t.tick(&r);
        let next = replays(&mut t);
        assert_eq!(next.len(), 2);
        assert!(close(next[0], 21.56));
        assert!(close(next[1], 22.06));
        assert_eq!(t.state(), TransportState::Playing);
    }

    #[test]
    fn replay_uses_the_buffers_heard_while_recording() {
        let (mut t, clock, mut r) = setup();
        t.start_recording();
        t.trigger(&mut r, handle(PadId::Snare));
        let live = match t.take_commands().pop() {
            Some(AudioCommand::PlayAt { buffer, .. }) => buffer,
            other => panic!("unexpected {other:?}"),
        };
        t.stop_recording();

        // a sample dropped on the pad afterwards doesn't change the take
        r.registry.set_custom(PadId::Snare, SampleBuffer::from_mono(&[0.5; 16], SR));
        clock.advance(1.0);
        t.start_playback();
        let replayed: Vec<Arc<SampleBuffer>> = t
            .take_commands()
            .into_iter()
            .filter_map(|c| match c {
                AudioCommand::PlayAt { buffer, tag: ScheduleTag::Replay, .. } => Some(buffer),
                _ => None,
            })
            .collect();
        assert_eq!(replayed.len(), 1);
        assert!(Arc::ptr_eq(&replayed[0], &live));
    }
}
