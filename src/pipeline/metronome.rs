// Click scheduling. Ticks live on the audio clock: each one is handed to the
// engine ahead of time with its absolute start, and the beat LED follows once
// the tick's time has actually passed.

use std::collections::VecDeque;

use crate::shared::{DEFAULT_BPM, LED_SLOTS, clamp_bpm};

const BEATS_PER_BAR: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub at: f64,
    pub accent: bool,
    pub led: i8,
}

#[derive(Clone, Debug)]
pub struct Metronome {
    enabled: bool,
    bpm: u32,
    count: u64,
    next_at: f64,
    in_flight: VecDeque<Tick>, // scheduled, LED not shown yet
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}

impl Metronome {
    pub fn new(bpm: u32) -> Self {
        Self {
            enabled: false,
            bpm: clamp_bpm(bpm as i64),
            count: 0,
            next_at: 0.0,
            in_flight: VecDeque::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn interval(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    // the tick already queued keeps its time; the one after uses the new tempo
    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = clamp_bpm(bpm as i64);
    }

    pub fn start(&mut self, now: f64) {
        self.enabled = true;
        self.count = 0;
        self.next_at = now;
        self.in_flight.clear();
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.in_flight.clear();
    }

    // every tick starting before `horizon`, in order
    pub fn schedule_until(&mut self, horizon: f64) -> Vec<Tick> {
        let mut out = Vec::new();
        if !self.enabled {
            return out;
        }
        while self.next_at < horizon {
            let tick = Tick {
                at: self.next_at,
                accent: self.count % BEATS_PER_BAR == 0,
                led: (self.count % LED_SLOTS as u64) as i8,
            };
            out.push(tick);
            self.in_flight.push_back(tick);
            self.count += 1;
            self.next_at += self.interval();
        }
        out
    }

    // LED of the latest tick that has sounded by `now`
    pub fn passed(&mut self, now: f64) -> Option<i8> {
        let mut led = None;
        while let Some(t) = self.in_flight.front() {
            if t.at > now {
                break;
            }
            led = Some(t.led);
            self.in_flight.pop_front();
        }
        led
    }
}
