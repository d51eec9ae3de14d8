use super::Effect;
use crate::audio::frame::StereoFrame;

// Static re-tuning: resample the whole voice at 2^(cents/1200), like changing
// a sampler's playback rate. Length scales by the inverse of the rate.
pub struct Pitch {
    rate: f64,
}

impl Pitch {
    pub fn new(cents: f32) -> Self {
        Self {
            rate: 2f64.powf(cents as f64 / 1200.0),
        }
    }
}

impl Effect for Pitch {
    fn process(&mut self, buf: &mut Vec<StereoFrame>) {
        if self.rate == 1.0 || buf.is_empty() {
            return;
        }
        let out_len = (buf.len() as f64 / self.rate).ceil() as usize;
        let last = buf.len() - 1;
        let out = (0..out_len)
            .map(|i| {
                let pos = i as f64 * self.rate;
                let idx = (pos.floor() as usize).min(last);
                let frac = (pos - idx as f64) as f32;
                let a = buf[idx];
                let b = buf.get(idx + 1).copied().unwrap_or(a);
                StereoFrame {
                    left: a.left + (b.left - a.left) * frac,
                    right: a.right + (b.right - a.right) * frac,
                }
            })
            .collect();
        *buf = out;
    }
}
