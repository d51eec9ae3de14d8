use std::f32::consts::TAU;

use super::Effect;
use crate::audio::frame::StereoFrame;

// One-pole low-pass, one state per channel.
pub struct LowPass {
    coeff: f32,
}

impl LowPass {
    pub fn new(cutoff_hz: f32, sample_rate: u32) -> Self {
        let nyquist = sample_rate as f32 * 0.5;
        let fc = cutoff_hz.clamp(1.0, nyquist);
        Self {
            coeff: 1.0 - (-TAU * fc / sample_rate as f32).exp(),
        }
    }
}

impl Effect for LowPass {
    fn process(&mut self, buf: &mut Vec<StereoFrame>) {
        let mut state = StereoFrame::zero();
        for f in buf.iter_mut() {
            state.left += self.coeff * (f.left - state.left);
            state.right += self.coeff * (f.right - state.right);
            *f = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(hz: f32, n: usize) -> Vec<StereoFrame> {
        (0..n)
            .map(|i| StereoFrame::mono((TAU * hz * i as f32 / 44100.0).sin()))
            .collect()
    }

    fn energy(buf: &[StereoFrame]) -> f32 {
        buf.iter().map(|f| f.left * f.left).sum()
    }

    #[test]
    fn passes_dc() {
        let mut buf = vec![StereoFrame::mono(1.0); 2000];
        LowPass::new(100.0, 44100).process(&mut buf);
        assert!((buf[1999].left - 1.0).abs() < 1e-3);
    }

    #[test]
    fn low_cutoff_attenuates_highs_more() {
        let mut lows = tone(80.0, 4410);
        let mut highs = tone(8000.0, 4410);
        let (el, eh) = (energy(&lows), energy(&highs));
        LowPass::new(100.0, 44100).process(&mut lows);
        LowPass::new(100.0, 44100).process(&mut highs);
        assert!(energy(&highs) / eh < 0.05);
        assert!(energy(&lows) / el > 0.3);
    }
}
