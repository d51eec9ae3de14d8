use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::Effect;
use crate::audio::frame::StereoFrame;
use crate::audio::synth::primitives::white;
use crate::audio::synth::NoiseRng;

// Convolvers normalize their impulse to a fixed loudness: scale by
// 1/rms, then by -58dB
const MIN_POWER: f32 = 0.000125;
const GAIN_CALIBRATION_DB: f32 = -58.0;

// Convolution reverb against a freshly generated stereo noise impulse,
// `(1 - n)^seconds` shaped. The wet signal is added on top of the input
// and the buffer grows by the impulse length.
pub struct Reverb {
    impulse: [Vec<f32>; 2],
    wet: f32,
}

impl Reverb {
    pub fn new(seconds: f32, wet: f32, sample_rate: u32, rng: &mut NoiseRng) -> Self {
        let mut impulse = synthetic_impulse(seconds, sample_rate, rng);
        let scale = normalization_scale(&impulse);
        for ch in impulse.iter_mut() {
            ch.iter_mut().for_each(|s| *s *= scale);
        }
        Self { impulse, wet }
    }

    pub fn impulse_len(&self) -> usize {
        self.impulse[0].len()
    }
}

pub fn synthetic_impulse(seconds: f32, sample_rate: u32, rng: &mut NoiseRng) -> [Vec<f32>; 2] {
    let len = (sample_rate as f32 * seconds) as usize;
    let mut left = Vec::with_capacity(len);
    let mut right = Vec::with_capacity(len);
    for i in 0..len {
        let n = i as f32 / len as f32;
        let env = (1.0 - n).powf(seconds);
        left.push(white(rng) * env);
        right.push(white(rng) * env);
    }
    [left, right]
}

fn normalization_scale(impulse: &[Vec<f32>; 2]) -> f32 {
    let len = impulse[0].len();
    if len == 0 {
        return 0.0;
    }
    let sum: f32 = impulse.iter().flat_map(|ch| ch.iter()).map(|s| s * s).sum();
    let mut power = (sum / (2 * len) as f32).sqrt();
    if !power.is_finite() || power < MIN_POWER {
        power = MIN_POWER;
    }
    10f32.powf(GAIN_CALIBRATION_DB * 0.05) / power
}

// linear convolution through one FFT round trip
fn convolve(signal: &[f32], kernel: &[f32], planner: &mut FftPlanner<f32>) -> Vec<f32> {
    let out_len = signal.len() + kernel.len() - 1;
    let size = out_len.next_power_of_two();
    let fft = planner.plan_fft_forward(size);
    let ifft = planner.plan_fft_inverse(size);

    let mut a: Vec<Complex<f32>> = signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
    a.resize(size, Complex::new(0.0, 0.0));
    let mut b: Vec<Complex<f32>> = kernel.iter().map(|&s| Complex::new(s, 0.0)).collect();
    b.resize(size, Complex::new(0.0, 0.0));

    fft.process(&mut a);
    fft.process(&mut b);
    for (x, y) in a.iter_mut().zip(&b) {
        *x *= *y;
    }
    ifft.process(&mut a);

    let norm = 1.0 / size as f32;
    a.iter().take(out_len).map(|c| c.re * norm).collect()
}

impl Effect for Reverb {
    fn process(&mut self, buf: &mut Vec<StereoFrame>) {
        if buf.is_empty() || self.impulse_len() == 0 {
            return;
        }
        let mut planner = FftPlanner::new();
        let left: Vec<f32> = buf.iter().map(|f| f.left).collect();
        let right: Vec<f32> = buf.iter().map(|f| f.right).collect();
        let wet_l = convolve(&left, &self.impulse[0], &mut planner);
        let wet_r = convolve(&right, &self.impulse[1], &mut planner);

        buf.resize(wet_l.len(), StereoFrame::zero());
        for (i, f) in buf.iter_mut().enumerate() {
            f.left += wet_l[i] * self.wet;
            f.right += wet_r[i] * self.wet;
        }
    }
}
