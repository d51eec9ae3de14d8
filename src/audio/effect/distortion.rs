use std::f32::consts::PI;

use super::Effect;
use crate::audio::frame::StereoFrame;

pub const CURVE_POINTS: usize = 44_100;

// Wave-shaper driven through a tabulated curve spanning inputs [-1, 1].
pub struct Distortion {
    curve: Vec<f32>,
}

impl Distortion {
    // `amount` is drive 0..100
    pub fn new(amount: f32) -> Self {
        Self {
            curve: distortion_curve(amount),
        }
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        let last = self.curve.len() - 1;
        let pos = (x + 1.0) * 0.5 * last as f32;
        if !(pos > 0.0) {
            return self.curve[0]; // also catches NaN
        }
        if pos >= last as f32 {
            return self.curve[last];
        }
        let i = pos as usize;
        let frac = pos - i as f32;
        self.curve[i] + (self.curve[i + 1] - self.curve[i]) * frac
    }
}

// y = (3 + k) * x * 20deg / (pi + k * |x|)
pub fn distortion_curve(amount: f32) -> Vec<f32> {
    let deg = PI / 180.0;
    (0..CURVE_POINTS)
        .map(|i| {
            let x = (i * 2) as f32 / CURVE_POINTS as f32 - 1.0;
            ((3.0 + amount) * x * 20.0 * deg) / (PI + amount * x.abs())
        })
        .collect()
}

impl Effect for Distortion {
    fn process(&mut self, buf: &mut Vec<StereoFrame>) {
        for f in buf.iter_mut() {
            f.left = self.shape(f.left);
            f.right = self.shape(f.right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_has_fixed_size_and_is_odd() {
        let c = distortion_curve(50.0);
        assert_eq!(c.len(), CURVE_POINTS);
        assert!(c[0] < 0.0);
        assert!(c[CURVE_POINTS / 2].abs() < 1e-6);
        assert!(c.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn out_of_range_input_holds_the_ends() {
        let d = Distortion::new(80.0);
        assert_eq!(d.shape(5.0), d.curve[CURVE_POINTS - 1]);
        assert_eq!(d.shape(-5.0), d.curve[0]);
    }

    #[test]
    fn more_drive_compresses_harder() {
        let soft = Distortion::new(10.0);
        let hard = Distortion::new(100.0);
        // ratio of a quiet input to a loud one rises with drive
        let r_soft = soft.shape(0.1) / soft.shape(0.9);
        let r_hard = hard.shape(0.1) / hard.shape(0.9);
        assert!(r_hard > r_soft);
    }
}
