use super::Effect;
use crate::audio::frame::StereoFrame;

pub const FEEDBACK: f32 = 0.4;
const TAIL_FLOOR: f32 = 0.001; // -60dB

// Feedback delay line summed with the dry signal. The buffer grows by the
// echo tail so repeats past the end of the voice are kept.
pub struct Delay {
    delay_frames: usize,
    wet: f32,
}

impl Delay {
    pub fn new(seconds: f32, wet: f32, sample_rate: u32) -> Self {
        Self {
            delay_frames: ((seconds * sample_rate as f32).round() as usize).max(1),
            wet,
        }
    }

    fn tail_frames(&self) -> usize {
        let repeats = (TAIL_FLOOR.ln() / FEEDBACK.ln()).ceil() as usize + 1;
        self.delay_frames * repeats
    }
}

impl Effect for Delay {
    fn process(&mut self, buf: &mut Vec<StereoFrame>) {
        let dry_len = buf.len();
        if dry_len == 0 {
            return;
        }
        buf.resize(dry_len + self.tail_frames(), StereoFrame::zero());

        // line[n] = x[n - d] + fb * line[n - d]
        let d = self.delay_frames;
        let mut line = vec![StereoFrame::zero(); buf.len()];
        for n in d..buf.len() {
            let x = if n - d < dry_len { buf[n - d] } else { StereoFrame::zero() };
            line[n] = x + line[n - d].scaled(FEEDBACK);
        }
        for (out, echo) in buf.iter_mut().zip(&line) {
            *out += echo.scaled(self.wet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_repeats_with_feedback() {
        let mut buf = vec![StereoFrame::zero(); 10];
        buf[0] = StereoFrame::mono(1.0);
        let mut delay = Delay::new(10.0 / 44100.0, 0.5, 44100);
        delay.process(&mut buf);
        assert_eq!(buf[0].left, 1.0);
        assert!((buf[10].left - 0.5).abs() < 1e-6);
        assert!((buf[20].left - 0.5 * FEEDBACK).abs() < 1e-6);
        assert!((buf[30].left - 0.5 * FEEDBACK * FEEDBACK).abs() < 1e-6);
        assert_eq!(buf[15].left, 0.0);
    }

    #[test]
    fn tail_extends_until_echoes_fade() {
        let mut buf = vec![StereoFrame::mono(0.5); 100];
        let mut delay = Delay::new(0.01, 0.8, 44100);
        let tail = delay.tail_frames();
        delay.process(&mut buf);
        assert_eq!(buf.len(), 100 + tail);
        let last = buf.last().unwrap().left.abs();
        assert!(last < 0.5 * 0.8 * TAIL_FLOOR * 2.0);
    }
}
