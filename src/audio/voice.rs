use std::sync::Arc;

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

// One playing buffer. Effects and pitch are already baked in, so a voice only
// walks its frames once, front to back, and mixes them into the block.
#[derive(Clone, Debug)]
pub struct Voice {
    buffer: Arc<SampleBuffer>,
    pos: usize,
}

impl Voice {
    pub fn new(buffer: Arc<SampleBuffer>) -> Self {
        Self { buffer, pos: 0 }
    }

    pub fn is_finished(&self) -> bool {
        self.pos >= self.buffer.data.len()
    }

    // mix as much of the remaining buffer as fits into `out`
    pub fn render_into(&mut self, out: &mut [StereoFrame]) {
        let remaining = &self.buffer.data[self.pos.min(self.buffer.data.len())..];
        let n = remaining.len().min(out.len());
        for (frame, sample) in out[..n].iter_mut().zip(remaining) {
            *frame += *sample;
        }
        self.pos += n;
    }

    // hand the buffer back so it can be freed off the audio thread
    pub fn into_buffer(self) -> Arc<SampleBuffer> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Arc<SampleBuffer> {
        let samples: Vec<f32> = (0..n).map(|i| i as f32).collect();
        Arc::new(SampleBuffer::from_mono(&samples, 44100))
    }

    #[test]
    fn renders_across_blocks_then_finishes() {
        let mut v = Voice::new(ramp(6));
        let mut block = [StereoFrame::zero(); 4];
        v.render_into(&mut block);
        assert_eq!(block[3].left, 3.0);
        assert!(!v.is_finished());

        let mut block = [StereoFrame::zero(); 4];
        v.render_into(&mut block);
        assert_eq!(block[0].left, 4.0);
        assert_eq!(block[1].left, 5.0);
        assert_eq!(block[2], StereoFrame::zero());
        assert!(v.is_finished());
    }

    #[test]
    fn mixes_on_top_of_existing_audio() {
        let mut v = Voice::new(ramp(2));
        let mut block = [StereoFrame::mono(1.0); 2];
        v.render_into(&mut block);
        assert_eq!(block[1], StereoFrame::mono(2.0));
    }
}
