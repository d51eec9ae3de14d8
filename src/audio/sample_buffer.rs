use std::io::Cursor;

use super::frame::StereoFrame;

// An immutable block of stereo audio. Synthesized voices, user samples and
// effect-rendered triggers are all one of these, shared behind an Arc once built.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>, // the audio data array
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(data: Vec<StereoFrame>, sample_rate: u32) -> Self {
        Self { data, sample_rate }
    }

    // mono samples duplicated to stereo
    pub fn from_mono(samples: &[f32], sample_rate: u32) -> Self {
        Self {
            data: samples.iter().map(|&s| StereoFrame::mono(s)).collect(),
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Decode encoded WAV bytes (e.g. from the sample store) into a stereo buffer
    // at the engine rate
    pub fn decode_wav(bytes: &[u8], target_rate: u32) -> hound::Result<Self> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let file_rate = spec.sample_rate;
        let file_channels = spec.channels as usize;
        if file_channels == 0 || file_rate == 0 {
            return Err(hound::Error::Unsupported);
        }

        // Read the samples from the WAV file
        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader // float, just pass it through
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => { // int, convert to float
                let max = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let frames: Vec<StereoFrame> = if file_channels == 1 {
            samples.into_iter().map(StereoFrame::mono).collect() // mono, duplicate
        } else {
            // anything wider than stereo keeps its first two channels
            samples
                .chunks_exact(file_channels)
                .map(|c| StereoFrame {
                    left: c[0],
                    right: c[1],
                })
                .collect()
        };

        if frames.is_empty() {
            return Err(hound::Error::FormatError("no audio frames"));
        }

        Ok(Self {
            data: resample_linear(&frames, file_rate, target_rate),
            sample_rate: target_rate,
        })
    }

    // 32-bit float WAV, for feeding decode paths in tests
    #[cfg(test)]
    pub fn encode_wav(&self) -> hound::Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
            for f in &self.data {
                writer.write_sample(f.left)?;
                writer.write_sample(f.right)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}

pub(crate) fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    if source_rate == target_rate {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        // fractional position in the source buffer
        let src_pos = i as f64 / ratio; // ex. 3.7
        let idx = src_pos.floor() as usize; // ex. 3
        let frac = (src_pos - idx as f64) as f32; // ex. 0.7
        if idx >= frames.len().saturating_sub(1) { // edge case
            out.push(*frames.last().unwrap_or(&StereoFrame::zero()));
        } else {
            let a = frames[idx];
            let b = frames[idx + 1];
            out.push(StereoFrame { // blend via frac and linear interpolation
                left: a.left * (1.0 - frac) + b.left * frac,
                right: a.right * (1.0 - frac) + b.right * frac,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(channels: u16, rate: u32, samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut w = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                w.write_sample(s).unwrap();
            }
            w.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn mono_wav_is_duplicated_to_stereo() {
        let bytes = wav_bytes(1, 44100, &[0, 16384, -16384]);
        let buf = SampleBuffer::decode_wav(&bytes, 44100).unwrap();
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.data[1].left, buf.data[1].right);
        assert!((buf.data[1].left - 0.5).abs() < 1e-4);
        assert!((buf.data[2].left + 0.5).abs() < 1e-4);
    }

    #[test]
    fn stereo_wav_keeps_channels_apart() {
        let bytes = wav_bytes(2, 44100, &[16384, -16384]);
        let buf = SampleBuffer::decode_wav(&bytes, 44100).unwrap();
        assert_eq!(buf.len(), 1);
        assert!(buf.data[0].left > 0.0);
        assert!(buf.data[0].right < 0.0);
    }

    #[test]
    fn resamples_to_engine_rate() {
        let bytes = wav_bytes(1, 22050, &[1000; 100]);
        let buf = SampleBuffer::decode_wav(&bytes, 44100).unwrap();
        assert_eq!(buf.sample_rate, 44100);
        assert_eq!(buf.len(), 200);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(SampleBuffer::decode_wav(b"definitely not a wav file", 44100).is_err());
        assert!(SampleBuffer::decode_wav(&[], 44100).is_err());
    }

    #[test]
    fn encoded_buffer_decodes_back() {
        let buf = SampleBuffer::from_mono(&[0.0, 0.25, -0.25, 0.5], 48000);
        let bytes = buf.encode_wav().unwrap();
        let back = SampleBuffer::decode_wav(&bytes, 48000).unwrap();
        assert_eq!(back, buf);
    }
}
