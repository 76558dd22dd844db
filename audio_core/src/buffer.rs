use serde::Serialize;

use crate::error::AudioError;

/// Decoded PCM audio: interleaved `f32` samples in [-1.0, 1.0] plus the
/// metadata needed to interpret them.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    // Bytes per sample of the material this buffer was decoded from.
    sample_width: u16,
}

/// Shape of a buffer without its samples, handy for logging and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioSpec {
    pub sample_rate: u32,
    pub channels: u16,
    pub sample_width: u16,
}

impl AudioBuffer {
    /// Build a buffer from interleaved samples.
    pub fn new(
        samples: Vec<f32>,
        sample_rate: u32,
        channels: u16,
        sample_width: u16,
    ) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidArgument(
                "sample rate must be positive".to_string(),
            ));
        }
        if channels == 0 {
            return Err(AudioError::InvalidArgument(
                "channel count must be positive".to_string(),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(AudioError::InvalidArgument(format!(
                "{} samples cannot be split evenly across {} channels",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
            sample_width,
        })
    }

    /// Build a buffer from one `Vec` per channel. All channels must share a length.
    pub fn from_planar(
        planes: Vec<Vec<f32>>,
        sample_rate: u32,
        sample_width: u16,
    ) -> Result<Self, AudioError> {
        if planes.is_empty() {
            return Err(AudioError::InvalidArgument(
                "no audio channels provided".to_string(),
            ));
        }
        let frames = planes[0].len();
        if planes.iter().any(|p| p.len() != frames) {
            return Err(AudioError::InvalidArgument(
                "channel length mismatch".to_string(),
            ));
        }

        let channels = planes.len();
        let mut samples = Vec::with_capacity(frames * channels);
        for idx in 0..frames {
            for plane in &planes {
                samples.push(plane[idx]);
            }
        }
        Self::new(samples, sample_rate, channels as u16, sample_width)
    }

    /// Split interleaved samples into one `Vec` per channel.
    pub fn to_planar(&self) -> Vec<Vec<f32>> {
        let channels = self.channels as usize;
        let mut planes = vec![Vec::with_capacity(self.frames()); channels];
        for (idx, &s) in self.samples.iter().enumerate() {
            planes[idx % channels].push(s);
        }
        planes
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }

    pub fn spec(&self) -> AudioSpec {
        AudioSpec {
            sample_rate: self.sample_rate,
            channels: self.channels,
            sample_width: self.sample_width,
        }
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn duration_ms(&self) -> u64 {
        (self.duration_secs() * 1000.0).round() as u64
    }

    /// Same samples, different declared rate. This is the "play it back at
    /// another rate" reinterpretation; nothing is recomputed.
    pub fn with_sample_rate(self, sample_rate: u32) -> Result<Self, AudioError> {
        Self::new(self.samples, sample_rate, self.channels, self.sample_width)
    }

    /// Average all channels into one.
    pub fn downmix_to_mono(&self) -> AudioBuffer {
        if self.channels == 1 {
            return self.clone();
        }
        let channels = self.channels as usize;
        let scale = 1.0 / channels as f32;
        let mixed = self
            .samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * scale)
            .collect();
        AudioBuffer {
            samples: mixed,
            sample_rate: self.sample_rate,
            channels: 1,
            sample_width: self.sample_width,
        }
    }
}
