use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use hound::{SampleFormat, WavSpec, WavWriter};

use crate::buffer::AudioBuffer;
use crate::error::AudioError;
use crate::profile::{OUTPUT_BITS_PER_SAMPLE, OUTPUT_CHANNELS, OUTPUT_SAMPLE_RATE};
use crate::resample::resample;

/// A clip re-encoded to the output profile, ready to be served or saved.
#[derive(Debug, Clone)]
pub struct ProcessedAudio {
    wav: Vec<u8>,
    frames: usize,
}

impl ProcessedAudio {
    /// Complete RIFF/WAVE file contents.
    pub fn wav_bytes(&self) -> &[u8] {
        &self.wav
    }

    pub fn into_wav_bytes(self) -> Vec<u8> {
        self.wav
    }

    pub fn sample_rate(&self) -> u32 {
        OUTPUT_SAMPLE_RATE
    }

    pub fn channels(&self) -> u16 {
        OUTPUT_CHANNELS
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn duration_ms(&self) -> u64 {
        (self.frames as f64 * 1000.0 / OUTPUT_SAMPLE_RATE as f64).round() as u64
    }

    /// WAV bytes as standard Base64, for embedding in JSON responses.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.wav)
    }
}

/// Convert `buffer` to mono, 11025 Hz, 8-bit unsigned PCM WAV.
///
/// Lossy and one-way; applied to every clip before delivery.
pub fn reencode(buffer: &AudioBuffer) -> Result<ProcessedAudio, AudioError> {
    let mono = buffer.downmix_to_mono();
    let mono = resample(&mono, OUTPUT_SAMPLE_RATE)?;

    let spec = WavSpec {
        channels: OUTPUT_CHANNELS,
        sample_rate: OUTPUT_SAMPLE_RATE,
        bits_per_sample: OUTPUT_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    // WAV header (44 bytes) + one byte per sample
    let mut cursor = Cursor::new(Vec::<u8>::with_capacity(44 + mono.frames()));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &s in mono.samples() {
            // hound stores 8-bit samples unsigned; it takes them signed and adds 128
            writer.write_sample(quantize_i8(s))?;
        }
        writer.finalize()?;
    }

    Ok(ProcessedAudio {
        wav: cursor.into_inner(),
        frames: mono.frames(),
    })
}

fn quantize_i8(sample: f32) -> i8 {
    (sample.clamp(-1.0, 1.0) * 127.0).round() as i8
}
