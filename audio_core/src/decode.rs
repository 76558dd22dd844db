use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::buffer::AudioBuffer;
use crate::error::AudioError;

/// Decode a whole encoded file (MP3 or WAV) held in memory.
///
/// `extension_hint` speeds up probing but is not required.
pub fn decode(bytes: Vec<u8>, extension_hint: Option<&str>) -> Result<AudioBuffer, AudioError> {
    if bytes.is_empty() {
        return Err(AudioError::Decode("audio data is empty".to_string()));
    }

    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = extension_hint {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::Decode("no audio track found".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);
    // MP3 does not declare a bit depth; treat it as 16-bit like the encoders do.
    let sample_width = track
        .codec_params
        .bits_per_sample
        .map(|bits| bits.div_ceil(8) as u16)
        .unwrap_or(2);

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped = 0usize;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                skipped += 1;
                warn!("skipping corrupt audio packet: {e}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if sample_rate == 0 || channels == 0 {
        return Err(AudioError::Decode(
            "stream did not declare a sample rate or channel layout".to_string(),
        ));
    }
    debug!(
        "decoded {} samples ({} Hz, {} ch), skipped {} packets",
        samples.len(),
        sample_rate,
        channels,
        skipped
    );

    AudioBuffer::new(samples, sample_rate, channels, sample_width)
}

/// Read and decode a file, using its extension as the format hint.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<AudioBuffer, AudioError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let ext = path.extension().and_then(|e| e.to_str());
    decode(bytes, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn wav_bytes(rate: u32, channels: u16, frames: usize) -> Vec<u8> {
        let spec = WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for n in 0..frames {
                for ch in 0..channels {
                    let v = if ch == 0 { (n % 100) as i16 * 100 } else { -1000 };
                    writer.write_sample(v).unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_wav_metadata_and_samples() {
        let buffer = decode(wav_bytes(22050, 2, 2205), Some("wav")).unwrap();
        assert_eq!(buffer.sample_rate(), 22050);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.sample_width(), 2);
        assert_eq!(buffer.frames(), 2205);
        assert_eq!(buffer.duration_ms(), 100);
        let right = buffer.samples()[1];
        assert!((right - (-1000.0 / 32768.0)).abs() < 1e-4);
    }

    #[test]
    fn probes_without_hint() {
        let buffer = decode(wav_bytes(8000, 1, 800), None).unwrap();
        assert_eq!(buffer.channels(), 1);
        assert_eq!(buffer.frames(), 800);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = decode(b"this is not audio at all".to_vec(), Some("mp3"));
        assert!(matches!(result, Err(AudioError::Decode(_))));
    }

    #[test]
    fn empty_input_is_a_decode_error() {
        assert!(matches!(decode(Vec::new(), None), Err(AudioError::Decode(_))));
    }

    #[test]
    fn decode_file_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, wav_bytes(16000, 1, 1600)).unwrap();
        let buffer = decode_file(&path).unwrap();
        assert_eq!(buffer.sample_rate(), 16000);
        assert_eq!(buffer.frames(), 1600);
    }
}
