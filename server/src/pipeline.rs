//! One "process" action: synthesize, change speed, re-encode, store.

use std::path::{Path, PathBuf};
use std::time::Instant;

use audio_core::{AudioSpec, ProcessedAudio};
use synth_client::SpeechSynthesizer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::ClipStore;

/// Result of a successful process action.
#[derive(Debug)]
pub struct ProcessedClip {
    pub id: Uuid,
    pub path: PathBuf,
    pub speed: f64,
    /// Shape of the audio the synthesis service returned.
    pub source: AudioSpec,
    pub source_duration_ms: u64,
    pub audio: ProcessedAudio,
}

/// Deletes the raw download when dropped, whichever way the request ends.
struct RawDownload {
    path: PathBuf,
}

impl RawDownload {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RawDownload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {e}", self.path.display()),
        }
    }
}

/// Run the full process action for `text` at `speed`.
///
/// Input must already be validated. Steps run strictly in order; the first
/// failure ends the action and nothing is stored.
pub async fn process_text(
    synthesizer: &dyn SpeechSynthesizer,
    clips: &ClipStore,
    text: &str,
    speed: f64,
) -> Result<ProcessedClip, ApiError> {
    let id = Uuid::new_v4();
    let started = Instant::now();
    let extension = synthesizer.audio_extension();
    let raw = RawDownload {
        path: clips.raw_path(id, extension),
    };

    let downloaded = synthesizer.synthesize_to_file(text, raw.path()).await?;
    info!(
        "[{}] synthesized {} chars -> {} bytes in {:?}",
        id,
        text.chars().count(),
        downloaded,
        started.elapsed()
    );

    let raw_path = raw.path().to_path_buf();
    let (source, source_duration_ms, audio) = tokio::task::spawn_blocking(move || {
        transform(&raw_path, speed)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Task join error: {e}")))??;
    drop(raw);

    let path = clips.save(id, audio.wav_bytes()).await?;
    info!(
        "[{}] processed at {}x: {} ms -> {} ms ({} bytes) in {:?}",
        id,
        speed,
        source_duration_ms,
        audio.duration_ms(),
        audio.wav_bytes().len(),
        started.elapsed()
    );

    Ok(ProcessedClip {
        id,
        path,
        speed,
        source,
        source_duration_ms,
        audio,
    })
}

// Blocking part: decode, change speed, re-encode.
fn transform(raw_path: &Path, speed: f64) -> Result<(AudioSpec, u64, ProcessedAudio), ApiError> {
    let decoded = audio_core::decode_file(raw_path)?;
    let source = decoded.spec();
    let source_duration_ms = decoded.duration_ms();
    info!(
        "decoded {} Hz / {} ch / {} ms",
        source.sample_rate, source.channels, source_duration_ms
    );

    let adjusted = audio_core::adjust_speed(decoded, speed)?;
    let audio = audio_core::reencode(&adjusted)?;
    Ok((source, source_duration_ms, audio))
}
