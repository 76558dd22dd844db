//! Common utilities for integration tests
#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use server::config::ServerConfig;
use server::store::ClipStore;
use server::AppState;
use synth_client::{SpeechSynthesizer, SynthesisError};
use tempfile::TempDir;
use tower::ServiceExt;

/// What the fake synthesis service answers with.
pub enum FakeReply {
    Tone {
        sample_rate: u32,
        channels: u16,
        secs: f32,
    },
    Reject {
        status: u16,
        body: String,
    },
    Garbage,
}

/// Stands in for the remote service; counts how often it was called.
pub struct FakeSynthesizer {
    calls: AtomicUsize,
    reply: FakeReply,
}

impl FakeSynthesizer {
    pub fn tone(sample_rate: u32, channels: u16, secs: f32) -> Self {
        Self::with_reply(FakeReply::Tone {
            sample_rate,
            channels,
            secs,
        })
    }

    pub fn rejecting(status: u16, body: &str) -> Self {
        Self::with_reply(FakeReply::Reject {
            status,
            body: body.to_string(),
        })
    }

    pub fn with_reply(reply: FakeReply) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize_to_file(&self, _text: &str, path: &Path) -> Result<u64, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let bytes = match &self.reply {
            FakeReply::Tone {
                sample_rate,
                channels,
                secs,
            } => wav_tone(*sample_rate, *channels, *secs),
            FakeReply::Reject { status, body } => {
                return Err(SynthesisError::Rejected {
                    status: *status,
                    body: body.clone(),
                })
            }
            FakeReply::Garbage => b"definitely not audio".to_vec(),
        };
        tokio::fs::write(path, &bytes).await?;
        Ok(bytes.len() as u64)
    }

    fn audio_extension(&self) -> &'static str {
        "wav"
    }
}

/// A 16-bit PCM WAV file holding a 220 Hz tone.
pub fn wav_tone(sample_rate: u32, channels: u16, secs: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let frames = (sample_rate as f32 * secs) as usize;
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for n in 0..frames {
            let t = n as f32 / sample_rate as f32;
            let v = (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.5;
            for _ in 0..channels {
                writer.write_sample((v * i16::MAX as f32) as i16).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

pub struct TestApp {
    pub router: Router,
    pub synth: Arc<FakeSynthesizer>,
    pub clips: Arc<ClipStore>,
    pub work_dir: TempDir,
}

impl TestApp {
    /// Names of the files currently in the work directory.
    pub fn files(&self) -> Vec<String> {
        std::fs::read_dir(self.work_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

/// Create a test app instance backed by `synth`
pub fn create_test_app(synth: FakeSynthesizer) -> TestApp {
    let work_dir = tempfile::tempdir().unwrap();
    let clips = Arc::new(ClipStore::open(work_dir.path()).unwrap());
    let synth = Arc::new(synth);
    let config = ServerConfig {
        work_dir: work_dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let state = AppState {
        synthesizer: synth.clone(),
        clips: clips.clone(),
        config,
    };
    TestApp {
        router: server::app(state),
        synth,
        clips,
        work_dir,
    }
}

pub async fn post_json(
    router: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

pub fn assert_duration_close(actual_ms: u64, expected_ms: u64) {
    let diff = (actual_ms as i64 - expected_ms as i64).abs();
    assert!(
        diff <= 20,
        "expected ~{expected_ms} ms, got {actual_ms} ms"
    );
}
