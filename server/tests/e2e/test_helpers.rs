//! Test helpers for e2e tests
//!
//! These wire the real HTTP synthesis client to a mockito server, so a request
//! travels router -> pipeline -> client -> "remote" service and back.

use std::sync::Arc;

use axum::Router;
use server::config::ServerConfig;
use server::store::ClipStore;
use server::AppState;
use synth_client::{SpeechClient, SynthesisConfig, DEFAULT_VOICE_ID};
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "e2e-test-key";

pub struct E2eApp {
    pub router: Router,
    pub clips: Arc<ClipStore>,
    pub work_dir: TempDir,
}

/// Path the client posts to for the default voice.
pub fn synthesis_path() -> String {
    format!("/v1/text-to-speech/{DEFAULT_VOICE_ID}/stream")
}

/// Create an app whose synthesis client talks to `remote_url`
pub fn create_e2e_app(remote_url: &str) -> E2eApp {
    let work_dir = tempfile::tempdir().unwrap();
    let clips = Arc::new(ClipStore::open(work_dir.path()).unwrap());
    let client =
        SpeechClient::new(SynthesisConfig::new(TEST_API_KEY).with_base_url(remote_url)).unwrap();

    let state = AppState {
        synthesizer: Arc::new(client),
        clips: clips.clone(),
        config: ServerConfig {
            work_dir: work_dir.path().to_path_buf(),
            ..ServerConfig::default()
        },
    };
    E2eApp {
        router: server::app(state),
        clips,
        work_dir,
    }
}

impl E2eApp {
    pub fn file_count(&self) -> usize {
        std::fs::read_dir(self.work_dir.path()).unwrap().count()
    }
}
