use std::fmt;
use std::time::Duration;

use crate::error::SynthesisError;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_VOICE_ID: &str = "NWUmRK8Ke0m8Ms5lYVru";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where and as whom to call the synthesis service.
#[derive(Clone)]
pub struct SynthesisConfig {
    pub api_key: String,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub timeout_secs: u64,
}

// Keep the key out of logs.
impl fmt::Debug for SynthesisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesisConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("voice_id", &self.voice_id)
            .field("model_id", &self.model_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SynthesisConfig {
    /// Defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `XI_API_KEY` (required) plus optional `XI_BASE_URL`, `XI_VOICE_ID`,
    /// `XI_MODEL_ID` and `XI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, SynthesisError> {
        let api_key = std::env::var("XI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SynthesisError::Config("XI_API_KEY must be set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(url) = non_empty_var("XI_BASE_URL") {
            config.base_url = url;
        }
        if let Some(voice) = non_empty_var("XI_VOICE_ID") {
            config.voice_id = voice;
        }
        if let Some(model) = non_empty_var("XI_MODEL_ID") {
            config.model_id = model;
        }
        config.timeout_secs = std::env::var("XI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Streaming synthesis URL for the configured voice.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}/stream",
            self.base_url.trim_end_matches('/'),
            self.voice_id
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
