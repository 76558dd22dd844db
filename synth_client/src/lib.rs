mod config;
mod error;

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header, Client};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

pub use config::{
    SynthesisConfig, DEFAULT_BASE_URL, DEFAULT_MODEL_ID, DEFAULT_TIMEOUT_SECS, DEFAULT_VOICE_ID,
};
pub use error::SynthesisError;

/// Request body for the streaming text-to-speech endpoint
#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Anything that can turn text into an encoded audio file.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and write the encoded audio to `path`, returning the
    /// number of bytes written.
    async fn synthesize_to_file(&self, text: &str, path: &Path) -> Result<u64, SynthesisError>;

    /// File extension of the audio this synthesizer produces.
    fn audio_extension(&self) -> &'static str {
        "mp3"
    }
}

/// Client for an ElevenLabs-compatible streaming synthesis API.
pub struct SpeechClient {
    config: SynthesisConfig,
    client: Client,
}

impl SpeechClient {
    pub fn new(config: SynthesisConfig) -> Result<Self, SynthesisError> {
        if config.api_key.trim().is_empty() {
            return Err(SynthesisError::Config("API key is empty".to_string()));
        }
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    async fn send(&self, text: &str) -> Result<reqwest::Response, SynthesisError> {
        let body = SpeechRequest {
            text,
            model_id: &self.config.model_id,
        };

        let response = self
            .client
            .post(self.config.endpoint())
            .header(header::ACCEPT, "audio/mpeg")
            .header("xi-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Stream the synthesized audio into `writer` chunk by chunk.
    pub async fn synthesize_to_writer<W>(
        &self,
        text: &str,
        writer: &mut W,
    ) -> Result<u64, SynthesisError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let response = self.send(text).await?;
        let written = pump(response, writer).await?;
        info!(
            "synthesized {} chars into {} bytes (voice={}, model={})",
            text.chars().count(),
            written,
            self.config.voice_id,
            self.config.model_id
        );
        Ok(written)
    }

    /// Synthesize into memory.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let mut audio = Vec::new();
        self.synthesize_to_writer(text, &mut audio).await?;
        Ok(audio)
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechClient {
    async fn synthesize_to_file(&self, text: &str, path: &Path) -> Result<u64, SynthesisError> {
        debug!("streaming synthesized audio to {}", path.display());
        // Create the file only once the service has accepted the request.
        let response = self.send(text).await?;
        let mut file = tokio::fs::File::create(path).await?;
        let written = pump(response, &mut file).await?;
        info!("synthesized {} bytes to {}", written, path.display());
        Ok(written)
    }
}

/// Copy a response body into `writer` as it arrives.
async fn pump<W>(response: reqwest::Response, writer: &mut W) -> Result<u64, SynthesisError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}
