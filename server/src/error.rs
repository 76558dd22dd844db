use audio_core::AudioError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use synth_client::SynthesisError;
use thiserror::Error;

/// API Error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please enter the text you'd like to synthesize.")]
    EmptyInput,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to synthesize text: {0}")]
    SynthesisFailure(String),

    #[error("Error occurred during audio processing: {0}")]
    AudioProcessingFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<SynthesisError> for ApiError {
    fn from(e: SynthesisError) -> Self {
        ApiError::SynthesisFailure(e.user_message())
    }
}

impl From<AudioError> for ApiError {
    fn from(e: AudioError) -> Self {
        ApiError::AudioProcessingFailure(e.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
    level: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, level) = match &self {
            ApiError::EmptyInput => {
                tracing::warn!("Rejected request with empty text");
                (StatusCode::BAD_REQUEST, "warning")
            }
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "error"),
            ApiError::SynthesisFailure(msg) => {
                tracing::error!("Synthesis failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "error")
            }
            ApiError::AudioProcessingFailure(msg) => {
                tracing::error!("Audio processing failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "error")
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "error"),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "error")
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: status.as_u16(),
            level,
        });

        (status, body).into_response()
    }
}
