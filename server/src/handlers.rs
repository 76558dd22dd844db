use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::pipeline::process_text;
use crate::validation::{validate_process_request, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED, SPEED_STEP};
use crate::AppState;

#[derive(Deserialize)]
pub struct ProcessRequest {
    text: String,
    speed: Option<f64>,
}

#[derive(Serialize)]
pub struct ProcessResponse {
    id: Uuid,
    audio_base64: String,
    audio_url: String,
    sample_rate: u32,
    channels: u16,
    duration_ms: u64,
    source_duration_ms: u64,
    source_sample_rate: u32,
    speed: f64,
}

#[derive(Serialize)]
pub struct OutputProfile {
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
}

#[derive(Serialize)]
pub struct SettingsResponse {
    min_speed: f64,
    max_speed: f64,
    speed_step: f64,
    default_speed: f64,
    output: OutputProfile,
}

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn settings() -> Json<SettingsResponse> {
    Json(SettingsResponse {
        min_speed: MIN_SPEED,
        max_speed: MAX_SPEED,
        speed_step: SPEED_STEP,
        default_speed: DEFAULT_SPEED,
        output: OutputProfile {
            sample_rate: audio_core::profile::OUTPUT_SAMPLE_RATE,
            channels: audio_core::profile::OUTPUT_CHANNELS,
            bits_per_sample: audio_core::profile::OUTPUT_BITS_PER_SAMPLE,
        },
    })
}

pub async fn process_endpoint(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let speed = req.speed.unwrap_or(DEFAULT_SPEED);
    validate_process_request(&req.text, speed)?;

    info!(
        "Process request received: text length={}, speed={}",
        req.text.chars().count(),
        speed
    );
    let clip = process_text(state.synthesizer.as_ref(), &state.clips, &req.text, speed).await?;

    Ok(Json(ProcessResponse {
        id: clip.id,
        audio_base64: clip.audio.to_base64(),
        audio_url: format!("/audio/{}", clip.id),
        sample_rate: clip.audio.sample_rate(),
        channels: clip.audio.channels(),
        duration_ms: clip.audio.duration_ms(),
        source_duration_ms: clip.source_duration_ms,
        source_sample_rate: clip.source.sample_rate,
        speed: clip.speed,
    }))
}

pub async fn get_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.clips.read(id).await?;
    Ok(([(header::CONTENT_TYPE, "audio/wav")], bytes))
}

pub async fn delete_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.clips.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The form's "Clear" button: drop the last processed clip, if any.
pub async fn clear_endpoint(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    if state.clips.clear_last().await?.is_none() {
        info!("Clear requested with nothing to clear");
    }
    Ok(StatusCode::NO_CONTENT)
}
