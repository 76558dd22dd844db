pub mod config;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use synth_client::SpeechSynthesizer;

use crate::config::ServerConfig;
use crate::store::ClipStore;

#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub clips: Arc<ClipStore>,
    pub config: ServerConfig,
}

// Request ID middleware for tracing
async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = header_value.clone() {
        request.headers_mut().insert("x-request-id", value);
    }
    let mut response = next.run(request).await;
    if let Some(value) = header_value {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// All routes, served both at the root and under `/api`.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/healthz", get(handlers::health_check))
        .route("/settings", get(handlers::settings))
        .route("/process", post(handlers::process_endpoint))
        .route(
            "/audio/{id}",
            get(handlers::get_audio).delete(handlers::delete_audio),
        )
        .route("/clear", post(handlers::clear_endpoint));

    Router::new()
        .merge(api.clone()) // root paths
        .nest("/api", api) // /api prefix
        .layer(axum::middleware::from_fn(add_request_id))
        .with_state(state)
}
