//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/mode/:mode", post(switch_mode_handler))
        .route("/timer/task", post(task_handler))
        .route("/timer/duration/:mode", post(duration_handler))
        .route("/audio/play", post(audio_play_handler))
        .route("/audio/stop", post(audio_stop_handler))
        .route("/mirror/position", post(mirror_position_handler))
        .route("/status", get(status_handler))
        .route("/mirror", get(mirror_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
