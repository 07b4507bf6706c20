//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::app::AppState;
use crate::timer::{format_time, TimerMode};

use super::responses::{
    ApiResponse, DurationRequest, HealthResponse, MirrorResponse, PositionRequest, StatusResponse,
    TaskRequest,
};

/// Handle POST /timer/start - Begin (or resume) the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("start");
    match state.controller.start() {
        Ok(timer) => {
            info!("start endpoint called - running={}", timer.is_running);
            Ok(Json(ApiResponse::ok("timer started".to_string(), timer)))
        }
        Err(e) => {
            error!("failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/pause - Pause the countdown
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("pause");
    match state.controller.pause() {
        Ok(timer) => {
            info!("pause endpoint called");
            Ok(Json(ApiResponse::ok("timer paused".to_string(), timer)))
        }
        Err(e) => {
            error!("failed to pause timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/reset - Reload the current mode's configured duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("reset");
    match state.controller.reset() {
        Ok(timer) => {
            info!("reset endpoint called - back to {}", format_time(timer.time_left_seconds));
            Ok(Json(ApiResponse::ok("timer reset".to_string(), timer)))
        }
        Err(e) => {
            error!("failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/mode/:mode - Switch phases
pub async fn switch_mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let Some(mode) = TimerMode::parse(&mode) else {
        warn!("switch-mode called with unknown mode: {}", mode);
        return Err(StatusCode::BAD_REQUEST);
    };

    state.record_action("switch-mode");
    match state.controller.switch_mode(mode) {
        Ok(timer) => Ok(Json(ApiResponse::ok(
            format!("switched to {}", mode),
            timer,
        ))),
        Err(e) => {
            error!("failed to switch mode: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/task - Update the current task label
pub async fn task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("set-task");
    match state.controller.set_task(request.task) {
        Ok(timer) => Ok(Json(ApiResponse::ok("task updated".to_string(), timer))),
        Err(e) => {
            error!("failed to set task: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/duration/:mode - Change a configured duration
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
    Json(request): Json<DurationRequest>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    let Some(mode) = TimerMode::parse(&mode) else {
        warn!("set-duration called with unknown mode: {}", mode);
        return Err(StatusCode::BAD_REQUEST);
    };

    state.record_action("set-duration");
    if request.minutes == 0 {
        // Precondition failure: surfaced to the caller before anything is
        // changed, never a server error.
        let timer = state
            .controller
            .state()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::rejected(
                format!("duration for {} must be at least one minute", mode),
                timer,
            )),
        ));
    }

    match state.controller.set_duration(mode, request.minutes) {
        Ok(timer) => Ok((
            StatusCode::OK,
            Json(ApiResponse::ok(
                format!("{} duration set to {} minutes", mode, request.minutes),
                timer,
            )),
        )),
        Err(e) => {
            error!("failed to set duration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /audio/play - Start break audio through the mirror
pub async fn audio_play_handler(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    state.record_action("audio-play");

    // Refresh first so the gate is judged against the controller's latest
    // published mode, not a stale snapshot.
    if let Err(e) = state.mirror.refresh() {
        error!("mirror refresh failed: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    match state.mirror.set_audio_playing(true) {
        Ok(snapshot) => {
            info!("break audio started");
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok("audio playing".to_string(), snapshot.state)),
            ))
        }
        Err(message) => {
            // Blocked by the break-mode gate.
            let timer = state
                .controller
                .state()
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
            warn!("audio play rejected: {}", message);
            Ok((
                StatusCode::CONFLICT,
                Json(ApiResponse::rejected(message, timer)),
            ))
        }
    }
}

/// Handle POST /audio/stop - Stop break audio
pub async fn audio_stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("audio-stop");
    match state.mirror.set_audio_playing(false) {
        Ok(snapshot) => {
            info!("break audio stopped");
            Ok(Json(ApiResponse::ok(
                "audio stopped".to_string(),
                snapshot.state,
            )))
        }
        Err(e) => {
            error!("failed to stop audio: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /mirror/position - Relocate the floating mirror
pub async fn mirror_position_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PositionRequest>,
) -> Result<Json<MirrorResponse>, StatusCode> {
    state.record_action("move-mirror");
    match state.mirror.set_position(request.x, request.y) {
        Ok(snapshot) => Ok(Json(MirrorResponse::from_snapshot(snapshot))),
        Err(e) => {
            error!("failed to move mirror: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Full controller view plus server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.controller.state() {
        Ok(t) => t,
        Err(e) => {
            error!("failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        time_display: format_time(timer.time_left_seconds),
        progress_percent: timer.progress_percent(),
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /mirror - The follower's current view
pub async fn mirror_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MirrorResponse>, StatusCode> {
    match state.mirror.snapshot() {
        Ok(snapshot) => Ok(Json(MirrorResponse::from_snapshot(snapshot))),
        Err(e) => {
            error!("failed to get mirror snapshot: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
