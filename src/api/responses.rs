//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mirror::{MirrorPosition, MirrorSnapshot};
use crate::timer::{format_time, TimerState};

/// API response structure for timer action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response for an accepted action
    pub fn ok(message: String, timer: TimerState) -> Self {
        Self::new("ok".to_string(), message, timer)
    }

    /// Create a response for an action blocked by a precondition
    pub fn rejected(message: String, timer: TimerState) -> Self {
        Self::new("rejected".to_string(), message, timer)
    }
}

/// Full status response for the controller view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    /// Countdown formatted as "MM:SS"
    pub time_display: String,
    /// Phase progress, 0..=100
    pub progress_percent: f64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Mirror view response. The timer payload is omitted while the mirror is
/// hidden (no session in progress).
#[derive(Debug, Clone, Serialize)]
pub struct MirrorResponse {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_display: Option<String>,
    pub position: MirrorPosition,
}

impl MirrorResponse {
    pub fn from_snapshot(snapshot: MirrorSnapshot) -> Self {
        let visible = snapshot.visible();
        Self {
            visible,
            time_display: visible.then(|| format_time(snapshot.state.time_left_seconds)),
            timer: visible.then_some(snapshot.state),
            position: snapshot.position,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request body for POST /timer/task
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub task: String,
}

/// Request body for POST /timer/duration/:mode
#[derive(Debug, Deserialize)]
pub struct DurationRequest {
    pub minutes: u64,
}

/// Request body for POST /mirror/position
#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub x: i64,
    pub y: i64,
}
