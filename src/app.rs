//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    mirror::MirrorDisplay,
    store::SessionStore,
    timer::TimerController,
};

/// Top-level application state shared with handlers and background tasks
#[derive(Debug)]
pub struct AppState {
    /// Canonical timer, the only writer of countdown ticks
    pub controller: TimerController,
    /// Read-following companion view
    pub mirror: MirrorDisplay,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Wire the controller and the mirror up to the same store, each with its
    /// own context so neither hears its own writes echoed back.
    pub fn new(config: &Config, store: &Arc<SessionStore>) -> Self {
        let defaults = config.timer_defaults();
        Self {
            controller: TimerController::new(store.context(), &defaults),
            mirror: MirrorDisplay::new(store.context(), defaults),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Record the most recent user action for the status endpoint.
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
