//! Focus Relay - A state-managed HTTP server running a pomodoro timer
//!
//! This library hosts one logical pomodoro timer and a mirrored companion
//! display, kept consistent through a session-scoped key-value store with
//! cross-context change notification.

pub mod api;
pub mod app;
pub mod config;
pub mod mirror;
pub mod store;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use app::AppState;
pub use config::Config;
pub use store::SessionStore;
pub use utils::signals::shutdown_signal;
