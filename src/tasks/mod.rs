//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server:
//! the one-second countdown driver and the mirror's sync loop.

pub mod countdown;
pub mod mirror_sync;

// Re-export main functions
pub use countdown::countdown_task;
pub use mirror_sync::mirror_sync_task;
