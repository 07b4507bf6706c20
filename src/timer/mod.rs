//! Timer module
//!
//! This module contains the pomodoro state machine and the controller that
//! owns it. The controller is the only writer of elapsed-time ticks; every
//! other surface follows it through the session store.

pub mod controller;
pub mod state;

// Re-export main types
pub use controller::TimerController;
pub use state::{format_time, TimerDefaults, TimerMode, TimerState};
