//! Mirror display module
//!
//! This module contains the read-following companion view of the timer: it
//! never runs a countdown of its own, it only reflects what the controller
//! last published to the session store.

pub mod display;

// Re-export main types
pub use display::{MirrorDisplay, MirrorPosition, MirrorSnapshot};
