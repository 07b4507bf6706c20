//! Session store module
//!
//! This module contains the session-scoped key-value store and the
//! change-notification bridge between execution contexts.

pub mod keys;
pub mod session_store;

// Re-export main types
pub use session_store::{ContextId, SessionStore, StoreContext, StoreEvent, StoreSubscription};
