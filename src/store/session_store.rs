//! Session-scoped key-value store with cross-context change notification

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Identifies one execution context (controller, mirror, test harness).
pub type ContextId = u64;

/// A single key change, stamped with the context that wrote it.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub writer: ContextId,
    pub key: String,
    pub value: String,
}

/// Process-wide, session-scoped key-value store.
///
/// All values are plain strings. Writes are immediately visible to subsequent
/// reads from any context; change notifications are delivered to *other*
/// contexts only, asynchronously, with no cross-context ordering guarantee.
#[derive(Debug)]
pub struct SessionStore {
    values: Mutex<HashMap<String, String>>,
    change_tx: broadcast::Sender<StoreEvent>,
    next_context: AtomicU64,
}

impl SessionStore {
    /// Create a new empty store. State lives only as long as the process.
    pub fn new() -> Arc<Self> {
        let (change_tx, _) = broadcast::channel(256);
        Arc::new(Self {
            values: Mutex::new(HashMap::new()),
            change_tx,
            next_context: AtomicU64::new(1),
        })
    }

    /// Hand out a context handle with a fresh identity.
    pub fn context(self: &Arc<Self>) -> StoreContext {
        StoreContext {
            id: self.next_context.fetch_add(1, Ordering::Relaxed),
            store: Arc::clone(self),
        }
    }
}

/// Per-component handle on the shared store.
///
/// Writes made through a context are filtered out of that same context's
/// subscription, mirroring how browser storage events are only delivered to
/// other tabs, never the writer.
#[derive(Debug, Clone)]
pub struct StoreContext {
    id: ContextId,
    store: Arc<SessionStore>,
}

impl StoreContext {
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Persist a value, overwriting any prior one, and notify other contexts.
    pub fn write(&self, key: &str, value: impl Into<String>) {
        let value = value.into();

        match self.store.values.lock() {
            Ok(mut values) => {
                values.insert(key.to_string(), value.clone());
            }
            Err(poisoned) => {
                // The map holds only plain strings, so a poisoned lock cannot
                // leave a half-written value behind.
                poisoned.into_inner().insert(key.to_string(), value.clone());
            }
        }

        // No receivers is fine: nobody has subscribed yet.
        let _ = self.store.change_tx.send(StoreEvent {
            writer: self.id,
            key: key.to_string(),
            value,
        });
    }

    /// Last written value under `key`, or `None` if never written.
    pub fn read(&self, key: &str) -> Option<String> {
        match self.store.values.lock() {
            Ok(values) => values.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    /// Read a `u64`, falling back to `default` when absent or malformed.
    pub fn read_u64_or(&self, key: &str, default: u64) -> u64 {
        self.read_parsed_or(key, default)
    }

    /// Read a `u32`, falling back to `default` when absent or malformed.
    pub fn read_u32_or(&self, key: &str, default: u32) -> u32 {
        self.read_parsed_or(key, default)
    }

    /// Read a boolean stored as "true"/"false". Anything else is the default.
    pub fn read_bool_or(&self, key: &str, default: bool) -> bool {
        match self.read(key).as_deref() {
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                debug!("malformed boolean under {key}: {other:?}, using default");
                default
            }
            None => default,
        }
    }

    /// Read a JSON-encoded value, falling back to `default` when absent or
    /// unparseable.
    pub fn read_json_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read(key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    debug!("malformed JSON under {key}: {e}, using default");
                    default
                }
            },
            None => default,
        }
    }

    fn read_parsed_or<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.read(key) {
            Some(raw) => match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    debug!("malformed value under {key}: {raw:?}, using default");
                    default
                }
            },
            None => default,
        }
    }

    /// Subscribe to changes written by *other* contexts.
    pub fn subscribe(&self) -> StoreSubscription {
        StoreSubscription {
            own: self.id,
            rx: self.store.change_tx.subscribe(),
        }
    }
}

/// Change stream for one context, with the context's own writes filtered out.
#[derive(Debug)]
pub struct StoreSubscription {
    own: ContextId,
    rx: broadcast::Receiver<StoreEvent>,
}

impl StoreSubscription {
    /// Wait for the next change made by another context.
    ///
    /// Returns `None` once the store has been dropped. Lagged receivers skip
    /// the missed events and keep going: followers re-read the full state on
    /// every notification, so dropped events only delay convergence until the
    /// next one (or the poll fallback).
    pub async fn changed(&mut self) -> Option<StoreEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.writer == self.own => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("store subscription lagged, skipped {skipped} events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
