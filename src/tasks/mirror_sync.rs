//! Mirror sync background task

use std::{sync::Arc, time::Duration};

use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::app::AppState;

/// Background task that keeps the mirror display converged on the
/// controller's published state.
///
/// The primary path is subscription-driven: every store change written by
/// another context triggers a full re-read. The fixed-interval poll is the
/// explicit fallback for missed notifications (a lagged subscription), not an
/// independent clock; a refresh never advances the countdown, whichever arm
/// fired. When both fire near-simultaneously the refreshes are identical
/// reads of the same store, so precedence does not matter.
pub async fn mirror_sync_task(state: Arc<AppState>, poll_interval: Duration) {
    info!(
        "starting mirror sync task (poll fallback every {}ms)",
        poll_interval.as_millis()
    );

    let mut store_changes = state.mirror.store_changes();
    let mut poller = interval(poll_interval);

    loop {
        tokio::select! {
            event = store_changes.changed() => {
                match event {
                    Some(event) => {
                        debug!("mirror refresh on change to {}", event.key);
                        if let Err(e) = state.mirror.refresh() {
                            error!("mirror refresh failed: {}", e);
                        }
                    }
                    None => {
                        warn!("session store closed, mirror falls back to polling only");
                        break;
                    }
                }
            }
            _ = poller.tick() => {
                if let Err(e) = state.mirror.refresh() {
                    error!("mirror refresh failed: {}", e);
                }
            }
        }
    }

    loop {
        poller.tick().await;
        if let Err(e) = state.mirror.refresh() {
            error!("mirror refresh failed: {}", e);
        }
    }
}
