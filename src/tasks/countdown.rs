//! Countdown background task

use std::{sync::Arc, time::Duration};

use tokio::time::interval;
use tracing::{error, info, warn};

use crate::app::AppState;

/// Background task that drives the controller's countdown.
///
/// Fires `tick()` once per elapsed second; the tick itself no-ops when the
/// running flag is down, so pause and reset cancel pending ticks without the
/// task ever being restarted. Between ticks the task absorbs foreign store
/// writes (the mirror's audio toggle) so the controller's view stays
/// consistent. Ticks and absorptions are strictly sequential within this
/// task: two ticks can never interleave.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("starting countdown task");

    let mut store_changes = state.controller.store_changes();
    let mut ticker = interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = state.controller.tick() {
                    error!("countdown tick failed: {}", e);
                }
            }
            event = store_changes.changed() => {
                match event {
                    Some(event) => {
                        if let Err(e) = state.controller.apply_store_change(&event.key, &event.value) {
                            error!("failed to absorb store change for {}: {}", event.key, e);
                        }
                    }
                    None => {
                        warn!("session store closed, countdown continues without absorption");
                        break;
                    }
                }
            }
        }
    }

    // Store gone (shutdown in progress); keep ticking until the task is
    // dropped with the runtime.
    loop {
        ticker.tick().await;
        if let Err(e) = state.controller.tick() {
            error!("countdown tick failed: {}", e);
        }
    }
}
