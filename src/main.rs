//! Focus Relay - A state-managed HTTP server running a pomodoro timer
//!
//! This is the main entry point for the focus-relay application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use focus_relay::{
    api::create_router,
    app::AppState,
    config::Config,
    store::SessionStore,
    tasks::{countdown_task, mirror_sync_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "focus_relay={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting focus-relay v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, work={}min, short_break={}min, long_break={}min, poll={}ms",
        config.host, config.port, config.work, config.short_break, config.long_break, config.poll_ms
    );

    // One session store for the whole process; the controller and the mirror
    // each get their own context so neither hears its own writes.
    let store = SessionStore::new();
    let state = Arc::new(AppState::new(&config, &store));

    // Start the countdown driver
    let countdown_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(countdown_state).await;
    });

    // Start the mirror sync loop
    let mirror_state = Arc::clone(&state);
    let poll_interval = config.poll_interval();
    tokio::spawn(async move {
        mirror_sync_task(mirror_state, poll_interval).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start          - Start the countdown");
    info!("  POST /timer/pause          - Pause the countdown");
    info!("  POST /timer/reset          - Reset the current phase");
    info!("  POST /timer/mode/:mode     - Switch phase (work, short_break, long_break)");
    info!("  POST /timer/task           - Update the task label");
    info!("  POST /timer/duration/:mode - Change a configured duration");
    info!("  POST /audio/play           - Start break audio");
    info!("  POST /audio/stop           - Stop break audio");
    info!("  POST /mirror/position      - Relocate the mirror overlay");
    info!("  GET  /status               - Controller view and server status");
    info!("  GET  /mirror               - Mirror view");
    info!("  GET  /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
