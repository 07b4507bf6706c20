//! End-to-end sync between the controller and the mirror through the
//! session store, with the real background tasks running.

use std::{sync::Arc, time::Duration};

use focus_relay::{
    app::AppState,
    config::Config,
    store::SessionStore,
    tasks::{countdown_task, mirror_sync_task},
    timer::TimerMode,
};

fn test_config() -> Config {
    Config {
        port: 0,
        host: "127.0.0.1".to_string(),
        work: 25,
        short_break: 5,
        long_break: 15,
        poll_ms: 20,
        verbose: false,
    }
}

#[tokio::test]
async fn mirror_converges_on_controller_publishes() {
    let store = SessionStore::new();
    let state = Arc::new(AppState::new(&test_config(), &store));

    let sync = tokio::spawn(mirror_sync_task(
        Arc::clone(&state),
        Duration::from_millis(20),
    ));

    state.controller.start().unwrap();
    state.controller.tick().unwrap();
    state.controller.tick().unwrap();

    // Give the notification (or at worst one poll cycle) time to land.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let snapshot = state.mirror.snapshot().unwrap();
    assert!(snapshot.visible());
    assert_eq!(snapshot.state.time_left_seconds, 25 * 60 - 2);
    assert!(snapshot.state.is_running);

    state.controller.pause().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!state.mirror.snapshot().unwrap().visible());

    sync.abort();
}

#[tokio::test]
async fn controller_absorbs_mirror_audio_toggle() {
    let store = SessionStore::new();
    let state = Arc::new(AppState::new(&test_config(), &store));

    let countdown = tokio::spawn(countdown_task(Arc::clone(&state)));
    let sync = tokio::spawn(mirror_sync_task(
        Arc::clone(&state),
        Duration::from_millis(20),
    ));

    state.controller.switch_mode(TimerMode::ShortBreak).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    state.mirror.set_audio_playing(true).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(state.controller.state().unwrap().audio_playing);

    // Switching back to work kills the audio on both surfaces.
    state.controller.switch_mode(TimerMode::Work).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(!state.controller.state().unwrap().audio_playing);
    assert!(!state.mirror.snapshot().unwrap().state.audio_playing);

    countdown.abort();
    sync.abort();
}
