//! Read-following mirror of the timer, plus the break audio player

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{keys, StoreContext, StoreSubscription};
use crate::timer::{TimerDefaults, TimerState};

/// On-screen position of the floating mirror, stored as JSON under its own
/// key. Position changes never interact with timer invariants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorPosition {
    pub x: i64,
    pub y: i64,
}

/// What the mirror currently shows: the followed timer state and where the
/// overlay sits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MirrorSnapshot {
    pub state: TimerState,
    pub position: MirrorPosition,
}

impl MirrorSnapshot {
    /// The mirror is hidden unless a session is actually in progress.
    pub fn visible(&self) -> bool {
        self.state.is_running
    }
}

/// Secondary view of the timer. Never decrements `time_left_seconds` itself
/// and never writes `mode`, `time_left_seconds`, or `is_running`; its only
/// writes are the audio flag and its own position.
#[derive(Debug)]
pub struct MirrorDisplay {
    snapshot: Mutex<MirrorSnapshot>,
    store: StoreContext,
    defaults: TimerDefaults,
}

impl MirrorDisplay {
    pub fn new(store: StoreContext, defaults: TimerDefaults) -> Self {
        let snapshot = MirrorSnapshot {
            state: TimerState::restore(&store, &defaults),
            position: store.read_json_or(keys::MIRROR_POSITION, MirrorPosition::default()),
        };
        Self {
            snapshot: Mutex::new(snapshot),
            store,
            defaults,
        }
    }

    /// Re-read the full timer state and position from the store and apply
    /// them. Called on every store change notification and on the poll
    /// fallback; purely reflects the controller's last published values.
    pub fn refresh(&self) -> Result<MirrorSnapshot, String> {
        let state = TimerState::restore(&self.store, &self.defaults);
        let position = self
            .store
            .read_json_or(keys::MIRROR_POSITION, MirrorPosition::default());

        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|e| format!("failed to lock mirror snapshot: {}", e))?;
        snapshot.state = state;
        snapshot.position = position;
        Ok(snapshot.clone())
    }

    /// Current view without touching the store.
    pub fn snapshot(&self) -> Result<MirrorSnapshot, String> {
        self.snapshot
            .lock()
            .map(|snapshot| snapshot.clone())
            .map_err(|e| format!("failed to lock mirror snapshot: {}", e))
    }

    /// Store subscription bound to the mirror's own context.
    pub fn store_changes(&self) -> StoreSubscription {
        self.store.subscribe()
    }

    /// Start or stop break audio. Playback is only permitted during breaks;
    /// the flag is persisted back through the store so the controller's own
    /// view converges on it.
    pub fn set_audio_playing(&self, playing: bool) -> Result<MirrorSnapshot, String> {
        let snapshot = {
            let mut snapshot = self
                .snapshot
                .lock()
                .map_err(|e| format!("failed to lock mirror snapshot: {}", e))?;
            if playing && !snapshot.state.mode.is_break() {
                return Err("audio playback is only available during breaks".to_string());
            }
            snapshot.state.audio_playing = playing;
            snapshot.clone()
        };

        debug!("mirror audio playing: {}", playing);
        self.store.write(keys::AUDIO_PLAYING, playing.to_string());
        Ok(snapshot)
    }

    /// Relocate the overlay. Independent UI state, synced across contexts by
    /// the same store mechanism as everything else.
    pub fn set_position(&self, x: i64, y: i64) -> Result<MirrorSnapshot, String> {
        let position = MirrorPosition { x, y };
        let snapshot = {
            let mut snapshot = self
                .snapshot
                .lock()
                .map_err(|e| format!("failed to lock mirror snapshot: {}", e))?;
            snapshot.position = position;
            snapshot.clone()
        };

        let encoded = serde_json::to_string(&position)
            .map_err(|e| format!("failed to encode mirror position: {}", e))?;
        self.store.write(keys::MIRROR_POSITION, encoded);
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionStore;
    use crate::timer::{TimerController, TimerMode};

    fn pair() -> (TimerController, MirrorDisplay) {
        let store = SessionStore::new();
        let defaults = TimerDefaults::default();
        let controller = TimerController::new(store.context(), &defaults);
        let mirror = MirrorDisplay::new(store.context(), defaults);
        (controller, mirror)
    }

    #[test]
    fn follows_the_controller_without_ticking_itself() {
        let (controller, mirror) = pair();
        controller.start().unwrap();
        controller.tick().unwrap();
        controller.tick().unwrap();

        let seen = mirror.refresh().unwrap();
        assert_eq!(seen.state.time_left_seconds, 25 * 60 - 2);

        // Repeated refreshes without controller ticks change nothing: the
        // mirror has no clock of its own.
        for _ in 0..10 {
            let again = mirror.refresh().unwrap();
            assert_eq!(again.state.time_left_seconds, 25 * 60 - 2);
        }
    }

    #[test]
    fn reflects_a_foreign_time_write_verbatim() {
        let store = SessionStore::new();
        let defaults = TimerDefaults::default();
        let mirror = MirrorDisplay::new(store.context(), defaults);

        store.context().write(keys::TIME_LEFT_SECONDS, "120");
        let seen = mirror.refresh().unwrap();
        assert_eq!(seen.state.time_left_seconds, 120);
    }

    #[test]
    fn hidden_unless_running() {
        let (controller, mirror) = pair();
        assert!(!mirror.refresh().unwrap().visible());

        controller.start().unwrap();
        assert!(mirror.refresh().unwrap().visible());

        controller.pause().unwrap();
        assert!(!mirror.refresh().unwrap().visible());
    }

    #[test]
    fn audio_gated_to_break_modes() {
        let (controller, mirror) = pair();

        // Work mode: playback denied.
        mirror.refresh().unwrap();
        assert!(mirror.set_audio_playing(true).is_err());

        controller.switch_mode(TimerMode::ShortBreak).unwrap();
        mirror.refresh().unwrap();
        let snapshot = mirror.set_audio_playing(true).unwrap();
        assert!(snapshot.state.audio_playing);

        // The flag is persisted for the controller to absorb.
        let seen = controller.state().unwrap();
        assert!(!seen.audio_playing); // not yet, absorption is event-driven
        controller
            .apply_store_change(keys::AUDIO_PLAYING, "true")
            .unwrap();
        assert!(controller.state().unwrap().audio_playing);

        // Stopping is always allowed.
        let snapshot = mirror.set_audio_playing(false).unwrap();
        assert!(!snapshot.state.audio_playing);
    }

    #[test]
    fn audio_writes_leave_timer_fields_alone() {
        let (controller, mirror) = pair();
        controller.switch_mode(TimerMode::LongBreak).unwrap();
        controller.start().unwrap();
        controller.tick().unwrap();
        let before = controller.state().unwrap();

        mirror.refresh().unwrap();
        mirror.set_audio_playing(true).unwrap();
        mirror.set_position(40, 80).unwrap();

        let seen = mirror.refresh().unwrap();
        assert_eq!(seen.state.mode, before.mode);
        assert_eq!(seen.state.time_left_seconds, before.time_left_seconds);
        assert_eq!(seen.state.is_running, before.is_running);
    }

    #[test]
    fn position_round_trips_through_the_store() {
        let store = SessionStore::new();
        let defaults = TimerDefaults::default();
        let mirror = MirrorDisplay::new(store.context(), defaults.clone());

        mirror.set_position(-12, 300).unwrap();

        // A second mirror in a fresh context picks the position up.
        let other = MirrorDisplay::new(store.context(), defaults);
        let seen = other.refresh().unwrap();
        assert_eq!(seen.position, MirrorPosition { x: -12, y: 300 });
    }

    #[test]
    fn malformed_position_falls_back_to_origin() {
        let store = SessionStore::new();
        store.context().write(keys::MIRROR_POSITION, "not json");

        let mirror = MirrorDisplay::new(store.context(), TimerDefaults::default());
        assert_eq!(mirror.snapshot().unwrap().position, MirrorPosition::default());
    }
}
