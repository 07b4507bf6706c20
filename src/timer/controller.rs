//! Timer controller - the sole owner of countdown state transitions

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::store::{keys, StoreContext, StoreSubscription};

use super::{TimerDefaults, TimerMode, TimerState};

/// Owns the canonical [`TimerState`] and publishes every change to the
/// session store so that followers in other contexts converge on it.
#[derive(Debug)]
pub struct TimerController {
    state: Mutex<TimerState>,
    store: StoreContext,
    update_tx: watch::Sender<TimerState>,
    /// Keep one receiver alive to prevent channel closure
    _update_rx: watch::Receiver<TimerState>,
}

impl TimerController {
    /// Restore state from the session store (survives a controller restart
    /// within one process lifetime), falling back to the configured defaults,
    /// then publish the restored state so the store holds a complete set of
    /// keys.
    pub fn new(store: StoreContext, defaults: &TimerDefaults) -> Self {
        let state = TimerState::restore(&store, defaults);
        let (update_tx, update_rx) = watch::channel(state.clone());

        let controller = Self {
            state: Mutex::new(state),
            store,
            update_tx,
            _update_rx: update_rx,
        };
        if let Ok(state) = controller.state() {
            controller.publish(&state);
        }
        controller
    }

    /// Current state snapshot.
    pub fn state(&self) -> Result<TimerState, String> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|e| format!("failed to lock timer state: {}", e))
    }

    /// Watch channel for in-process observers.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.update_tx.subscribe()
    }

    /// Store subscription bound to the controller's own context, so the
    /// controller's own writes are filtered out.
    pub fn store_changes(&self) -> StoreSubscription {
        self.store.subscribe()
    }

    /// Apply a mutation and publish the resulting state.
    fn update<F>(&self, action: &str, apply: F) -> Result<TimerState, String>
    where
        F: FnOnce(&mut TimerState),
    {
        let mut state = self
            .state
            .lock()
            .map_err(|e| format!("failed to lock timer state: {}", e))?;

        apply(&mut state);
        let new_state = state.clone();
        drop(state); // Release the lock before publishing

        debug!("applied {}: {:?} {}s running={}",
               action, new_state.mode, new_state.time_left_seconds, new_state.is_running);
        self.publish(&new_state);
        Ok(new_state)
    }

    /// Serialize the full state to the session store and the watch channel.
    fn publish(&self, state: &TimerState) {
        self.store.write(keys::MODE, state.mode.as_str());
        self.store
            .write(keys::TIME_LEFT_SECONDS, state.time_left_seconds.to_string());
        self.store.write(keys::IS_RUNNING, state.is_running.to_string());
        self.store
            .write(keys::COMPLETED_SESSIONS, state.completed_sessions.to_string());
        self.store.write(keys::CURRENT_TASK, state.current_task.clone());
        self.store
            .write(keys::WORK_MINUTES, state.work_minutes.to_string());
        self.store
            .write(keys::SHORT_BREAK_MINUTES, state.short_break_minutes.to_string());
        self.store
            .write(keys::LONG_BREAK_MINUTES, state.long_break_minutes.to_string());
        self.store
            .write(keys::AUDIO_PLAYING, state.audio_playing.to_string());

        if let Err(e) = self.update_tx.send(state.clone()) {
            warn!("failed to send timer update: {}", e);
        }
    }

    /// Start the countdown. No-op when already running or already at zero.
    pub fn start(&self) -> Result<TimerState, String> {
        self.update("start", |state| {
            if !state.is_running && state.time_left_seconds > 0 {
                state.is_running = true;
            }
        })
    }

    /// Pause the countdown. Idempotent.
    pub fn pause(&self) -> Result<TimerState, String> {
        self.update("pause", |state| {
            state.is_running = false;
        })
    }

    /// Stop and reload the current mode's configured duration.
    pub fn reset(&self) -> Result<TimerState, String> {
        self.update("reset", |state| {
            state.is_running = false;
            state.time_left_seconds = state.duration_seconds_for(state.mode);
        })
    }

    /// Switch to `mode`, stopped, with its configured duration loaded.
    pub fn switch_mode(&self, mode: TimerMode) -> Result<TimerState, String> {
        info!("switching mode to {}", mode);
        self.update("switch-mode", |state| {
            state.enter_mode(mode);
        })
    }

    /// Advance the countdown by one second.
    ///
    /// A tick that arrives after the running flag went false must no-op:
    /// pausing cancels pending ticks by flipping the flag, not by cancelling
    /// the callback. Reaching zero runs phase completion and leaves the next
    /// phase paused.
    pub fn tick(&self) -> Result<TimerState, String> {
        let before = self.state()?;
        if !before.is_running {
            return Ok(before);
        }

        let after = self.update("tick", |state| {
            if !state.is_running {
                return;
            }
            state.time_left_seconds = state.time_left_seconds.saturating_sub(1);
            if state.time_left_seconds == 0 {
                state.complete_phase();
            }
        })?;

        if after.mode != before.mode {
            info!(
                "{} phase complete, next up: {} ({} sessions done)",
                before.mode, after.mode, after.completed_sessions
            );
        }
        Ok(after)
    }

    /// Update the free-text task label.
    pub fn set_task(&self, task: impl Into<String>) -> Result<TimerState, String> {
        let task = task.into();
        self.update("set-task", |state| {
            state.current_task = task;
        })
    }

    /// Change the configured duration for `mode`. Editing the active mode's
    /// duration does not touch the running countdown; the new value applies
    /// on the next reset or mode entry.
    pub fn set_duration(&self, mode: TimerMode, minutes: u64) -> Result<TimerState, String> {
        if minutes == 0 {
            return Err(format!("duration for {} must be at least one minute", mode));
        }
        self.update("set-duration", |state| match mode {
            TimerMode::Work => state.work_minutes = minutes,
            TimerMode::ShortBreak => state.short_break_minutes = minutes,
            TimerMode::LongBreak => state.long_break_minutes = minutes,
        })
    }

    /// Toggle break audio from the controller's own surface. Work mode keeps
    /// the flag pinned to false.
    pub fn set_audio_playing(&self, playing: bool) -> Result<TimerState, String> {
        self.update("set-audio", |state| {
            state.audio_playing = playing && state.mode.is_break();
        })
    }

    /// Absorb a foreign store write so the controller's view stays consistent
    /// with changes made through the mirror. Only the audio flag is accepted:
    /// everything else in the store is controller-owned, and a foreign write
    /// to those keys (a second controller racing on the same store) is a
    /// documented last-writer-wins situation we do not referee.
    pub fn apply_store_change(&self, key: &str, value: &str) -> Result<(), String> {
        if key != keys::AUDIO_PLAYING {
            debug!("ignoring foreign store change for {}", key);
            return Ok(());
        }
        let playing = value == "true";
        self.update("absorb-audio", |state| {
            state.audio_playing = playing && state.mode.is_break();
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionStore;

    fn controller() -> TimerController {
        let store = SessionStore::new();
        TimerController::new(store.context(), &TimerDefaults::default())
    }

    #[test]
    fn start_pause_reset() {
        let ctrl = controller();

        let state = ctrl.start().unwrap();
        assert!(state.is_running);

        // start is a no-op when already running
        let state = ctrl.start().unwrap();
        assert!(state.is_running);

        let state = ctrl.tick().unwrap();
        assert_eq!(state.time_left_seconds, 25 * 60 - 1);

        let state = ctrl.pause().unwrap();
        assert!(!state.is_running);
        // pause is idempotent
        let state = ctrl.pause().unwrap();
        assert!(!state.is_running);

        let state = ctrl.reset().unwrap();
        assert_eq!(state.time_left_seconds, 25 * 60);
        assert!(!state.is_running);
    }

    #[test]
    fn ticks_are_monotonically_non_increasing() {
        let ctrl = controller();
        ctrl.switch_mode(TimerMode::ShortBreak).unwrap();
        ctrl.start().unwrap();

        // 5 min break: every tick up to the completion boundary moves the
        // countdown down by one, never up, never below zero.
        let mut last = ctrl.state().unwrap().time_left_seconds;
        for _ in 0..299 {
            let state = ctrl.tick().unwrap();
            assert!(state.time_left_seconds <= last);
            assert!(state.is_running);
            last = state.time_left_seconds;
        }

        // The 300th tick exhausts the break and hands over to work, paused.
        let state = ctrl.tick().unwrap();
        assert_eq!(state.mode, TimerMode::Work);
        assert!(!state.is_running);

        // Further ticks are no-ops while paused.
        let again = ctrl.tick().unwrap();
        assert_eq!(again, state);
    }

    #[test]
    fn tick_after_pause_is_a_no_op() {
        let ctrl = controller();
        ctrl.start().unwrap();
        ctrl.tick().unwrap();
        ctrl.pause().unwrap();

        let before = ctrl.state().unwrap();
        let after = ctrl.tick().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn full_work_session_completes_exactly_once() {
        let ctrl = controller();
        ctrl.start().unwrap();

        for _ in 0..1500 {
            ctrl.tick().unwrap();
        }

        let state = ctrl.state().unwrap();
        assert_eq!(state.completed_sessions, 1);
        assert_eq!(state.mode, TimerMode::ShortBreak);
        assert_eq!(state.time_left_seconds, state.short_break_minutes * 60);
        assert!(!state.is_running);
    }

    #[test]
    fn switch_mode_always_reloads_duration_and_stops() {
        let ctrl = controller();
        ctrl.start().unwrap();
        ctrl.tick().unwrap();

        let state = ctrl.switch_mode(TimerMode::LongBreak).unwrap();
        assert_eq!(state.mode, TimerMode::LongBreak);
        assert_eq!(state.time_left_seconds, state.long_break_minutes * 60);
        assert!(!state.is_running);

        let state = ctrl.switch_mode(TimerMode::Work).unwrap();
        assert_eq!(state.time_left_seconds, state.work_minutes * 60);
        assert!(!state.is_running);
    }

    #[test]
    fn switching_to_work_forces_audio_off() {
        let ctrl = controller();
        ctrl.switch_mode(TimerMode::ShortBreak).unwrap();
        let state = ctrl.set_audio_playing(true).unwrap();
        assert!(state.audio_playing);

        let state = ctrl.switch_mode(TimerMode::Work).unwrap();
        assert!(!state.audio_playing);

        // And it cannot be re-enabled while in work mode.
        let state = ctrl.set_audio_playing(true).unwrap();
        assert!(!state.audio_playing);
    }

    #[test]
    fn duration_edit_does_not_touch_active_countdown() {
        let ctrl = controller();
        ctrl.start().unwrap();
        ctrl.tick().unwrap();
        let before = ctrl.state().unwrap().time_left_seconds;

        let state = ctrl.set_duration(TimerMode::Work, 50).unwrap();
        assert_eq!(state.work_minutes, 50);
        assert_eq!(state.time_left_seconds, before);

        // The new duration applies on explicit reset.
        let state = ctrl.reset().unwrap();
        assert_eq!(state.time_left_seconds, 50 * 60);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let ctrl = controller();
        assert!(ctrl.set_duration(TimerMode::Work, 0).is_err());
    }

    #[test]
    fn start_at_zero_is_a_no_op() {
        // An exhausted countdown can only be observed through a restored
        // store value; normal completion reloads the next phase's duration.
        let store = SessionStore::new();
        store.context().write(keys::TIME_LEFT_SECONDS, "0");

        let ctrl = TimerController::new(store.context(), &TimerDefaults::default());
        let state = ctrl.start().unwrap();
        assert!(!state.is_running);
        assert_eq!(state.time_left_seconds, 0);
    }

    #[test]
    fn restores_published_state_in_a_fresh_context() {
        let store = SessionStore::new();
        let defaults = TimerDefaults::default();
        let ctrl = TimerController::new(store.context(), &defaults);

        ctrl.set_task("write the report").unwrap();
        ctrl.set_duration(TimerMode::ShortBreak, 7).unwrap();
        ctrl.start().unwrap();
        for _ in 0..10 {
            ctrl.tick().unwrap();
        }
        let published = ctrl.state().unwrap();

        let restored = TimerState::restore(&store.context(), &defaults);
        assert_eq!(restored, published);
    }

    #[tokio::test]
    async fn absorbs_foreign_audio_writes_only() {
        let store = SessionStore::new();
        let ctrl = TimerController::new(store.context(), &TimerDefaults::default());
        ctrl.switch_mode(TimerMode::LongBreak).unwrap();

        let mut changes = ctrl.store_changes();
        let foreign = store.context();
        foreign.write(keys::AUDIO_PLAYING, "true");
        foreign.write(keys::TIME_LEFT_SECONDS, "1");

        while let Some(event) = changes.changed().await {
            ctrl.apply_store_change(&event.key, &event.value).unwrap();
            if event.key == keys::TIME_LEFT_SECONDS {
                break;
            }
        }

        let state = ctrl.state().unwrap();
        assert!(state.audio_playing);
        // Controller-owned fields ignore foreign writes.
        assert_eq!(state.time_left_seconds, state.long_break_minutes * 60);
    }
}
