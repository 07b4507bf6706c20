//! Pomodoro timer state and phase transitions

use serde::{Deserialize, Serialize};

use crate::store::{keys, StoreContext};

/// Timer phase. Determines the default duration and whether break audio is
/// permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// String form used in the session store and in URL paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Parse the store/path string form. Unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "work" => Some(TimerMode::Work),
            "short_break" => Some(TimerMode::ShortBreak),
            "long_break" => Some(TimerMode::LongBreak),
            _ => None,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured default durations, in minutes. All values are positive.
#[derive(Debug, Clone)]
pub struct TimerDefaults {
    pub work_minutes: u64,
    pub short_break_minutes: u64,
    pub long_break_minutes: u64,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
        }
    }
}

/// The single logical timer state shared by the controller and the mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub time_left_seconds: u64,
    pub is_running: bool,
    pub current_task: String,
    pub completed_sessions: u32,
    pub work_minutes: u64,
    pub short_break_minutes: u64,
    pub long_break_minutes: u64,
    pub audio_playing: bool,
}

impl TimerState {
    /// Fresh state in work mode with the configured durations loaded.
    pub fn with_defaults(defaults: &TimerDefaults) -> Self {
        Self {
            mode: TimerMode::Work,
            time_left_seconds: defaults.work_minutes * 60,
            is_running: false,
            current_task: String::new(),
            completed_sessions: 0,
            work_minutes: defaults.work_minutes,
            short_break_minutes: defaults.short_break_minutes,
            long_break_minutes: defaults.long_break_minutes,
            audio_playing: false,
        }
    }

    /// Rebuild the state from the session store, key by key, falling back to
    /// the configured defaults for anything absent or malformed.
    pub fn restore(store: &StoreContext, defaults: &TimerDefaults) -> Self {
        let work_minutes = store.read_u64_or(keys::WORK_MINUTES, defaults.work_minutes);
        let short_break_minutes =
            store.read_u64_or(keys::SHORT_BREAK_MINUTES, defaults.short_break_minutes);
        let long_break_minutes =
            store.read_u64_or(keys::LONG_BREAK_MINUTES, defaults.long_break_minutes);

        let mode = store
            .read(keys::MODE)
            .and_then(|v| TimerMode::parse(&v))
            .unwrap_or(TimerMode::Work);

        let mut state = Self {
            mode,
            time_left_seconds: 0,
            is_running: store.read_bool_or(keys::IS_RUNNING, false),
            current_task: store.read(keys::CURRENT_TASK).unwrap_or_default(),
            completed_sessions: store.read_u32_or(keys::COMPLETED_SESSIONS, 0),
            work_minutes,
            short_break_minutes,
            long_break_minutes,
            audio_playing: store.read_bool_or(keys::AUDIO_PLAYING, false),
        };
        state.time_left_seconds =
            store.read_u64_or(keys::TIME_LEFT_SECONDS, state.duration_seconds_for(mode));
        if state.mode == TimerMode::Work {
            state.audio_playing = false;
        }
        state
    }

    /// Configured duration for `mode`, in minutes.
    pub fn duration_minutes_for(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Configured duration for `mode`, in seconds.
    pub fn duration_seconds_for(&self, mode: TimerMode) -> u64 {
        self.duration_minutes_for(mode) * 60
    }

    /// Enter `mode`: countdown reloads to the configured duration and the
    /// timer stops. Entering work mode kills break audio.
    pub(crate) fn enter_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.is_running = false;
        self.time_left_seconds = self.duration_seconds_for(mode);
        if mode == TimerMode::Work {
            self.audio_playing = false;
        }
    }

    /// Handle the countdown reaching zero. A finished work session counts
    /// toward the four-session rule; every fourth one earns the long break.
    /// Finished breaks always return to work. The next phase starts paused.
    pub(crate) fn complete_phase(&mut self) {
        match self.mode {
            TimerMode::Work => {
                self.completed_sessions += 1;
                let next = if self.completed_sessions % 4 == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                };
                self.enter_mode(next);
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                self.enter_mode(TimerMode::Work);
            }
        }
    }

    /// Fraction of the current phase already elapsed, as a percentage.
    pub fn progress_percent(&self) -> f64 {
        let total = self.duration_seconds_for(self.mode);
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.time_left_seconds);
        (elapsed as f64 / total as f64) * 100.0
    }
}

/// Format a second count as "MM:SS".
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
