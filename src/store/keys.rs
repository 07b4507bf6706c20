//! Well-known session store keys
//!
//! Every persisted value is string-encoded under one of these keys. Absent or
//! unparseable values always fall back to a hardcoded default on read.

pub const MODE: &str = "pomodoro_mode";
pub const TIME_LEFT_SECONDS: &str = "pomodoro_time_left";
pub const IS_RUNNING: &str = "pomodoro_is_running";
pub const COMPLETED_SESSIONS: &str = "pomodoro_completed_sessions";
pub const CURRENT_TASK: &str = "pomodoro_current_task";
pub const WORK_MINUTES: &str = "pomodoro_work_minutes";
pub const SHORT_BREAK_MINUTES: &str = "pomodoro_short_break_minutes";
pub const LONG_BREAK_MINUTES: &str = "pomodoro_long_break_minutes";
pub const AUDIO_PLAYING: &str = "pomodoro_audio_playing";
pub const MIRROR_POSITION: &str = "pomodoro_mirror_position";
