//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::timer::TimerDefaults;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "focus-relay")]
#[command(about = "A state-managed HTTP server running a pomodoro timer with a mirrored display")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20661")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Default work session duration in minutes
    #[arg(long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..))]
    pub work: u64,

    /// Default short break duration in minutes
    #[arg(long = "short-break", default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub short_break: u64,

    /// Default long break duration in minutes
    #[arg(long = "long-break", default_value = "15", value_parser = clap::value_parser!(u64).range(1..))]
    pub long_break: u64,

    /// Mirror poll fallback interval in milliseconds
    #[arg(long = "poll-ms", default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Default durations handed to the timer and the mirror
    pub fn timer_defaults(&self) -> TimerDefaults {
        TimerDefaults {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
        }
    }

    /// Mirror poll fallback interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}
