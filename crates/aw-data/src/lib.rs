//! Data sources, polling and configuration for the alert dashboard

pub mod cache;
pub mod config;
pub mod schedule;
pub mod sources;

use thiserror::Error;

// Re-exports
pub use cache::{CachedSnapshot, SnapshotCache};
pub use config::{DashboardConfig, MapConfig};
pub use schedule::{poll_once, PeriodicTask, RepaintHook, Scheduler};
pub use sources::HttpSource;

/// Errors that can occur while setting up data access
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid duration '{value}': {source}")]
    Duration {
        value: String,
        source: humantime::DurationError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
