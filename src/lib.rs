//! Dapo-Harvest: a resumable school-record harvester
//!
//! This crate walks the Dapodik regional registry (province → city → district →
//! school), keeps only the cities it was asked for, and merges each school's
//! recap figures and HTML profile into one flat CSV row. Rows are appended as
//! they are produced, so an interrupted run picks up where it stopped.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod region;
pub mod storage;

use thiserror::Error;

/// Main error type for Dapo-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Gave up on {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Unexpected registry payload for {url}: {message}")]
    Payload { url: String, message: String },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Dapo-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use output::RunSummary;
pub use extract::{ExtractOutcome, Extractor, FlatRecord};
pub use region::{LocatedSchool, RegionWalker};
pub use storage::{CsvStore, RecordStore};
