//! Configuration module for Dapo-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every value has a default, so running without a file harvests the six default
//! target cities from the public registry.
//!
//! # Example
//!
//! ```no_run
//! use dapo_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Writing to: {}", config.output.csv_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BackoffStrategy, Config, OutputConfig, RegistryConfig, RetryConfig, TargetConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
