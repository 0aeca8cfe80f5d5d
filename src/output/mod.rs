//! Output module for run summaries and sink statistics
//!
//! This module handles:
//! - Recording what a harvest run did
//! - Summarizing the rows already in a CSV sink

pub mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, SinkStatistics};
pub use summary::RunSummary;
