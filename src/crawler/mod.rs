//! Crawler module for registry fetching and harvest coordination
//!
//! This module contains the request layer and the main loop:
//! - Structured query construction for the `/rekap` endpoints
//! - HTTP fetching with retry and anti-bot detection
//! - Retry policies
//! - Overall harvest coordination

mod coordinator;
mod fetcher;
mod query;
mod retry;

pub use coordinator::{run_harvest, Coordinator};
pub use fetcher::{build_http_client, is_html_document, AttemptFailure, Fetcher};
pub use query::{RegistryQuery, DISTRICT_LEVEL, ROOT_REGION_CODE};
pub use retry::{Backoff, RetryPolicy};

use crate::config::Config;
use crate::output::RunSummary;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for starting a harvest. It will:
/// 1. Open the CSV sink and load the ids already in it
/// 2. Build the HTTP client
/// 3. Walk the registry down to the target cities' schools
/// 4. Extract and append every school not yet harvested
pub async fn crawl(config: Config) -> Result<RunSummary, HarvestError> {
    run_harvest(config).await
}
