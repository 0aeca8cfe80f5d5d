//! Harvest coordinator - main crawl orchestration logic
//!
//! This module contains the main loop that ties the pieces together:
//! - Initializing the record store and loading already-harvested ids
//! - Pulling eligible schools from the region walker
//! - Skipping schools that are already in the store
//! - Extracting and appending new records one at a time
//! - Logging progress and producing the run summary

use crate::config::Config;
use crate::crawler::{Fetcher, RetryPolicy};
use crate::extract::{ExtractOutcome, Extractor};
use crate::output::RunSummary;
use crate::region::RegionWalker;
use crate::storage::{CsvStore, RecordStore};
use crate::Result;
use std::collections::HashSet;

/// How often a progress line is logged, in eligible schools
const PROGRESS_INTERVAL: u64 = 25;

/// Main harvest coordinator
pub struct Coordinator<S: RecordStore> {
    config: Config,
    fetcher: Fetcher,
    store: S,
    processed: HashSet<String>,
}

impl Coordinator<CsvStore> {
    /// Creates a coordinator writing to the configured CSV sink
    pub fn new(config: Config) -> Result<Self> {
        let store = CsvStore::new(&config.output.csv_path);
        Self::with_store(config, store)
    }
}

impl<S: RecordStore> Coordinator<S> {
    /// Creates a coordinator around any record store
    ///
    /// The store is initialized and its existing ids are loaded here, so a
    /// sink problem surfaces before any request is made.
    pub fn with_store(config: Config, mut store: S) -> Result<Self> {
        let fetcher = Fetcher::new(&config.registry, RetryPolicy::from_config(&config.retry))?;

        store.ensure_initialized()?;
        let processed = store.load_processed_ids()?;
        tracing::info!("Resuming with {} schools already harvested", processed.len());

        Ok(Self {
            config,
            fetcher,
            store,
            processed,
        })
    }

    /// Ids already in the store, including the ones appended by this run
    pub fn processed(&self) -> &HashSet<String> {
        &self.processed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the walk to completion
    ///
    /// Schools that fail to extract are logged and left out; they will be
    /// tried again on the next run. Only store failures abort the run.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::start();
        let mut walker = RegionWalker::new(&self.fetcher, &self.config.targets)?;
        let extractor = Extractor::new(&self.fetcher, &self.config.registry.profile_base_url);

        tracing::info!("Target cities: {:?}", self.config.targets.cities);

        while let Some(located) = walker.next_school().await {
            summary.schools_eligible += 1;

            if self.processed.contains(&located.school.id) {
                tracing::debug!("Already harvested: {}", located.school.name);
                summary.already_processed += 1;
                continue;
            }

            tracing::info!("      > Scrape: {}", located.school.name);
            match extractor.extract(&located).await {
                ExtractOutcome::Extracted(record) => {
                    self.store.append(&record)?;
                    self.processed.insert(record.id().to_string());
                    summary.extracted += 1;
                }
                ExtractOutcome::Skipped(reason) => {
                    tracing::warn!(
                        "      [ERR] Failed to scrape {} ({}): {}",
                        located.school.name,
                        located.school.id,
                        reason
                    );
                    summary.skipped += 1;
                }
            }

            if summary.schools_eligible % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} eligible, {} new, {} already harvested, {} failed",
                    summary.schools_eligible,
                    summary.extracted,
                    summary.already_processed,
                    summary.skipped
                );
            }
        }

        summary.finish(walker.stats().clone());
        Ok(summary)
    }
}

/// Runs a complete harvest with the CSV sink from `config`
pub async fn run_harvest(config: Config) -> Result<RunSummary> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
