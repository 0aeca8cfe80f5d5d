//! Run summary
//!
//! Counters for one harvest run, filled in by the coordinator and logged at
//! the end.

use crate::region::WalkStats;
use chrono::{DateTime, Utc};

/// What a single run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Traversal counters from the region walker
    pub walk: WalkStats,

    /// Schools that passed the form and status filters
    pub schools_eligible: u64,

    /// Eligible schools skipped because the sink already had them
    pub already_processed: u64,

    /// Rows appended by this run
    pub extracted: u64,

    /// Schools whose profile or recap could not be used
    pub skipped: u64,
}

impl RunSummary {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            walk: WalkStats::default(),
            schools_eligible: 0,
            already_processed: 0,
            extracted: 0,
            skipped: 0,
        }
    }

    pub fn finish(&mut self, walk: WalkStats) {
        self.walk = walk;
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Harvest finished ===");
        if let Some(seconds) = self.duration_seconds() {
            tracing::info!("Duration: {}s", seconds);
        }
        tracing::info!(
            "Regions: {} provinces, {} cities matched ({} pruned), {} districts",
            self.walk.provinces,
            self.walk.cities_matched,
            self.walk.cities_pruned,
            self.walk.districts
        );
        tracing::info!(
            "Schools: {} listed, {} filtered out, {} eligible",
            self.walk.schools_listed,
            self.walk.schools_filtered,
            self.schools_eligible
        );
        tracing::info!(
            "Records: {} new, {} already harvested, {} failed",
            self.extracted,
            self.already_processed,
            self.skipped
        );
        if self.walk.lists_failed > 0 {
            tracing::warn!(
                "{} region lists could not be fetched; their schools were not visited",
                self.walk.lists_failed
            );
        }
    }
}
