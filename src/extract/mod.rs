//! Record extraction for a single school
//!
//! This module handles:
//! - Fetching the school's HTML profile page and parsing it into sections
//! - Fetching the school's recap figures from the detail endpoint
//! - Merging both into one [`FlatRecord`]
//!
//! Failures are returned as [`ExtractOutcome::Skipped`] so the caller decides
//! what to do with a school that could not be read.

pub mod columns;
mod profile;
mod recap;

pub use columns::{headers, Column, FlatRecord, Source, COLUMNS, ID_COLUMN};
pub use profile::{parse_profile, ProfileSections, Section};
pub use recap::{Figure, RecapError, RecapFigures, RoomCounts};

use crate::crawler::{Fetcher, RegistryQuery};
use crate::region::LocatedSchool;
use crate::HarvestError;
use thiserror::Error;
use url::Url;

/// Why a school produced no record
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("could not build profile URL: {0}")]
    ProfileUrl(#[from] url::ParseError),

    #[error("profile page unusable: {0}")]
    Profile(String),

    #[error("recap figures unusable: {0}")]
    Recap(#[from] RecapError),

    #[error("{0}")]
    Upstream(#[from] HarvestError),
}

/// Result of extracting one school
#[derive(Debug)]
pub enum ExtractOutcome {
    Extracted(FlatRecord),
    Skipped(SkipReason),
}

impl ExtractOutcome {
    pub fn record(&self) -> Option<&FlatRecord> {
        match self {
            Self::Extracted(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }
}

/// Builds flat records from the profile page and the recap endpoint
pub struct Extractor<'a> {
    fetcher: &'a Fetcher,
    profile_base_url: String,
}

impl<'a> Extractor<'a> {
    pub fn new(fetcher: &'a Fetcher, profile_base_url: &str) -> Self {
        Self {
            fetcher,
            profile_base_url: profile_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Profile page URL for an encrypted school id
    pub fn profile_url(&self, encrypted_id: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.profile_base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["sekolah", encrypted_id]);
        Ok(url)
    }

    /// Extracts one school, never failing outright
    pub async fn extract(&self, school: &LocatedSchool) -> ExtractOutcome {
        match self.try_extract(school).await {
            Ok(record) => ExtractOutcome::Extracted(record),
            Err(reason) => ExtractOutcome::Skipped(reason),
        }
    }

    async fn try_extract(&self, school: &LocatedSchool) -> Result<FlatRecord, SkipReason> {
        let id = school.school.id.as_str();

        let url = self.profile_url(id)?;
        let html = self.fetcher.fetch_document(url.as_str()).await?;
        let profile = parse_profile(&html).map_err(SkipReason::Profile)?;

        let payload = self
            .fetcher
            .fetch_structured(&RegistryQuery::school_detail(id))
            .await?;
        let figures = RecapFigures::from_detail(&payload)?;

        Ok(FlatRecord::build(school, &profile, &figures))
    }
}
