//! Region walker
//!
//! Walks province → city → district → school depth-first, one request at a
//! time, in upstream list order. Cities whose name matches no target are
//! dropped before any of their children are requested, which keeps a
//! nationwide registry down to a handful of subtrees.
//!
//! The walk is lazy: each call to [`RegionWalker::next_school`] issues only the
//! requests needed to produce the next eligible school.

use crate::config::TargetConfig;
use crate::crawler::{Fetcher, RegistryQuery};
use crate::region::filter::{CityFilter, SchoolFilter};
use crate::region::node::{LocatedSchool, RegionNode, SchoolSummary};
use crate::ConfigError;
use serde_json::Value;
use std::collections::VecDeque;

/// Counters describing what the walk has seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub provinces: u64,
    pub cities_matched: u64,
    pub cities_pruned: u64,
    pub districts: u64,
    pub schools_listed: u64,
    pub schools_filtered: u64,
    /// Lists that could not be fetched or decoded; their subtrees were skipped
    pub lists_failed: u64,
}

/// Lazy depth-first traversal of the registry
pub struct RegionWalker<'a> {
    fetcher: &'a Fetcher,
    cities: CityFilter,
    schools: SchoolFilter,

    started: bool,
    pending_provinces: VecDeque<RegionNode>,
    pending_cities: VecDeque<RegionNode>,
    pending_districts: VecDeque<RegionNode>,
    pending_schools: VecDeque<SchoolSummary>,

    province: String,
    city: String,
    district: String,

    stats: WalkStats,
}

impl<'a> RegionWalker<'a> {
    /// Creates a walker for the configured targets
    pub fn new(fetcher: &'a Fetcher, targets: &TargetConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_filters(
            fetcher,
            CityFilter::new(&targets.cities),
            SchoolFilter::from_config(targets)?,
        ))
    }

    pub fn with_filters(fetcher: &'a Fetcher, cities: CityFilter, schools: SchoolFilter) -> Self {
        Self {
            fetcher,
            cities,
            schools,
            started: false,
            pending_provinces: VecDeque::new(),
            pending_cities: VecDeque::new(),
            pending_districts: VecDeque::new(),
            pending_schools: VecDeque::new(),
            province: String::new(),
            city: String::new(),
            district: String::new(),
            stats: WalkStats::default(),
        }
    }

    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Returns the next eligible school, or `None` once the tree is exhausted
    pub async fn next_school(&mut self) -> Option<LocatedSchool> {
        loop {
            if let Some(school) = self.pending_schools.pop_front() {
                if !self.schools.accepts(&school) {
                    tracing::trace!(
                        "Skipping {} ({} {})",
                        school.name,
                        school.education_form,
                        school.ownership
                    );
                    self.stats.schools_filtered += 1;
                    continue;
                }

                return Some(LocatedSchool {
                    school,
                    province: self.province.clone(),
                    city: self.city.clone(),
                    district: self.district.clone(),
                });
            }

            if let Some(district) = self.pending_districts.pop_front() {
                tracing::info!("    - District: {}", district.name);
                self.stats.districts += 1;
                self.pending_schools = self.list_schools(&district).await.into();
                self.stats.schools_listed += self.pending_schools.len() as u64;
                self.district = district.name;
                continue;
            }

            if let Some(city) = self.pending_cities.pop_front() {
                tracing::info!("  [MATCH] City: {}", city.name);
                self.pending_districts = self.list_children(&city).await.into();
                self.city = city.name;
                continue;
            }

            if let Some(province) = self.pending_provinces.pop_front() {
                tracing::info!("> Province: {}", province.name);
                self.stats.provinces += 1;
                let cities = self.list_children(&province).await;
                self.pending_cities = self.keep_target_cities(cities).into();
                self.province = province.name;
                continue;
            }

            if !self.started {
                self.started = true;
                let provinces = self.list_regions(&RegistryQuery::root(), 0).await;
                self.pending_provinces = provinces.into();
                continue;
            }

            return None;
        }
    }

    /// Keeps the cities that match a target; the rest are never visited
    fn keep_target_cities(&mut self, cities: Vec<RegionNode>) -> Vec<RegionNode> {
        let (matched, pruned): (Vec<_>, Vec<_>) = cities
            .into_iter()
            .partition(|city| self.cities.matches(&city.name));

        self.stats.cities_matched += matched.len() as u64;
        self.stats.cities_pruned += pruned.len() as u64;
        matched
    }

    async fn list_children(&mut self, parent: &RegionNode) -> Vec<RegionNode> {
        self.list_regions(&RegistryQuery::children_of(parent), parent.level)
            .await
    }

    /// Fetches a region list and keeps nodes exactly one level below `parent_level`
    async fn list_regions(&mut self, query: &RegistryQuery, parent_level: u8) -> Vec<RegionNode> {
        let Some(entries) = self.fetch_list(query).await else {
            return Vec::new();
        };

        let mut nodes = Vec::with_capacity(entries.len());
        for entry in &entries {
            match RegionNode::from_json(entry) {
                Some(node) if node.level == parent_level + 1 => nodes.push(node),
                Some(node) => tracing::warn!(
                    "Ignoring {} at level {} under a level {} region",
                    node.name,
                    node.level,
                    parent_level
                ),
                None => tracing::warn!("Ignoring malformed region entry: {}", entry),
            }
        }
        nodes
    }

    async fn list_schools(&mut self, district: &RegionNode) -> Vec<SchoolSummary> {
        let Some(entries) = self.fetch_list(&RegistryQuery::children_of(district)).await else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| {
                let school = SchoolSummary::from_json(entry);
                if school.is_none() {
                    tracing::warn!("Ignoring malformed school entry: {}", entry);
                }
                school
            })
            .collect()
    }

    /// Fetches a list payload; failures skip the subtree and are retried next run
    async fn fetch_list(&mut self, query: &RegistryQuery) -> Option<Vec<Value>> {
        match self.fetcher.fetch_structured(query).await {
            Ok(Value::Array(entries)) => Some(entries),
            Ok(other) => {
                tracing::warn!("Expected a list for {:?}, got: {}", query, other);
                self.stats.lists_failed += 1;
                None
            }
            Err(e) => {
                tracing::error!("Skipping subtree for {:?}: {}", query, e);
                self.stats.lists_failed += 1;
                None
            }
        }
    }
}
