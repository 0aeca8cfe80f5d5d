//! Traversal filters
//!
//! `CityFilter` prunes whole subtrees at the city level; `SchoolFilter`
//! decides which listed schools are eligible for extraction.

use crate::config::TargetConfig;
use crate::region::node::{EducationForm, Ownership, SchoolSummary};
use crate::ConfigError;
use std::collections::HashSet;

/// Case-insensitive substring match against target city names
#[derive(Debug, Clone)]
pub struct CityFilter {
    needles: Vec<String>,
}

impl CityFilter {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            needles: targets
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// True when `name` contains any target
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.needles.iter().any(|needle| name.contains(needle.as_str()))
    }
}

/// Accepted education forms and ownership statuses
#[derive(Debug, Clone)]
pub struct SchoolFilter {
    forms: HashSet<EducationForm>,
    statuses: HashSet<Ownership>,
}

impl SchoolFilter {
    pub fn new(
        forms: impl IntoIterator<Item = EducationForm>,
        statuses: impl IntoIterator<Item = Ownership>,
    ) -> Self {
        Self {
            forms: forms.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
        }
    }

    /// Parses the configured form and status names
    pub fn from_config(config: &TargetConfig) -> Result<Self, ConfigError> {
        let forms = config
            .education_forms
            .iter()
            .map(|f| f.parse::<EducationForm>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ConfigError::Validation)?;

        let statuses = config
            .ownership_statuses
            .iter()
            .map(|s| s.parse::<Ownership>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ConfigError::Validation)?;

        Ok(Self::new(forms, statuses))
    }

    /// True when both the form and the status are accepted
    pub fn accepts(&self, school: &SchoolSummary) -> bool {
        let form_ok = school
            .education_form
            .parse::<EducationForm>()
            .map(|f| self.forms.contains(&f))
            .unwrap_or(false);
        let status_ok = school
            .ownership
            .parse::<Ownership>()
            .map(|s| self.statuses.contains(&s))
            .unwrap_or(false);

        form_ok && status_ok
    }
}
