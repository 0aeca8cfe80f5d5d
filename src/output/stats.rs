//! Statistics from an existing CSV sink
//!
//! This module reads a harvested file back and summarizes what it holds.

use crate::extract::ID_COLUMN;
use crate::storage::{CsvStore, StorageError};
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Summary of the rows in a sink
#[derive(Debug, Clone, Default)]
pub struct SinkStatistics {
    /// Data rows, excluding the header
    pub total_rows: u64,

    pub by_city: HashMap<String, u64>,

    pub by_education_form: HashMap<String, u64>,

    pub by_status: HashMap<String, u64>,

    /// Ids that occur on more than one row
    pub duplicate_ids: Vec<String>,
}

/// Loads statistics from the CSV file at `path`
///
/// A missing file yields empty statistics.
pub fn load_statistics(path: &Path) -> Result<SinkStatistics> {
    let store = CsvStore::new(path);
    let Some(rows) = store.read_rows()? else {
        return Ok(SinkStatistics::default());
    };
    let Some((header, records)) = rows.split_first() else {
        return Ok(SinkStatistics::default());
    };

    let position = |name: &str| header.iter().position(|h| h.trim() == name);
    let id_index = position(ID_COLUMN).ok_or_else(|| StorageError::MissingColumn {
        path: path.display().to_string(),
        column: ID_COLUMN,
    })?;
    let city_index = position("Kota_Kabupaten");
    let form_index = position("Bentuk_Pendidikan");
    let status_index = position("Status");

    let mut stats = SinkStatistics::default();
    let mut seen = HashSet::new();
    let mut duplicates = HashSet::new();

    for row in records {
        stats.total_rows += 1;

        if let Some(id) = row.get(id_index) {
            if !seen.insert(id.as_str()) {
                duplicates.insert(id.clone());
            }
        }

        tally(&mut stats.by_city, row, city_index);
        tally(&mut stats.by_education_form, row, form_index);
        tally(&mut stats.by_status, row, status_index);
    }

    stats.duplicate_ids = duplicates.into_iter().collect();
    stats.duplicate_ids.sort();
    Ok(stats)
}

fn tally(counts: &mut HashMap<String, u64>, row: &[String], index: Option<usize>) {
    let value = index
        .and_then(|i| row.get(i))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or("(blank)");
    *counts.entry(value.to_string()).or_insert(0) += 1;
}

fn sorted_counts(counts: &HashMap<String, u64>) -> Vec<(&String, &u64)> {
    let mut entries: Vec<_> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &SinkStatistics) {
    println!("=== Harvest Statistics ===\n");
    println!("Total rows: {}\n", stats.total_rows);

    for (title, counts) in [
        ("Rows by City", &stats.by_city),
        ("Rows by Education Form", &stats.by_education_form),
        ("Rows by Status", &stats.by_status),
    ] {
        if counts.is_empty() {
            continue;
        }
        println!("{}:", title);
        for (name, count) in sorted_counts(counts) {
            let percentage = if stats.total_rows > 0 {
                (*count as f64 / stats.total_rows as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", name, count, percentage);
        }
        println!();
    }

    if !stats.duplicate_ids.is_empty() {
        println!("Duplicate ids ({}):", stats.duplicate_ids.len());
        for id in &stats.duplicate_ids {
            println!("  - {}", id);
        }
    }
}
