//! CSV record sink
//!
//! This module provides a CSV-file implementation of the RecordStore trait.

use crate::extract::{headers, FlatRecord, ID_COLUMN};
use crate::storage::codec::{complete_len, encode_row, parse_rows, write_row};
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Append-only CSV sink keyed by `sekolah_id_enkrip`
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows including the header; `None` when the file does not exist
    pub fn read_rows(&self) -> StorageResult<Option<Vec<Vec<String>>>> {
        Ok(self.read_text()?.map(|text| parse_text(&text)))
    }

    fn read_text(&self) -> StorageResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// Cuts off a last row that was interrupted mid-write
    ///
    /// A row without its line break is not a stored record: it may be
    /// missing columns, so the school has to be harvested again.
    fn drop_partial_row(&self, text: &str) -> StorageResult<()> {
        let end = complete_len(text);
        if end == text.len() {
            return Ok(());
        }

        if end == 0 {
            // Header written without its line break
            let mut file = OpenOptions::new().append(true).open(&self.path)?;
            file.write_all(b"\r\n")?;
            file.sync_data()?;
            return Ok(());
        }

        tracing::warn!(
            "{} ends with a partial row; dropping its last {} bytes",
            self.display_path(),
            text.len() - end
        );
        let file = OpenOptions::new().write(true).open(&self.path)?;
        file.set_len(end as u64)?;
        file.sync_data()?;
        Ok(())
    }
}

fn parse_text(text: &str) -> Vec<Vec<String>> {
    parse_rows(text.trim_start_matches('\u{feff}'))
}

impl RecordStore for CsvStore {
    fn ensure_initialized(&mut self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let expected = headers();
        let existing = self.read_text()?;
        let rows = existing.as_deref().map(parse_text).unwrap_or_default();

        match (existing, rows.first()) {
            (Some(text), Some(header)) => {
                if *header != expected {
                    return Err(StorageError::HeaderMismatch {
                        path: self.display_path(),
                        expected: expected.len(),
                        first: ID_COLUMN,
                    });
                }
                self.drop_partial_row(&text)
            }
            _ => {
                // Missing or empty: write the header
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?;
                file.write_all(encode_row(&expected).as_bytes())?;
                file.sync_data()?;
                tracing::info!("Created {}", self.display_path());
                Ok(())
            }
        }
    }

    fn load_processed_ids(&self) -> StorageResult<HashSet<String>> {
        let Some(rows) = self.read_rows()? else {
            return Ok(HashSet::new());
        };
        let Some((header, records)) = rows.split_first() else {
            return Ok(HashSet::new());
        };

        let index = header
            .iter()
            .position(|h| h.trim() == ID_COLUMN)
            .ok_or_else(|| StorageError::MissingColumn {
                path: self.display_path(),
                column: ID_COLUMN,
            })?;

        Ok(records
            .iter()
            .filter_map(|row| row.get(index))
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn append(&mut self, record: &FlatRecord) -> StorageResult<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        write_row(&mut file, record.values())?;
        file.flush()?;
        file.sync_data()?;
        Ok(())
    }
}
