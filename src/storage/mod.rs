//! Storage module for persisting harvested records
//!
//! This module handles the output sink, including:
//! - Creating the CSV file with its fixed header
//! - Loading the ids already harvested, for resumption
//! - Appending one durable row per school

mod codec;
mod csv_store;
mod traits;

pub use codec::{encode_row, parse_rows, write_row};
pub use csv_store::CsvStore;
pub use traits::{RecordStore, StorageError, StorageResult};

