//! Bulk import of transactions from CSV files.
//!
//! Each row of a file holds `title, type, value, category`. The first row is
//! a header and is always skipped.

mod import_endpoint;
mod importer;
mod rows;

pub use import_endpoint::{DEFAULT_MAX_UPLOAD_BYTES, ImportConfig, import_transactions_endpoint};
pub use importer::TransactionImporter;
