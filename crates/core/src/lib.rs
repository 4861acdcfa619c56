//! # racksearch-core
//!
//! Configuration, column mapping and search for racksearch.
//!
//! A [`Config`] names the sheet to load and maps the three logical book
//! fields onto the sheet's own column headers. [`ConfigStore`] persists it;
//! [`SearchEngine`] filters a loaded table through it.

pub mod admin;
pub mod config;
pub mod error;
pub mod field;
pub mod search;
pub mod source;

pub use admin::{AdminGate, ADMIN_SECRET_ENV};
pub use config::{ColumnMap, Config, ConfigStore, DEFAULT_SHEET_NAME};
pub use error::{RackError, RackResult};
pub use field::{LogicalField, SearchMode};
pub use search::{
    find_by_number, results_table, search, search_any, BookRecord, SearchEngine,
};
pub use source::{export_url, extract_sheet_id};
