//! Tabular data for racksearch
//!
//! A [`Table`] is the in-memory form of a fetched spreadsheet: a header row
//! naming the columns, followed by data rows of string cells. Cells are not
//! type-inferred; book numbers such as `007` stay exactly as the sheet
//! exports them.
//!
//! # Examples
//!
//! ```
//! use racksearch_sheet::Table;
//!
//! let table = Table::from_csv_str("Number,Name\n101,Atlas\n12,Map").unwrap();
//!
//! assert_eq!(table.row_count(), 2);
//! assert!(table.has_column("Name"));
//! ```
//!
//! ## Building a table in code
//!
//! ```
//! use racksearch_sheet::Table;
//!
//! let table = Table::from_data(vec![
//!     vec!["Number", "Name"],
//!     vec!["101", "Atlas"],
//! ])
//! .unwrap();
//!
//! assert!(table.has_column("Number"));
//! ```

mod csv;
mod error;
mod table;

/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export table types.
pub use table::{Row, Table};
