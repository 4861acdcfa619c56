//! Searching a table through the column map.
//!
//! The column map is resolved against the table once, when a
//! [`SearchEngine`] is built. A field whose header is unmapped or missing
//! from the table resolves to nothing: searching it returns no rows and
//! projecting it yields an empty string. Neither is an error.
//!
//! Matching is a case-insensitive substring test on the cell text. This
//! holds for book numbers too, so `"12"` also finds `"123"`.

use crate::config::ColumnMap;
use crate::error::RackResult;
use crate::field::{LogicalField, SearchMode};
use racksearch_sheet::{Row, Table};
use serde::{Deserialize, Serialize};

/// A book as seen through the column map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "BK_Number")]
    pub number: String,
    #[serde(rename = "BK_name")]
    pub name: String,
    #[serde(rename = "BK_row")]
    pub location: String,
}

impl BookRecord {
    /// Value of a logical field.
    #[must_use]
    pub fn get(&self, field: LogicalField) -> &str {
        match field {
            LogicalField::Number => &self.number,
            LogicalField::Name => &self.name,
            LogicalField::Location => &self.location,
        }
    }
}

/// Filters and projects the rows of one table under one column map.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    table: &'a Table,
    columns: [Option<usize>; 3],
}

impl<'a> SearchEngine<'a> {
    /// Resolve `column_map` against the headers of `table`.
    #[must_use]
    pub fn new(table: &'a Table, column_map: &ColumnMap) -> Self {
        let columns = LogicalField::ALL.map(|field| {
            let index = column_map
                .header(field)
                .and_then(|header| table.column_index(header));
            if index.is_none() {
                tracing::debug!(
                    field = field.key(),
                    header = column_map.get(field),
                    "field does not resolve to a column"
                );
            }
            index
        });
        Self { table, columns }
    }

    /// Column index a field resolved to, if any.
    #[must_use]
    pub fn column(&self, field: LogicalField) -> Option<usize> {
        match field {
            LogicalField::Number => self.columns[0],
            LogicalField::Name => self.columns[1],
            LogicalField::Location => self.columns[2],
        }
    }

    /// Rows whose `field` value contains `query`, ignoring case.
    ///
    /// An empty query returns every row. An unresolved field returns none.
    /// Rows keep their table order.
    #[must_use]
    pub fn search(&self, field: LogicalField, query: &str) -> Vec<&'a Row> {
        let Some(col) = self.column(field) else {
            return Vec::new();
        };
        if query.is_empty() {
            return self.table.rows().collect();
        }

        let needle = query.to_lowercase();
        self.table
            .rows()
            .filter(|row| contains_ignore_case(row.get(col), &needle))
            .collect()
    }

    /// Rows where any resolved field contains `query`, ignoring case.
    #[must_use]
    pub fn search_any(&self, query: &str) -> Vec<&'a Row> {
        if query.is_empty() {
            return self.table.rows().collect();
        }

        let cols: Vec<usize> = self.columns.iter().flatten().copied().collect();
        let needle = query.to_lowercase();
        self.table
            .rows()
            .filter(|row| {
                cols.iter()
                    .any(|&col| contains_ignore_case(row.get(col), &needle))
            })
            .collect()
    }

    /// Dispatch on a [`SearchMode`].
    #[must_use]
    pub fn search_mode(&self, mode: SearchMode, query: &str) -> Vec<&'a Row> {
        match mode {
            SearchMode::Field(field) => self.search(field, query),
            SearchMode::Any => self.search_any(query),
        }
    }

    /// Rows whose book number equals `number` exactly (after trimming).
    #[must_use]
    pub fn find_by_number(&self, number: &str) -> Vec<&'a Row> {
        let Some(col) = self.column(LogicalField::Number) else {
            return Vec::new();
        };
        let number = number.trim();
        self.table
            .rows()
            .filter(|row| row.get(col).unwrap_or_default() == number)
            .collect()
    }

    /// Read the three logical fields of a row.
    #[must_use]
    pub fn project(&self, row: &Row) -> BookRecord {
        let cell = |field| {
            self.column(field)
                .and_then(|col| row.get(col))
                .unwrap_or_default()
                .to_string()
        };
        BookRecord {
            number: cell(LogicalField::Number),
            name: cell(LogicalField::Name),
            location: cell(LogicalField::Location),
        }
    }

    /// Project a list of rows, keeping order.
    #[must_use]
    pub fn project_all(&self, rows: &[&Row]) -> Vec<BookRecord> {
        rows.iter().map(|row| self.project(row)).collect()
    }

    /// The first `limit` rows of the table, projected. Used to check a
    /// column map before saving it.
    #[must_use]
    pub fn preview(&self, limit: usize) -> Vec<BookRecord> {
        self.table
            .rows()
            .take(limit)
            .map(|row| self.project(row))
            .collect()
    }
}

fn contains_ignore_case(value: Option<&str>, needle_lower: &str) -> bool {
    value.is_some_and(|v| v.to_lowercase().contains(needle_lower))
}

/// Rows of `table` whose `field` value contains `query`, ignoring case.
///
/// ```
/// use racksearch_core::{search, ColumnMap, LogicalField};
/// use racksearch_sheet::Table;
///
/// let table = Table::from_csv_str("Number,Name\n101,Atlas\n12,Map").unwrap();
/// let map = ColumnMap::new("Number", "Name", "");
///
/// assert_eq!(search(&table, &map, LogicalField::Number, "1").len(), 2);
/// assert_eq!(search(&table, &map, LogicalField::Number, "101").len(), 1);
/// assert!(search(&table, &map, LogicalField::Location, "").is_empty());
/// ```
#[must_use]
pub fn search<'a>(
    table: &'a Table,
    column_map: &ColumnMap,
    field: LogicalField,
    query: &str,
) -> Vec<&'a Row> {
    SearchEngine::new(table, column_map).search(field, query)
}

/// Rows of `table` where any mapped field contains `query`, ignoring case.
#[must_use]
pub fn search_any<'a>(table: &'a Table, column_map: &ColumnMap, query: &str) -> Vec<&'a Row> {
    SearchEngine::new(table, column_map).search_any(query)
}

/// Rows of `table` whose book number is exactly `number`.
#[must_use]
pub fn find_by_number<'a>(table: &'a Table, column_map: &ColumnMap, number: &str) -> Vec<&'a Row> {
    SearchEngine::new(table, column_map).find_by_number(number)
}

/// Tabulate records under the logical field keys, e.g. for CSV output.
pub fn results_table(records: &[BookRecord]) -> RackResult<Table> {
    let mut table = Table::with_name(
        "Results",
        LogicalField::ALL.iter().map(|f| f.key()).collect(),
    );
    for record in records {
        table.push_row(LogicalField::ALL.iter().map(|&f| record.get(f)).collect())?;
    }
    Ok(table)
}
