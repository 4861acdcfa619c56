use crate::error::{Result, SheetError};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

/// One data row of a [`Table`]. Cells line up with the table headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Get a cell by column index
    #[must_use]
    pub fn get(&self, col: usize) -> Option<&str> {
        self.cells.get(col).map(String::as_str)
    }

    /// All cells of the row
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Tabular data with a named header row and string cells (row-major storage).
///
/// Header names are trimmed of surrounding whitespace and are otherwise kept
/// verbatim. When a header repeats, lookups by name resolve to its first
/// occurrence.
#[derive(Debug, Clone, Default)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given headers
    #[must_use]
    pub fn new<T: Into<String>>(headers: Vec<T>) -> Self {
        Self::with_name("Sheet1", headers)
    }

    /// Create an empty named table with the given headers
    #[must_use]
    pub fn with_name<T: Into<String>>(name: &str, headers: Vec<T>) -> Self {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.into().trim().to_string())
            .collect();

        let mut column_index = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            column_index.entry(header.clone()).or_insert(i);
        }

        Table {
            name: name.to_string(),
            headers,
            column_index,
            rows: Vec::new(),
        }
    }

    /// Create a table from a 2D vector whose first row is the header row
    ///
    /// # Errors
    ///
    /// Returns `SheetError::MissingHeader` if `data` is empty and
    /// `SheetError::LengthMismatch` if a row is longer than the header.
    pub fn from_data<T: Into<String>>(data: Vec<Vec<T>>) -> Result<Self> {
        let mut rows = data.into_iter();
        let headers = rows.next().ok_or(SheetError::MissingHeader)?;
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Get the table name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the table name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Column headers in sheet order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Check whether a header with this exact name exists
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Get the column index for a header name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    /// Number of data rows (the header row is not counted)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Check if the table has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over data rows in order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Append a data row. Short rows are padded with empty cells.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::LengthMismatch` if the row has more cells than
    /// there are headers.
    pub fn push_row<T: Into<String>>(&mut self, cells: Vec<T>) -> Result<()> {
        let expected = self.headers.len();
        if cells.len() > expected {
            return Err(SheetError::LengthMismatch {
                row: self.rows.len() + 1,
                expected,
                actual: cells.len(),
            });
        }

        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(expected, String::new());
        self.rows.push(Row { cells });
        Ok(())
    }

    /// Convert a row into a header-keyed record.
    ///
    /// Repeated headers keep the first occurrence's value.
    #[must_use]
    pub fn record(&self, row: &Row) -> IndexMap<String, String> {
        let mut record = IndexMap::with_capacity(self.headers.len());
        for (header, cell) in self.headers.iter().zip(row.cells()) {
            record.entry(header.clone()).or_insert_with(|| cell.clone());
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books() -> Table {
        Table::from_data(vec![
            vec!["Number", "Name", "Rack"],
            vec!["101", "Atlas", "A1"],
            vec!["12", "Map"],
        ])
        .unwrap()
    }

    fn cell(table: &Table, row: usize, column: &str) -> String {
        let row = table.rows().nth(row).unwrap();
        table.record(row)[column].clone()
    }

    #[test]
    fn test_from_data() {
        let table = books();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.col_count(), 3);
        assert_eq!(table.headers(), ["Number", "Name", "Rack"]);
        assert_eq!(table.name(), "Sheet1");
    }

    #[test]
    fn test_from_data_empty() {
        let result = Table::from_data::<&str>(vec![]);
        assert!(matches!(result, Err(SheetError::MissingHeader)));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = books();
        assert_eq!(cell(&table, 1, "Rack"), "");
        assert_eq!(table.rows().nth(1).unwrap().len(), 3);
    }

    #[test]
    fn test_long_row_rejected() {
        let mut table = Table::new(vec!["a", "b"]);
        let err = table.push_row(vec!["1", "2", "3"]).unwrap_err();
        assert!(matches!(
            err,
            SheetError::LengthMismatch {
                row: 1,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_headers_trimmed() {
        let table = Table::new(vec!["  Number ", "Name\t"]);
        assert!(table.has_column("Number"));
        assert!(table.has_column("Name"));
        assert!(!table.has_column("  Number "));
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let table = Table::from_data(vec![vec!["x", "x"], vec!["first", "second"]]).unwrap();
        assert_eq!(table.column_index("x"), Some(0));
        let record = table.record(table.rows().next().unwrap());
        assert_eq!(record.len(), 1);
        assert_eq!(record["x"], "first");
    }

    #[test]
    fn test_column_index_missing() {
        let table = books();
        assert_eq!(table.column_index("Name"), Some(1));
        assert_eq!(table.column_index("Price"), None);
        assert_eq!(table.column_index("name"), None);
    }

    #[test]
    fn test_record_keeps_header_order() {
        let table = books();
        let record = table.record(table.rows().next().unwrap());
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, ["Number", "Name", "Rack"]);
        assert_eq!(cell(&table, 1, "Name"), "Map");
    }
}
