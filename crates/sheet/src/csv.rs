use crate::error::{Result, SheetError};
use crate::table::Table;
use std::io::{Read, Write};

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Whether to trim surrounding whitespace from cells when reading
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            trim: true,
        }
    }
}

impl Table {
    /// Load a table from a CSV string
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes(), CsvOptions::default())
    }

    /// Load a table from a reader
    ///
    /// # Errors
    ///
    /// Returns `SheetError::MissingHeader` for empty input, and
    /// `SheetError::LengthMismatch` when a record is wider than the header.
    pub fn from_csv_reader<R: Read>(reader: R, options: CsvOptions) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false) // We handle headers ourselves
            .flexible(true)
            .from_reader(reader);

        let mut records = csv_reader.records();
        let header = records.next().ok_or(SheetError::MissingHeader)??;
        let mut table = Table::new(header.iter().collect());

        for result in records {
            let record = result?;
            let row: Vec<&str> = record
                .iter()
                .map(|field| if options.trim { field.trim() } else { field })
                .collect();
            table.push_row(row)?;
        }

        Ok(table)
    }

    /// Write the table, header row first, to a writer as CSV
    pub fn write_csv<W: Write>(&self, writer: W, options: CsvOptions) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .from_writer(writer);

        csv_writer.write_record(self.headers())?;
        for row in self.rows() {
            csv_writer.write_record(row.cells())?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Convert the table to a CSV string
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        let mut buffer = Vec::new();
        // Ignore errors for string conversion
        let _ = self.write_csv(&mut buffer, CsvOptions::default());
        String::from_utf8_lossy(&buffer).to_string()
    }
}
