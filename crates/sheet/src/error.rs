use thiserror::Error;

/// Errors that can occur while building or reading a table
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("No header row: the data is empty")]
    MissingHeader,

    #[error("Row {row} has {actual} cells but the header has {expected}")]
    LengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
