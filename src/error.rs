use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceivablesError {
    #[error("Input is missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Invalid manual entry: {details}")]
    Validation { details: String },

    #[error("Unsupported input file format: {0}")]
    UnsupportedFormat(String),

    #[error("Input file has no header row")]
    EmptyInput,

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReceivablesError>;
