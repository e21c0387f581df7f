use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid timestamp '{value}': expected YYYY-MM-DDTHH:MM:SS.mmmZ")]
    Timestamp { value: String },

    #[error("Invalid HAR structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to write table: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
