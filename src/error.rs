// ⚠️ Error taxonomy
// Every failure is fatal: a conversion either produces the whole file or nothing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// A value did not match the format its column promises (date, amount, encoding)
    #[error("parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// The export is missing a column the adapter depends on
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// The raw bytes are not valid in the encoding the source exports with
    #[error("could not decode input as {encoding}: {message}")]
    Decode {
        encoding: &'static str,
        message: String,
    },

    /// Row-level business rule violation (e.g. both debit and credit populated)
    #[error("validation error at row {row}: {message}")]
    Validation { row: usize, message: String },

    /// Incompatible source / target / reimbursement combination
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ConvertError {
    pub fn parse(row: usize, message: impl Into<String>) -> Self {
        ConvertError::Parse {
            row,
            message: message.into(),
        }
    }

    pub fn validation(row: usize, message: impl Into<String>) -> Self {
        ConvertError::Validation {
            row,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ConvertError::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
