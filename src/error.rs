use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("Invalid date in {field}: '{value}'. Expected an ISO-8601 date (YYYY-MM-DD) or timestamp.")]
    InvalidDate { field: String, value: String },

    #[error("Invoice '{invoice}' has a negative total amount ({amount})")]
    NegativeAmount { invoice: String, amount: i64 },

    #[error("Amount overflow in {scope}: the sum does not fit in 64-bit minor units")]
    AmountOverflow { scope: String },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invoice file not found: {0}")]
    InvoiceFileNotFound(PathBuf),

    #[error("Failed to parse invoice file {path}: {source}")]
    InvoiceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecognitionError {
    pub(crate) fn invalid_date(field: &str, value: &str) -> Self {
        RecognitionError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Narrow an accumulated amount back to `i64` minor units.
    pub(crate) fn narrow(value: i128, scope: &str) -> Result<i64> {
        i64::try_from(value).map_err(|_| RecognitionError::AmountOverflow {
            scope: scope.to_string(),
        })
    }
}

pub type Result<T> = std::result::Result<T, RecognitionError>;
