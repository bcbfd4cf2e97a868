//! Error type shared by the table core and the file readers.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = TabularError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TabularError {
    /// A column declaration is neither a rename nor a `column_type` mapping.
    #[error("Invalid column declaration for '{key}': {message}")]
    Configuration { key: String, message: String },

    /// A `date` column cell could not be read as a calendar date.
    #[error("'{key}' row {index} '{value}' is not a valid date")]
    DateCoercion {
        key: String,
        index: usize,
        value: String,
    },

    #[error("Cannot compare values of column '{key}': {left} and {right} are different kinds")]
    Comparison {
        key: String,
        left: String,
        right: String,
    },

    #[error("Could not find '{}'", .0.display())]
    MissingFile(PathBuf),

    #[error("Cannot read '{0}' format. Expected csv or txt")]
    UnsupportedFormat(String),

    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Failed to decode text with encoding {0}")]
    Decode(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl TabularError {
    pub(crate) fn configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            message: message.into(),
        }
    }
}
