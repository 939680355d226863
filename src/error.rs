use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across the crate.
pub type SummaryResult<T> = Result<T, SummaryError>;

/// Which input file an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRole {
    /// The structured (JSON) record source.
    Data,
    /// The tabular (CSV) metadata/schema source.
    Metadata,
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRole::Data => f.write_str("datafile"),
            SourceRole::Metadata => f.write_str("metafile"),
        }
    }
}

/// Error type returned by loading, lookup, statistics and export.
///
/// Errors are raised at the point of violation and never carry partial results.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A source file does not exist. Checked before any parsing.
    #[error("{role} not found: {}", path.display())]
    NotFound { role: SourceRole, path: PathBuf },

    /// Underlying I/O error (e.g. permission denied, failed write).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata parsing or export writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The record source is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A source is readable but does not have the expected shape.
    #[error("format error: {message}")]
    Format { message: String },

    /// The key or feature is not a schema field.
    #[error("key not found: '{key}'")]
    KeyNotFound { key: String },

    /// Wrong-shaped lookup argument, or a numeric operation on a non-numeric feature.
    #[error("type error: {message}")]
    Type { message: String },

    /// A present value could not be coerced to a number.
    #[error("failed to coerce value at record {record} feature '{feature}': {message} (raw='{raw}')")]
    Value {
        feature: String,
        record: usize,
        raw: String,
        message: String,
    },

    /// `mean` of a feature with no present values.
    #[error("division by zero: feature '{feature}' has no present values")]
    Division { feature: String },

    /// `mode`/`min`/`max` of a feature with no present values.
    #[error("no data: feature '{feature}' has no present values")]
    EmptyData { feature: String },

    /// Positional lookup outside `[0, len)`.
    #[error("index {index} out of range for {len} records")]
    IndexOutOfRange { index: i128, len: usize },

    /// Export delimiter outside the supported set.
    #[error("unsupported delimiter '{delimiter}' (expected one of , . : | - ; # *)")]
    UnsupportedDelimiter { delimiter: String },
}

impl SummaryError {
    pub(crate) fn key_not_found(key: &str) -> Self {
        SummaryError::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        SummaryError::Format {
            message: message.into(),
        }
    }
}
