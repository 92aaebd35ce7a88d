use std::path::PathBuf;

use crate::position::CorrectionRangeError;
use crate::series::DataFormatError;

/// Errors from reading inputs and writing results
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// File could not be opened or created
    #[error("Failed to open {path}: {source}")]
    Open {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Read or write failure after opening
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Field that is not a number
    #[error("Line {line}, field {field}: cannot parse {value:?} as a number")]
    Parse {
        /// 1-based line in the file
        line: u64,
        /// 0-based field index
        field: usize,
        /// Offending text
        value: String,
    },

    /// Sweep row without a timestamp column
    #[error("Line {line}: sweep row has no timestamp field")]
    MissingTimestamp {
        /// 1-based line in the file
        line: u64,
    },

    /// Parsed data has an invalid shape
    #[error("Invalid data: {0}")]
    DataFormat(#[from] DataFormatError),

    /// Field delimiter outside ASCII
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    /// Logger sampling interval is not a positive number
    #[error("Sampling interval must be positive, got {0} ms")]
    InvalidInterval(f64),

    /// Annotation table failed validation
    #[error("Invalid annotations: {0}")]
    Annotation(#[from] CorrectionRangeError),
}

impl IoError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Open {
            path: path.into(),
            source,
        }
    }
}
