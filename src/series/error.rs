/// Errors raised when raw recordings do not match the expected layout
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataFormatError {
    /// The table contains no rows
    #[error("Series is empty")]
    EmptySeries,

    /// A row has a different number of values than the first row
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow {
        /// Zero-based row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        found: usize,
    },

    /// A column required by the acquisition mode is not present
    #[error("Column {column} requested but the series only has {available} columns")]
    MissingColumn {
        /// Requested column index
        column: usize,
        /// Number of columns in the series
        available: usize,
    },

    /// No channel name matched the synonyms of a required role
    #[error("No {0} channel found in sweep channel names")]
    MissingChannel(&'static str),

    /// A role channel was found outside the detected block
    #[error("{role} channel at index {index} lies outside the {block_size}-row sweep block")]
    ChannelOutsideBlock {
        /// Role name (frequency, phase, ...)
        role: &'static str,
        /// Channel index of the match
        index: usize,
        /// Detected rows per sweep
        block_size: usize,
    },

    /// The number of rows is not a whole number of sweep blocks
    #[error("{rows} sweep rows do not divide into blocks of {block_size}")]
    IncompleteBlock {
        /// Number of rows in the table
        rows: usize,
        /// Detected rows per sweep
        block_size: usize,
    },

    /// Timestamps and sweeps disagree in count
    #[error("Found {timestamps} timestamps for {sweeps} sweeps")]
    TimestampCount {
        /// Number of sweeps
        sweeps: usize,
        /// Number of timestamps
        timestamps: usize,
    },

    /// A sweep timestamp could not be interpreted
    #[error("Invalid timestamp for sweep {sweep}: {value}")]
    InvalidTimestamp {
        /// Zero-based sweep index
        sweep: usize,
        /// Raw timestamp text
        value: String,
    },

    /// The block layout is not one the demuxer understands
    #[error("Unsupported sweep layout: {0}")]
    UnsupportedLayout(String),
}
