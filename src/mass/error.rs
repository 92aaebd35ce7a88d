/// Errors from the mass calculation stage
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MassError {
    /// Spring constant must be positive and finite
    #[error("Spring constant must be positive and finite, got {0} N/m")]
    InvalidSpringConstant(f64),

    /// A resonance frequency is zero, negative or not finite
    #[error("Invalid {role} frequency {value} kHz")]
    InvalidFrequency {
        /// `measured` or `reference`
        role: &'static str,
        /// Offending value
        value: f64,
    },

    /// Rolling window of zero samples
    #[error("Rolling window size must be >= 1")]
    ZeroWindow,

    /// Parallel columns of different length
    #[error("Column length mismatch: {column} has {found} entries, expected {expected}")]
    LengthMismatch {
        /// Column name
        column: &'static str,
        /// Expected entries
        expected: usize,
        /// Actual entries
        found: usize,
    },
}
