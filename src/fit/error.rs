/// Errors that can occur while fitting a resonance curve
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Frequency and phase arrays differ in length
    #[error("Length mismatch: {frequency} frequency values, {phase} phase values")]
    LengthMismatch {
        /// Number of frequency values
        frequency: usize,
        /// Number of phase values
        phase: usize,
    },

    /// Fewer data points than model parameters
    #[error("Insufficient data: expected at least {expected} points, got {got}")]
    InsufficientData {
        /// Minimum number of points
        expected: usize,
        /// Points supplied
        got: usize,
    },

    /// NaN or infinite value in the input curve
    #[error("Non-finite input value at point {index}")]
    NonFiniteInput {
        /// Index of the offending point
        index: usize,
    },

    /// Bounds are inconsistent or unusable for the model
    #[error("Invalid parameter bounds: {0}")]
    InvalidBounds(String),

    /// Initial guess lies outside the bounds
    #[error("Initial guess for {parameter} ({value}) lies outside [{lower}, {upper}]")]
    GuessOutOfBounds {
        /// Parameter name
        parameter: &'static str,
        /// Guessed value
        value: f64,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// Iteration budget exhausted or cost diverged
    #[error("Fit did not converge after {iterations} iterations (cost {cost:e})")]
    NotConverged {
        /// Iterations performed
        iterations: usize,
        /// Cost at the last accepted iterate
        cost: f64,
    },
}
