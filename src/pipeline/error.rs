use crate::fit::FitError;
use crate::mass::MassError;
use crate::offset::OffsetError;
use crate::position::CorrectionRangeError;
use crate::series::DataFormatError;

/// Errors that abort a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Settings rejected before any data is touched
    #[error("Invalid pipeline settings: {0}")]
    InvalidSettings(String),

    /// Malformed input recording
    #[error("Invalid {input} data: {source}")]
    DataFormat {
        /// Which input (`baseline without cell`, `measurement`, ...)
        input: &'static str,
        /// Underlying error
        #[source]
        source: DataFormatError,
    },

    /// A baseline resonance could not be fitted
    #[error("Resonance fit of the {baseline} baseline failed: {source}")]
    BaselineFit {
        /// Which baseline
        baseline: &'static str,
        /// Underlying error
        #[source]
        source: FitError,
    },

    /// Fitter could not be configured
    #[error("Fit configuration error: {0}")]
    FitSettings(#[from] FitError),

    /// Position correction profile could not be built
    #[error("Position correction error: {0}")]
    Correction(#[from] CorrectionRangeError),

    /// Frequency offset could not be resolved
    #[error("Frequency offset error: {0}")]
    Offset(#[from] OffsetError),

    /// Mass series could not be assembled
    #[error("Mass series error: {0}")]
    MassSeries(#[from] MassError),
}
