//! # inertial-mass - Inertial Mass Determination of Single Cells
//!
//! `inertial_mass` computes the mass of a living cell attached to a resonant
//! micro-cantilever from the shift of the cantilever's resonance frequency.
//!
//! ## Key Features
//!
//! - **Two acquisition modes**: phase-locked-loop streams (one frequency shift
//!   per sample) and continuous sweeps (one fitted resonance per sweep).
//!
//! - **Bounded resonance fit**: the phase response
//!   `offset - amplitude * atan((f - center) / width)` is fitted with a
//!   projected Levenberg-Marquardt solver that never leaves the parameter
//!   bounds.
//!
//! - **Position correction**: the cell's distance from the cantilever tip
//!   weakens the frequency response. A static correction factor or a per-sample
//!   profile interpolated from annotated image frames compensates for it.
//!
//! - **Drift correction**: PLL recordings can subtract an automatic (mean of
//!   the first samples) or manual frequency offset.
//!
//! - **Sweep layouts**: the 3-row canonical layout and the 4-row legacy layout
//!   are detected from channel names and normalized before processing.
//!
//! ## Quick Start
//!
//! ```rust
//! use inertial_mass::prelude::*;
//! use inertial_mass::synthetic::SyntheticCantilever;
//!
//! let cantilever = SyntheticCantilever::default();
//! let settings = PipelineSettings {
//!     fit: cantilever.fit_settings(),
//!     rolling_window: 2,
//!     ..Default::default()
//! };
//! let input = PipelineInput {
//!     baseline_no_cell: cantilever.baseline(cantilever.f_no_cell)?,
//!     baseline_with_cell: cantilever.baseline(cantilever.f_with_cell)?,
//!     measurement: RawMeasurement::Pll(cantilever.pll(&[0.05, 0.06], 60.0)?),
//!     annotations: AnnotationSet::default(),
//! };
//!
//! let output = InertialMassPipeline::new(settings)?.run(&input)?;
//! assert_eq!(output.mass.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Project Files
//!
//! The `imd` binary reads a TOML project file ([`config::ProjectConfig`])
//! naming the recordings and settings of one experiment, runs the
//! [`pipeline`], and writes the mass series and fit diagnostics through
//! [`io`].
//!
//! ## Units
//!
//! Computation uses kHz, radians and µm. Instrument units (Hz, degrees,
//! pixels) are converted on entry by [`units::UnitConverter`]; masses are in
//! nanograms.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod fit;
pub mod io;
pub mod mass;
pub mod offset;
pub mod pipeline;
pub mod position;
pub mod series;
pub mod sweep;
pub mod synthetic;
pub mod units;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ConfigError, ProjectConfig};
    pub use crate::fit::{FitError, FitSettings, ResonanceFit, ResonanceFrequencyFitter};
    pub use crate::io::{load_project_input, write_project_results, IoError};
    pub use crate::mass::{calculate_mass, MassCalculator, MassRecord, MassSeries};
    pub use crate::offset::{FrequencyOffsetCorrector, FrequencyOffsetMode, FrequencyOffsetSettings, ResolvedOffset};
    pub use crate::pipeline::{
        InertialMassPipeline, PipelineError, PipelineInput, PipelineOutput, PipelineSettings, RawMeasurement, RunStats,
    };
    pub use crate::position::{
        AnnotationSet, CorrectionRangeError, PositionCorrection, PositionCorrectionAnnotation, PositionCorrectionEngine,
        PositionCorrectionSettings,
    };
    pub use crate::series::{AcquisitionMode, Measurement, PllSeries, RawSeries, RawSweepTable, SweepSeries};
    pub use crate::sweep::{ChannelLayout, SweepDemuxer};
    pub use crate::units::UnitConverter;
    pub use crate::validator::{validate_project, ValidationReport};
}
