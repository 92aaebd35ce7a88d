//! # Position correction
//!
//! The mass sensitivity of a cantilever depends on where along its length the
//! cell sits. This module turns either a fixed cell position or sparse
//! per-frame image annotations into the factor each mass sample is multiplied
//! with.
//!
//! ## Modes
//!
//! - **Static**: no annotations; one factor from the configured offset of the
//!   cell from the tip.
//! - **Interpolated**: annotations keyed by frame are mapped onto sample
//!   indices, linearly interpolated over the correction range and passed
//!   through the beam formula ([`beam`]). Samples outside the range take the
//!   configured floor value (exactly 0 or exactly 1).

mod annotation;
pub mod beam;
mod engine;
mod error;
mod profile;


pub use annotation::{AnnotationSet, FrameValues, Point, PositionCorrectionAnnotation};
pub use engine::{PositionCorrectionEngine, PositionCorrectionSettings};
pub use error::CorrectionRangeError;
pub use profile::{ClippedEnd, CorrectionProfile, PositionCorrection};
