use serde::{Deserialize, Serialize};

/// Record of the correction range being cut at the last available sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClippedEnd {
    /// End index implied by the configured end frame
    pub requested: usize,
    /// End index actually used (`n_samples - 1`)
    pub used: usize,
}

/// Dense per-sample correction factors and object areas.
///
/// Inside `[start_index, end_index]` values are interpolated from the
/// annotations; outside they equal `floor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionProfile {
    factors: Vec<f64>,
    areas: Vec<f64>,
    start_index: usize,
    end_index: usize,
    floor: f64,
    clipped_end: Option<ClippedEnd>,
}

impl CorrectionProfile {
    pub(super) fn new(
        factors: Vec<f64>,
        areas: Vec<f64>,
        start_index: usize,
        end_index: usize,
        floor: f64,
        clipped_end: Option<ClippedEnd>,
    ) -> Self {
        debug_assert_eq!(factors.len(), areas.len());
        Self {
            factors,
            areas,
            start_index,
            end_index,
            floor,
            clipped_end,
        }
    }

    /// Number of samples covered (always the measurement length)
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True for an empty measurement
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Correction factor per sample
    pub fn factors(&self) -> &[f64] {
        &self.factors
    }

    /// Object area per sample (µm²)
    pub fn areas(&self) -> &[f64] {
        &self.areas
    }

    /// Inclusive interpolated range
    pub fn range(&self) -> (usize, usize) {
        (self.start_index, self.end_index)
    }

    /// Value used outside the range
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Set when the configured end frame lay past the measurement
    pub fn clipped_end(&self) -> Option<ClippedEnd> {
        self.clipped_end
    }
}

/// Correction applied to every mass sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum PositionCorrection {
    /// One factor for the whole measurement (no annotations)
    Static {
        /// Factor from the configured cell position
        factor: f64,
    },
    /// Per-sample factors and areas
    Interpolated(CorrectionProfile),
}

impl PositionCorrection {
    /// Factor for sample `index`
    pub fn factor_at(&self, index: usize) -> f64 {
        match self {
            PositionCorrection::Static { factor } => *factor,
            PositionCorrection::Interpolated(profile) => profile.factors[index],
        }
    }

    /// Object areas when the correction was derived from annotations
    pub fn areas(&self) -> Option<&[f64]> {
        match self {
            PositionCorrection::Static { .. } => None,
            PositionCorrection::Interpolated(profile) => Some(profile.areas()),
        }
    }

    /// The dense profile, if any
    pub fn profile(&self) -> Option<&CorrectionProfile> {
        match self {
            PositionCorrection::Static { .. } => None,
            PositionCorrection::Interpolated(profile) => Some(profile),
        }
    }
}
