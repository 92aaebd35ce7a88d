//! Frequency offset (drift) correction for PLL measurements.
//!
//! The PLL reading taken right after the cell is attached can drift before the
//! long-term measurement starts. The corrector removes that drift as a
//! constant bias from every frequency-shift sample:
//!
//! ```text
//! measured_frequency = (shift - offset) + f_with_cell
//! ```
//!
//! The offset is either the mean of the first `n` shift samples (auto) or an
//! operator-supplied constant (manual). Sweep measurements are never corrected.

use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the frequency offset is obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencyOffsetMode {
    /// Mean of the first `n_measurements_used` shift samples
    #[default]
    Auto,
    /// Fixed operator-supplied value
    Manual,
}

/// Offset correction settings as stored in a project file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyOffsetSettings {
    /// Apply the correction at all
    pub enabled: bool,
    /// Auto or manual offset
    pub mode: FrequencyOffsetMode,
    /// Number of leading samples averaged in auto mode
    pub n_measurements_used: usize,
    /// Offset used in manual mode (kHz)
    pub frequency_offset: f64,
}

impl Default for FrequencyOffsetSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: FrequencyOffsetMode::Auto,
            n_measurements_used: 10,
            frequency_offset: 0.0,
        }
    }
}

/// Errors raised while resolving the offset
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OffsetError {
    /// Auto mode configured to average zero samples
    #[error("Auto frequency offset requires n_measurements_used >= 1")]
    ZeroSamples,

    /// Auto mode on an empty shift series
    #[error("Cannot compute an automatic frequency offset from an empty series")]
    EmptySeries,

    /// Averaged samples contain NaN or infinity
    #[error("Non-finite frequency shift at sample {index} used for the offset mean")]
    NonFinite {
        /// Offending sample
        index: usize,
    },

    /// Manual offset is NaN or infinite
    #[error("Manual frequency offset must be finite, got {0}")]
    InvalidManual(f64),
}

/// Where a resolved offset came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum OffsetSource {
    /// Correction disabled; offset is zero
    Disabled,
    /// Mean of the first `n_used` samples
    Auto {
        /// Samples actually averaged (after clamping to the series length)
        n_used: usize,
    },
    /// Operator constant
    Manual,
}

/// Offset value together with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOffset {
    /// Offset subtracted from each shift sample (kHz)
    pub value: f64,
    /// How the value was obtained
    pub source: OffsetSource,
}

impl ResolvedOffset {
    /// The no-op offset
    pub fn disabled() -> Self {
        Self {
            value: 0.0,
            source: OffsetSource::Disabled,
        }
    }
}

impl fmt::Display for ResolvedOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            OffsetSource::Disabled => write!(f, "disabled"),
            OffsetSource::Auto { n_used } => write!(f, "{:.6} kHz (auto, mean of {} samples)", self.value, n_used),
            OffsetSource::Manual => write!(f, "{:.6} kHz (manual)", self.value),
        }
    }
}

/// Resolves and applies the PLL frequency offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyOffsetCorrector {
    settings: FrequencyOffsetSettings,
}

impl FrequencyOffsetCorrector {
    /// Create a corrector from settings
    pub fn new(settings: FrequencyOffsetSettings) -> Self {
        Self { settings }
    }

    /// Settings in use
    pub fn settings(&self) -> &FrequencyOffsetSettings {
        &self.settings
    }

    /// Determine the offset for a series of converted frequency shifts (kHz).
    pub fn resolve(&self, shifts: &[f64]) -> Result<ResolvedOffset, OffsetError> {
        if !self.settings.enabled {
            return Ok(ResolvedOffset::disabled());
        }

        match self.settings.mode {
            FrequencyOffsetMode::Manual => {
                let value = self.settings.frequency_offset;
                if !value.is_finite() {
                    return Err(OffsetError::InvalidManual(value));
                }
                info!("Using manual frequency offset {:.6} kHz", value);
                Ok(ResolvedOffset {
                    value,
                    source: OffsetSource::Manual,
                })
            }
            FrequencyOffsetMode::Auto => {
                let requested = self.settings.n_measurements_used;
                if requested == 0 {
                    return Err(OffsetError::ZeroSamples);
                }
                if shifts.is_empty() {
                    return Err(OffsetError::EmptySeries);
                }
                let n_used = if requested > shifts.len() {
                    warn!(
                        "Requested {} samples for the frequency offset but the series has {}; using all",
                        requested,
                        shifts.len()
                    );
                    shifts.len()
                } else {
                    requested
                };

                let head = &shifts[..n_used];
                if let Some(index) = head.iter().position(|v| !v.is_finite()) {
                    return Err(OffsetError::NonFinite { index });
                }
                let value = head.iter().sum::<f64>() / n_used as f64;
                info!("Automatic frequency offset {:.6} kHz from {} samples", value, n_used);
                Ok(ResolvedOffset {
                    value,
                    source: OffsetSource::Auto { n_used },
                })
            }
        }
    }

    /// Absolute measured frequencies: `(shift - offset) + f_with_cell`.
    pub fn apply(offset: &ResolvedOffset, shifts: &[f64], f_with_cell: f64) -> Vec<f64> {
        shifts.iter().map(|&s| (s - offset.value) + f_with_cell).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto(n: usize) -> FrequencyOffsetCorrector {
        FrequencyOffsetCorrector::new(FrequencyOffsetSettings {
            enabled: true,
            mode: FrequencyOffsetMode::Auto,
            n_measurements_used: n,
            ..Default::default()
        })
    }

    #[test]
    fn test_disabled_is_zero() {
        let corrector = FrequencyOffsetCorrector::new(FrequencyOffsetSettings::default());
        let offset = corrector.resolve(&[1.0, 2.0]).unwrap();
        assert_eq!(offset, ResolvedOffset::disabled());
        assert_eq!(FrequencyOffsetCorrector::apply(&offset, &[0.25], 71.5), vec![71.75]);
    }

    #[test]
    fn test_auto_mean_of_leading_samples() {
        let offset = auto(2).resolve(&[0.5, 1.5, 100.0]).unwrap();
        assert_eq!(offset.value, 1.0);
        assert_eq!(offset.source, OffsetSource::Auto { n_used: 2 });
    }

    #[test]
    fn test_auto_clamps_to_series_length() {
        let offset = auto(10).resolve(&[1.0, 3.0]).unwrap();
        assert_eq!(offset.value, 2.0);
        assert_eq!(offset.source, OffsetSource::Auto { n_used: 2 });
    }

    #[test]
    fn test_auto_errors() {
        assert_eq!(auto(0).resolve(&[1.0]).unwrap_err(), OffsetError::ZeroSamples);
        assert_eq!(auto(3).resolve(&[]).unwrap_err(), OffsetError::EmptySeries);
        assert_eq!(
            auto(3).resolve(&[1.0, f64::NAN, 2.0]).unwrap_err(),
            OffsetError::NonFinite { index: 1 }
        );
    }

    #[test]
    fn test_manual_offset_applied() {
        let corrector = FrequencyOffsetCorrector::new(FrequencyOffsetSettings {
            enabled: true,
            mode: FrequencyOffsetMode::Manual,
            frequency_offset: 0.25,
            ..Default::default()
        });
        let offset = corrector.resolve(&[]).unwrap();
        assert_eq!(offset.source, OffsetSource::Manual);
        let measured = FrequencyOffsetCorrector::apply(&offset, &[0.75, 0.25], 71.5);
        assert_eq!(measured, vec![72.0, 71.5]);
    }
}
