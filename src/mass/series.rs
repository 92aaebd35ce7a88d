use serde::{Deserialize, Serialize};

use super::{rolling_mean, MassError};

/// Seconds per hour
const SECONDS_PER_HOUR: f64 = 3600.0;

/// One output row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassRecord {
    /// Time since the first sample (h)
    pub elapsed_time_hours: f64,
    /// Corrected mass (ng); NaN for skipped samples
    pub mass_ng: f64,
    /// Trailing rolling mean of the mass (ng)
    pub rolling_mean_mass_ng: f64,
    /// Object area (µm²) when annotations were used
    pub object_area_um2: Option<f64>,
}

/// Final mass time series, one record per sample (PLL) or sweep
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MassSeries {
    records: Vec<MassRecord>,
    rolling_window: usize,
}

impl MassSeries {
    /// Assemble the series from timestamps (s), masses and optional areas.
    pub fn new(
        timestamps_s: &[f64],
        masses_ng: &[f64],
        object_areas_um2: Option<&[f64]>,
        rolling_window: usize,
    ) -> Result<Self, MassError> {
        if masses_ng.len() != timestamps_s.len() {
            return Err(MassError::LengthMismatch {
                column: "mass",
                expected: timestamps_s.len(),
                found: masses_ng.len(),
            });
        }
        if let Some(areas) = object_areas_um2 {
            if areas.len() != timestamps_s.len() {
                return Err(MassError::LengthMismatch {
                    column: "object_area",
                    expected: timestamps_s.len(),
                    found: areas.len(),
                });
            }
        }

        let rolling = rolling_mean(masses_ng, rolling_window)?;
        let t0 = timestamps_s.first().copied().unwrap_or(0.0);
        let records = (0..timestamps_s.len())
            .map(|i| MassRecord {
                elapsed_time_hours: (timestamps_s[i] - t0) / SECONDS_PER_HOUR,
                mass_ng: masses_ng[i],
                rolling_mean_mass_ng: rolling[i],
                object_area_um2: object_areas_um2.map(|a| a[i]),
            })
            .collect();

        Ok(Self {
            records,
            rolling_window,
        })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the series is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in time order
    pub fn records(&self) -> &[MassRecord] {
        &self.records
    }

    /// Window used for the rolling mean
    pub fn rolling_window(&self) -> usize {
        self.rolling_window
    }

    /// True when the series carries an object-area column
    pub fn has_object_area(&self) -> bool {
        self.records.first().is_some_and(|r| r.object_area_um2.is_some())
    }

    /// Mass column (ng)
    pub fn masses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.mass_ng).collect()
    }

    /// Number of finite mass values
    pub fn n_valid(&self) -> usize {
        self.records.iter().filter(|r| r.mass_ng.is_finite()).count()
    }

    /// Mean of the finite masses, if any
    pub fn mean_mass(&self) -> Option<f64> {
        let valid: Vec<f64> = self
            .records
            .iter()
            .map(|r| r.mass_ng)
            .filter(|m| m.is_finite())
            .collect();
        (!valid.is_empty()).then(|| valid.iter().sum::<f64>() / valid.len() as f64)
    }
}
