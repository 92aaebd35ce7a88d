use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RawSeries, SweepSeries};

/// Acquisition mode of the long-term measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcquisitionMode {
    /// Phase-locked loop: one frequency-shift sample per time step
    #[default]
    Pll,
    /// Repeated frequency sweeps: one resonance fit per sweep
    Sweep,
}

impl AcquisitionMode {
    /// Returns all accepted mode names.
    pub fn variants() -> &'static [&'static str] {
        &["pll", "sweep"]
    }
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionMode::Pll => write!(f, "pll"),
            AcquisitionMode::Sweep => write!(f, "sweep"),
        }
    }
}

impl FromStr for AcquisitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pll" => Ok(AcquisitionMode::Pll),
            "sweep" | "cont.sweep" | "continuous-sweep" => Ok(AcquisitionMode::Sweep),
            _ => Err(format!(
                "Unknown acquisition mode '{}'. Valid options: {}",
                s,
                AcquisitionMode::variants().join(", ")
            )),
        }
    }
}

/// Column roles of a baseline recording (frequency sweep of the free cantilever)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineColumns {
    /// Excitation frequency column
    pub frequency: usize,
    /// Amplitude column
    pub amplitude: usize,
    /// Phase column
    pub phase: usize,
}

impl Default for BaselineColumns {
    fn default() -> Self {
        Self {
            frequency: 0,
            amplitude: 1,
            phase: 2,
        }
    }
}

/// Column roles of a PLL measurement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PllColumns {
    /// Time stamp column (seconds)
    pub time: usize,
    /// Amplitude column
    pub amplitude: usize,
    /// Phase column
    pub phase: usize,
    /// Frequency shift column
    pub frequency_shift: usize,
}

impl Default for PllColumns {
    fn default() -> Self {
        Self {
            time: 0,
            amplitude: 1,
            phase: 2,
            frequency_shift: 3,
        }
    }
}

/// PLL measurement: the raw table plus its column roles
#[derive(Debug, Clone, PartialEq)]
pub struct PllSeries {
    /// Raw samples
    pub series: RawSeries,
    /// Column roles
    pub columns: PllColumns,
}

/// Long-term measurement in either acquisition mode.
///
/// Each pipeline stage matches on this once instead of re-checking a mode flag.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    /// Phase-locked-loop streaming data
    Pll(PllSeries),
    /// Demuxed sweep data
    Sweep(SweepSeries),
}

impl Measurement {
    /// Acquisition mode of this measurement
    pub fn mode(&self) -> AcquisitionMode {
        match self {
            Measurement::Pll(_) => AcquisitionMode::Pll,
            Measurement::Sweep(_) => AcquisitionMode::Sweep,
        }
    }

    /// Number of mass samples the measurement will produce
    /// (rows in PLL mode, sweeps in sweep mode).
    pub fn n_samples(&self) -> usize {
        match self {
            Measurement::Pll(pll) => pll.series.len(),
            Measurement::Sweep(sweep) => sweep.n_sweeps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(AcquisitionMode::from_str("PLL").unwrap(), AcquisitionMode::Pll);
        assert_eq!(
            AcquisitionMode::from_str("Cont.Sweep").unwrap(),
            AcquisitionMode::Sweep
        );
        assert!(AcquisitionMode::from_str("auto").is_err());
    }

    #[test]
    fn test_sample_count_per_mode() {
        let series = RawSeries::from_rows(vec![vec![0.0, 1.0, 2.0, 3.0]; 5]).unwrap();
        let pll = Measurement::Pll(PllSeries {
            series,
            columns: PllColumns::default(),
        });
        assert_eq!(pll.n_samples(), 5);
        assert_eq!(pll.mode(), AcquisitionMode::Pll);

        let sweep = SweepSeries::new(vec![vec![0.0; 4]; 6], vec![0.0, 1.0]).unwrap();
        assert_eq!(Measurement::Sweep(sweep).n_samples(), 2);
    }
}
