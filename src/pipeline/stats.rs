use std::fmt;

use serde::Serialize;

use crate::series::AcquisitionMode;

/// Summary of a completed pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    /// Acquisition mode of the measurement
    pub mode: AcquisitionMode,
    /// Mass samples produced
    pub samples: usize,
    /// Samples with a finite mass
    pub valid_samples: usize,
    /// Samples or sweeps that produced no mass
    pub skipped_samples: usize,
    /// Resonance frequency without cell (kHz)
    pub f_no_cell: f64,
    /// Resonance frequency with cell (kHz)
    pub f_with_cell: f64,
    /// Mean of the finite masses (ng)
    pub mean_mass_ng: Option<f64>,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Computed {} mass values ({} valid, {} skipped) in {} mode; f0 = {:.6} kHz, f1 = {:.6} kHz",
            self.samples, self.valid_samples, self.skipped_samples, self.mode, self.f_no_cell, self.f_with_cell
        )?;
        if let Some(mean) = self.mean_mass_ng {
            write!(f, ", mean mass {:.4} ng", mean)?;
        }
        Ok(())
    }
}
