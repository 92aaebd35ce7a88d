//! # Inertial mass pipeline
//!
//! Orchestrates one run over a complete dataset:
//!
//! 1. demux the sweep table (sweep mode only);
//! 2. convert units of baselines and measurement;
//! 3. fit the resonance of both baselines (failure is fatal);
//! 4. build the position correction and, for PLL data, resolve the frequency
//!    offset;
//! 5. compute the corrected mass per sample (PLL) or per fitted sweep;
//! 6. assemble the [`MassSeries`] with its rolling mean.
//!
//! A sample whose mass cannot be computed (a sweep whose fit fails, or a PLL
//! frequency that is not finite and positive) yields a NaN mass and a
//! [`SkippedSample`] record instead of aborting the run.

mod error;
mod stats;
mod sweeps;


use log::{info, warn};
use serde::{Deserialize, Serialize};

pub use error::PipelineError;
pub use stats::RunStats;

use crate::fit::{FitSettings, ResonanceFit, ResonanceFrequencyFitter};
use crate::mass::{MassCalculator, MassSeries};
use crate::offset::{FrequencyOffsetCorrector, FrequencyOffsetSettings, ResolvedOffset};
use crate::position::{AnnotationSet, PositionCorrection, PositionCorrectionEngine, PositionCorrectionSettings};
use crate::series::{BaselineColumns, Measurement, PllSeries, RawSeries, RawSweepTable, SweepSeries};
use crate::sweep::SweepDemuxer;
use crate::units::UnitConverter;

/// Everything the pipeline needs besides the data
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Cantilever spring constant (N/m)
    pub spring_constant: f64,
    /// Cantilever length (µm)
    pub cantilever_length: f64,
    /// Static cell offset from the tip (µm)
    pub cell_position: f64,
    /// Resonance fit guess, bounds and solver budget
    pub fit: FitSettings,
    /// Unit conversion factors
    pub units: UnitConverter,
    /// PLL drift correction
    pub frequency_offset: FrequencyOffsetSettings,
    /// Annotation range policy
    pub position_correction: PositionCorrectionSettings,
    /// Column roles of both baseline recordings
    pub baseline_columns: BaselineColumns,
    /// Rolling mean window (samples)
    pub rolling_window: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            spring_constant: 8.0,
            cantilever_length: 100.0,
            cell_position: 0.0,
            fit: FitSettings::default(),
            units: UnitConverter::default(),
            frequency_offset: FrequencyOffsetSettings::default(),
            position_correction: PositionCorrectionSettings::default(),
            baseline_columns: BaselineColumns::default(),
            rolling_window: 1000,
        }
    }
}

/// Long-term measurement as read from disk
#[derive(Debug, Clone, PartialEq)]
pub enum RawMeasurement {
    /// PLL table
    Pll(PllSeries),
    /// Un-demuxed sweep table
    Sweep(RawSweepTable),
}

/// Data of one run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInput {
    /// Baseline sweep of the free cantilever
    pub baseline_no_cell: RawSeries,
    /// Baseline sweep after the cell was attached
    pub baseline_with_cell: RawSeries,
    /// Long-term measurement
    pub measurement: RawMeasurement,
    /// Per-frame position annotations (may be empty)
    pub annotations: AnnotationSet,
}

/// A sample (PLL) or sweep that produced no mass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSample {
    /// Sample or sweep index
    pub index: usize,
    /// Error message
    pub reason: String,
}

impl SkippedSample {
    fn new(index: usize, reason: impl ToString) -> Self {
        let reason = reason.to_string();
        warn!("Skipping sample {}: {}", index, reason);
        Self { index, reason }
    }
}

/// Results of one run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Fit of the baseline without cell
    pub baseline_no_cell: ResonanceFit,
    /// Fit of the baseline with cell
    pub baseline_with_cell: ResonanceFit,
    /// Per-sweep fits (sweep mode); `None` where the fit failed
    pub sweep_fits: Vec<Option<ResonanceFit>>,
    /// Samples or sweeps that produced no mass
    pub skipped_samples: Vec<SkippedSample>,
    /// Frequency offset applied (PLL mode)
    pub frequency_offset: ResolvedOffset,
    /// Correction applied to every sample
    pub position_correction: PositionCorrection,
    /// Final mass series
    pub mass: MassSeries,
    /// Run summary
    pub stats: RunStats,
}

/// Runs the full mass determination over one dataset
#[derive(Debug, Clone)]
pub struct InertialMassPipeline {
    settings: PipelineSettings,
    fitter: ResonanceFrequencyFitter,
    calculator: MassCalculator,
    offset: FrequencyOffsetCorrector,
    position: PositionCorrectionEngine,
}

impl InertialMassPipeline {
    /// Validate settings and build the stage components.
    pub fn new(settings: PipelineSettings) -> Result<Self, PipelineError> {
        settings.units.validate().map_err(PipelineError::InvalidSettings)?;
        if settings.rolling_window == 0 {
            return Err(PipelineError::InvalidSettings(
                "rolling window must be >= 1".to_string(),
            ));
        }
        let fitter = settings.fit.fitter()?;
        let calculator = MassCalculator::new(settings.spring_constant)
            .map_err(|e| PipelineError::InvalidSettings(e.to_string()))?;
        let offset = FrequencyOffsetCorrector::new(settings.frequency_offset);
        let position = PositionCorrectionEngine::new(
            settings.cantilever_length,
            settings.cell_position,
            settings.position_correction,
            settings.units,
        );
        Ok(Self {
            settings,
            fitter,
            calculator,
            offset,
            position,
        })
    }

    /// Settings in use
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Demux (sweep mode) and convert the measurement into computation units.
    pub fn prepare_measurement(&self, raw: &RawMeasurement) -> Result<Measurement, PipelineError> {
        let measurement = match raw {
            RawMeasurement::Pll(pll) => {
                pll.series
                    .require_columns(&[pll.columns.time, pll.columns.phase, pll.columns.frequency_shift])
                    .map_err(|source| PipelineError::DataFormat {
                        input: "measurement",
                        source,
                    })?;
                Measurement::Pll(pll.clone())
            }
            RawMeasurement::Sweep(table) => {
                let series = SweepDemuxer::new()
                    .demux(table)
                    .map_err(|source| PipelineError::DataFormat {
                        input: "measurement",
                        source,
                    })?;
                Measurement::Sweep(series)
            }
        };
        self.settings
            .units
            .convert_measurement(&measurement)
            .map_err(|source| PipelineError::DataFormat {
                input: "measurement",
                source,
            })
    }

    /// Convert and fit one baseline recording.
    pub fn fit_baseline(&self, baseline: &'static str, raw: &RawSeries) -> Result<ResonanceFit, PipelineError> {
        let columns = &self.settings.baseline_columns;
        let data_error = |source| PipelineError::DataFormat { input: baseline, source };
        let converted = self.settings.units.convert_baseline(raw, columns).map_err(data_error)?;
        let frequency = converted.column(columns.frequency).map_err(data_error)?;
        let phase = converted.column(columns.phase).map_err(data_error)?;

        let fit = self
            .fitter
            .fit(frequency, phase)
            .map_err(|source| PipelineError::BaselineFit { baseline, source })?;
        info!(
            "Baseline {}: resonance {:.6} kHz ({} iterations)",
            baseline, fit.resonance_frequency, fit.iterations
        );
        Ok(fit)
    }

    /// Run the full pipeline.
    pub fn run(&self, input: &PipelineInput) -> Result<PipelineOutput, PipelineError> {
        let measurement = self.prepare_measurement(&input.measurement)?;
        let baseline_no_cell = self.fit_baseline("without cell", &input.baseline_no_cell)?;
        let baseline_with_cell = self.fit_baseline("with cell", &input.baseline_with_cell)?;

        let n_samples = measurement.n_samples();
        let position_correction = self.position.correction(&input.annotations, n_samples)?;

        let f_no_cell = baseline_no_cell.resonance_frequency;
        let f_with_cell = baseline_with_cell.resonance_frequency;

        let (timestamps, masses, frequency_offset, sweep_fits, skipped_samples) = match &measurement {
            Measurement::Pll(pll) => {
                let (timestamps, masses, offset, skipped) =
                    self.pll_masses(pll, f_no_cell, f_with_cell, &position_correction)?;
                (timestamps, masses, offset, Vec::new(), skipped)
            }
            Measurement::Sweep(sweeps) => {
                if self.settings.frequency_offset.enabled {
                    info!("Frequency offset correction does not apply to sweep measurements; ignoring");
                }
                let (masses, fits, skipped) = self.sweep_masses(sweeps, f_no_cell, &position_correction);
                (
                    sweeps.timestamps().to_vec(),
                    masses,
                    ResolvedOffset::disabled(),
                    fits,
                    skipped,
                )
            }
        };

        let mass = MassSeries::new(
            &timestamps,
            &masses,
            position_correction.areas(),
            self.settings.rolling_window,
        )?;

        let stats = RunStats {
            mode: measurement.mode(),
            samples: mass.len(),
            valid_samples: mass.n_valid(),
            skipped_samples: skipped_samples.len(),
            f_no_cell,
            f_with_cell,
            mean_mass_ng: mass.mean_mass(),
        };
        info!("{}", stats);

        Ok(PipelineOutput {
            baseline_no_cell,
            baseline_with_cell,
            sweep_fits,
            skipped_samples,
            frequency_offset,
            position_correction,
            mass,
            stats,
        })
    }

    #[allow(clippy::type_complexity)]
    fn pll_masses(
        &self,
        pll: &PllSeries,
        f_no_cell: f64,
        f_with_cell: f64,
        correction: &PositionCorrection,
    ) -> Result<(Vec<f64>, Vec<f64>, ResolvedOffset, Vec<SkippedSample>), PipelineError> {
        let data_error = |source| PipelineError::DataFormat {
            input: "measurement",
            source,
        };
        let timestamps = pll.series.column(pll.columns.time).map_err(data_error)?.to_vec();
        let shifts = pll.series.column(pll.columns.frequency_shift).map_err(data_error)?;

        let offset = self.offset.resolve(shifts)?;
        let measured = FrequencyOffsetCorrector::apply(&offset, shifts, f_with_cell);

        let mut skipped = Vec::new();
        let masses = measured
            .iter()
            .enumerate()
            .map(|(sample, &f)| {
                self.calculator
                    .corrected_mass(f, f_no_cell, correction.factor_at(sample))
                    .unwrap_or_else(|err| {
                        skipped.push(SkippedSample::new(sample, err));
                        f64::NAN
                    })
            })
            .collect();
        Ok((timestamps, masses, offset, skipped))
    }

    fn sweep_masses(
        &self,
        series: &SweepSeries,
        f_no_cell: f64,
        correction: &PositionCorrection,
    ) -> (Vec<f64>, Vec<Option<ResonanceFit>>, Vec<SkippedSample>) {
        let results = sweeps::fit_sweeps(&self.fitter, series);

        let mut masses = Vec::with_capacity(results.len());
        let mut fits = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(fit) => {
                    let mass = self
                        .calculator
                        .corrected_mass(fit.resonance_frequency, f_no_cell, correction.factor_at(index))
                        .unwrap_or_else(|err| {
                            skipped.push(SkippedSample::new(index, err));
                            f64::NAN
                        });
                    masses.push(mass);
                    fits.push(Some(fit));
                }
                Err(err) => {
                    skipped.push(SkippedSample::new(index, err));
                    masses.push(f64::NAN);
                    fits.push(None);
                }
            }
        }
        (masses, fits, skipped)
    }
}
