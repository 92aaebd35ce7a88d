//! Deterministic synthetic recordings.
//!
//! Generates baseline sweeps, PLL tables and sweep tables in instrument units
//! (Hz, degrees) from the phase-response model, for the `imd demo` command,
//! tests and benchmarks. [`write_demo_project`] lays a complete PLL project
//! out on disk.

use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use crate::config::ProjectConfig;
use crate::fit::model::{phase_response, N_PARAMS};
use crate::fit::FitSettings;
use crate::io::{baseline_format, measurement_format, write_annotations, write_series, IoError};
use crate::position::PositionCorrectionAnnotation;
use crate::series::{DataFormatError, PllColumns, PllSeries, RawSeries, RawSweepTable, SweepTimestamp};
use crate::units::UnitConverter;

/// Resonator used to synthesize recordings (frequencies in kHz)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticCantilever {
    /// Resonance without cell
    pub f_no_cell: f64,
    /// Resonance with cell
    pub f_with_cell: f64,
    /// Half linewidth
    pub width: f64,
    /// Phase swing
    pub amplitude: f64,
    /// Phase at resonance (rad)
    pub phase_offset: f64,
    /// Sweep half-span around the resonance
    pub span: f64,
    /// Points per sweep
    pub points: usize,
    /// Conversion to instrument units
    pub units: UnitConverter,
}

impl Default for SyntheticCantilever {
    fn default() -> Self {
        Self {
            f_no_cell: 72.8,
            f_with_cell: 71.9,
            width: 0.5,
            amplitude: 1.0,
            phase_offset: -FRAC_PI_2,
            span: 1.5,
            points: 121,
            units: UnitConverter::default(),
        }
    }
}

impl SyntheticCantilever {
    /// Model parameters for a resonance at `center`
    pub fn parameters(&self, center: f64) -> [f64; N_PARAMS] {
        [self.amplitude, center, self.width, self.phase_offset]
    }

    /// Fit settings whose initial guess sits between both baselines
    pub fn fit_settings(&self) -> FitSettings {
        FitSettings {
            initial_guess: [1.0, 0.5 * (self.f_no_cell + self.f_with_cell), self.width, -1.0],
            ..Default::default()
        }
    }

    /// Sweep points `(frequency kHz, amplitude, phase rad)` around `center`
    fn sweep_points(&self, center: f64) -> Vec<(f64, f64, f64)> {
        let p = self.parameters(center);
        let step = 2.0 * self.span / (self.points.max(2) - 1) as f64;
        (0..self.points)
            .map(|i| {
                let f = center - self.span + i as f64 * step;
                let u = (f - center) / self.width;
                (f, 1.0 / (1.0 + u * u).sqrt(), phase_response(f, &p))
            })
            .collect()
    }

    /// Baseline recording `[frequency Hz, amplitude, phase deg]`
    pub fn baseline(&self, center: f64) -> Result<RawSeries, DataFormatError> {
        let columns = self.sweep_points(center).into_iter().fold(
            vec![Vec::<f64>::new(), Vec::new(), Vec::new()],
            |mut cols, (f, a, phi)| {
                cols[0].push(f * self.units.hz_to_khz);
                cols[1].push(a);
                cols[2].push(phi * self.units.deg_to_rad);
                cols
            },
        );
        RawSeries::from_columns(columns)
    }

    /// PLL table `[time s, amplitude, phase deg, shift Hz]` with one row per
    /// shift (kHz), sampled every `dt` seconds.
    pub fn pll(&self, shifts_khz: &[f64], dt: f64) -> Result<PllSeries, DataFormatError> {
        let n = shifts_khz.len();
        let time: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
        let amplitude = vec![1.0; n];
        let phase = vec![self.phase_offset * self.units.deg_to_rad; n];
        let shift: Vec<f64> = shifts_khz.iter().map(|s| s * self.units.hz_to_khz).collect();
        Ok(PllSeries {
            series: RawSeries::from_columns(vec![time, amplitude, phase, shift])?,
            columns: PllColumns::default(),
        })
    }

    /// Sweep table with one canonical block per resonance in `centers`,
    /// timestamps `t0 + i * dt` epoch seconds.
    pub fn sweep_table(&self, centers: &[f64], t0: f64, dt: f64) -> RawSweepTable {
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(3 * centers.len());
        for &center in centers {
            let points = self.sweep_points(center);
            rows.push(points.iter().map(|&(_, a, _)| a).collect());
            rows.push(points.iter().map(|&(_, _, phi)| phi * self.units.deg_to_rad).collect());
            rows.push(points.iter().map(|&(f, _, _)| f * self.units.hz_to_khz).collect());
        }
        RawSweepTable {
            channel_names: ["Amplitude", "Phase", "Frequency", "Untitled 3"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows,
            timestamps: (0..centers.len())
                .map(|i| SweepTimestamp::Seconds(t0 + i as f64 * dt))
                .collect(),
        }
    }
}

/// Samples in the demo PLL recording
pub const DEMO_SAMPLES: usize = 240;

/// Write a synthetic PLL project into `dir`: both baselines (with an
/// instrument-style header), a PLL table of a slowly growing cell sampled
/// once a minute, and position annotations every 40 samples up to sample 200.
///
/// Returns the matching project configuration, based at `dir`.
pub fn write_demo_project(dir: &Path, cantilever: &SyntheticCantilever) -> Result<ProjectConfig, IoError> {
    let mut config = ProjectConfig::default().with_base_dir(dir);
    config.project.name = "synthetic demo".to_string();
    config.project.annotations = Some("annotations.csv".into());
    config.fit = cantilever.fit_settings();
    config.units = cantilever.units;
    config.output.rolling_window = 30;
    config.position_correction.samples_per_frame = 40;
    config.position_correction.zero_outside_correction_range = false;

    let header: Vec<String> = (0..config.project.baseline_header_lines)
        .map(|i| match i {
            0 => "Synthetic cantilever sweep".to_string(),
            1 => "Frequency (Hz)\tAmplitude (V)\tPhase (deg)".to_string(),
            _ => format!("# header line {}", i + 1),
        })
        .collect();
    let format = baseline_format(&config)?;
    write_series(
        &config.resolve(&config.project.baseline_no_cell),
        &cantilever.baseline(cantilever.f_no_cell)?,
        &format,
        &header,
    )?;
    write_series(
        &config.resolve(&config.project.baseline_with_cell),
        &cantilever.baseline(cantilever.f_with_cell)?,
        &format,
        &header,
    )?;

    // the cell keeps growing: the resonance keeps dropping below f_with_cell
    let shifts: Vec<f64> = (0..DEMO_SAMPLES)
        .map(|i| -5e-4 * i as f64 + 5e-4 * (i as f64 / 7.0).sin())
        .collect();
    let pll = cantilever.pll(&shifts, 60.0)?;
    write_series(
        &config.resolve(&config.project.measurement),
        &pll.series,
        &measurement_format(&config)?,
        &[],
    )?;

    let annotations: Vec<PositionCorrectionAnnotation> = (1..=6)
        .map(|frame| PositionCorrectionAnnotation {
            frame_index: frame,
            tip_offset: Some(if frame % 2 == 0 { 3.5 } else { 3.0 }),
            object_area: Some(150.0 + 10.0 * frame as f64),
            ..Default::default()
        })
        .collect();
    if let Some(path) = &config.project.annotations {
        write_annotations(&config.resolve(path), &annotations)?;
    }

    Ok(config)
}
