//! # Project validation
//!
//! Dry run of a project without computing masses. Checks are grouped by
//! [`Stage`] in a [`ValidationReport`]:
//!
//! 1. **Configuration**: [`ProjectConfig::validate`];
//! 2. **Baselines**: both files parse and their resonance fit converges;
//! 3. **Measurement**: the file parses, PLL columns exist, sweep tables demux;
//! 4. **Position correction**: annotations parse and the correction profile
//!    can be built for the measurement length;
//! 5. **Output**: result files a run would overwrite.
//!
//! Conditions that do not stop a run (legacy sweep layout, clipped end
//! frame, overwritten results) are reported as a [`Finding`]. Stages that
//! depend on a failed stage are recorded as skipped with the reason.
//!
//! ```rust,no_run
//! use inertial_mass::config::ProjectConfig;
//! use inertial_mass::validator::validate_project;
//! use std::path::Path;
//!
//! let config = ProjectConfig::from_file(Path::new("project.toml"))?;
//! let report = validate_project(&config);
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod report;

#[cfg(test)]
mod tests;

pub use report::{CheckStatus, Finding, Stage, Tally, ValidationCheck, ValidationReport, Verdict};

use crate::config::ProjectConfig;
use crate::io::{baseline_format, measurement_format, read_annotations, read_series, read_sweep_table};
use crate::pipeline::{InertialMassPipeline, RawMeasurement};
use crate::position::{AnnotationSet, PositionCorrection, PositionCorrectionEngine};
use crate::series::{AcquisitionMode, PllSeries};
use crate::sweep::ChannelLayout;

/// Run every check against a project.
///
/// Stages that depend on a failed stage are recorded as skipped.
pub fn validate_project(config: &ProjectConfig) -> ValidationReport {
    let mut report = ValidationReport::new(config.project.name.clone());

    if let Err(e) = config.validate() {
        report.record(Stage::Configuration, "Project file", CheckStatus::Failed(e.to_string()));
        report.skip_after(Stage::Configuration, "configuration is invalid");
        return report;
    }
    report.record(Stage::Configuration, "Project file", CheckStatus::Passed);

    let pipeline = match InertialMassPipeline::new(config.pipeline_settings()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            report.record(Stage::Configuration, "Pipeline settings", CheckStatus::Failed(e.to_string()));
            report.skip_after(Stage::Configuration, "pipeline settings are invalid");
            return report;
        }
    };

    check_baselines(config, &pipeline, &mut report);
    match check_measurement(config, &pipeline, &mut report) {
        Some(n_samples) => check_position_correction(config, n_samples, &mut report),
        None => report.record(
            Stage::Correction,
            Stage::Correction.title(),
            CheckStatus::Skipped("measurement length unknown".to_string()),
        ),
    }
    check_outputs(config, &mut report);

    report
}

fn check_baselines(config: &ProjectConfig, pipeline: &InertialMassPipeline, report: &mut ValidationReport) {
    let baselines = [
        ("without cell", &config.project.baseline_no_cell),
        ("with cell", &config.project.baseline_with_cell),
    ];
    for (label, path) in baselines {
        let subject = format!("Baseline {}", label);
        let status = baseline_format(config)
            .and_then(|format| read_series(&config.resolve(path), &format))
            .map_err(|e| e.to_string())
            .and_then(|series| {
                pipeline
                    .fit_baseline(label, &series)
                    .map(|fit| (series.len(), fit.resonance_frequency))
                    .map_err(|e| e.to_string())
            });
        match status {
            Ok((points, resonance)) => report.record(
                Stage::Baselines,
                format!("{}: {} points, resonance {:.4} kHz", subject, points, resonance),
                CheckStatus::Passed,
            ),
            Err(msg) => report.record(Stage::Baselines, subject, CheckStatus::Failed(msg)),
        }
    }
}

/// Returns the number of mass samples the measurement would produce.
fn check_measurement(
    config: &ProjectConfig,
    pipeline: &InertialMassPipeline,
    report: &mut ValidationReport,
) -> Option<usize> {
    let path = config.resolve(&config.project.measurement);
    let subject = format!("{} recording", config.project.mode);

    let raw = measurement_format(config).and_then(|format| match config.project.mode {
        AcquisitionMode::Pll => read_series(&path, &format).map(|series| {
            RawMeasurement::Pll(PllSeries {
                series,
                columns: config.columns.pll,
            })
        }),
        AcquisitionMode::Sweep => {
            read_sweep_table(&path, &format, &config.sweep.channel_names).map(RawMeasurement::Sweep)
        }
    });
    let prepared = raw
        .map_err(|e| e.to_string())
        .and_then(|raw| pipeline.prepare_measurement(&raw).map_err(|e| e.to_string()));
    let n_samples = match prepared {
        Ok(measurement) => measurement.n_samples(),
        Err(msg) => {
            report.record(Stage::Measurement, subject, CheckStatus::Failed(msg));
            return None;
        }
    };

    let legacy = config.project.mode == AcquisitionMode::Sweep
        && ChannelLayout::detect(&config.sweep.channel_names).is_ok_and(|layout| layout.is_legacy());
    let status = if n_samples == 0 {
        CheckStatus::Warned(Finding::EmptyMeasurement)
    } else if legacy {
        CheckStatus::Warned(Finding::LegacyLayout)
    } else {
        CheckStatus::Passed
    };
    report.record(Stage::Measurement, format!("{}: {} samples", subject, n_samples), status);
    Some(n_samples)
}

fn check_position_correction(config: &ProjectConfig, n_samples: usize, report: &mut ValidationReport) {
    let annotations = match &config.project.annotations {
        Some(path) => match read_annotations(&config.resolve(path)) {
            Ok(set) => set,
            Err(e) => {
                report.record(Stage::Correction, "Annotations", CheckStatus::Failed(e.to_string()));
                return;
            }
        },
        None => AnnotationSet::default(),
    };

    let engine = PositionCorrectionEngine::new(
        config.cantilever.length,
        config.cantilever.cell_position,
        config.position_correction,
        config.units,
    );
    match engine.correction(&annotations, n_samples) {
        Ok(PositionCorrection::Static { factor }) => report.record(
            Stage::Correction,
            format!("Static factor {:.4}", factor),
            CheckStatus::Passed,
        ),
        Ok(PositionCorrection::Interpolated(profile)) => {
            let (start, end) = profile.range();
            let status = match profile.clipped_end() {
                Some(clipped) => CheckStatus::Warned(Finding::ClippedEnd {
                    requested: clipped.requested,
                    used: clipped.used,
                }),
                None => CheckStatus::Passed,
            };
            report.record(
                Stage::Correction,
                format!("{} annotated frames, samples {}..={}", annotations.len(), start, end),
                status,
            );
        }
        Err(e) => report.record(Stage::Correction, "Profile", CheckStatus::Failed(e.to_string())),
    }
}

fn check_outputs(config: &ProjectConfig, report: &mut ValidationReport) {
    let mut existing = vec![config.mass_output_path()];
    if config.output.write_fits {
        existing.push(config.fits_output_path());
    }
    existing.retain(|p| p.exists());

    let status = if existing.is_empty() {
        CheckStatus::Passed
    } else {
        CheckStatus::Warned(Finding::Overwrite(existing))
    };
    report.record(Stage::Output, "Result files", status);
}
