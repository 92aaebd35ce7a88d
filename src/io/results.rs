use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::IoError;
use crate::fit::ResonanceFit;
use crate::mass::MassSeries;
use crate::offset::ResolvedOffset;
use crate::pipeline::{PipelineOutput, RunStats, SkippedSample};
use crate::position::{ClippedEnd, PositionCorrection};

/// Column headers of the mass CSV
pub const MASS_HEADERS: [&str; 4] = ["Time (h)", "Mass (ng)", "Mean mass (ng)", "Object area (um_sq)"];

/// Text written for missing values
pub const MISSING_VALUE: &str = "nan";

fn format_value(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        MISSING_VALUE.to_string()
    }
}

/// Write the mass series as CSV; the area column only when present.
pub fn write_mass_csv(path: &Path, series: &MassSeries) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::open(path, e))?;
    write_mass_csv_to(file, series)
}

/// Write the mass series as CSV to any writer.
pub fn write_mass_csv_to<W: Write>(writer: W, series: &MassSeries) -> Result<(), IoError> {
    let with_area = series.has_object_area();
    let n_columns = if with_area { 4 } else { 3 };

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&MASS_HEADERS[..n_columns])?;
    for record in series.records() {
        let mut fields = vec![
            format_value(record.elapsed_time_hours),
            format_value(record.mass_ng),
            format_value(record.rolling_mean_mass_ng),
        ];
        if with_area {
            fields.push(format_value(record.object_area_um2.unwrap_or(f64::NAN)));
        }
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

/// Position correction without the dense arrays
#[derive(Debug, Clone, Serialize)]
struct CorrectionSummary {
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    floor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clipped_end: Option<ClippedEnd>,
}

impl From<&PositionCorrection> for CorrectionSummary {
    fn from(correction: &PositionCorrection) -> Self {
        match correction {
            PositionCorrection::Static { factor } => CorrectionSummary {
                mode: "static",
                factor: Some(*factor),
                range: None,
                floor: None,
                clipped_end: None,
            },
            PositionCorrection::Interpolated(profile) => CorrectionSummary {
                mode: "interpolated",
                factor: None,
                range: Some(profile.range()),
                floor: Some(profile.floor()),
                clipped_end: profile.clipped_end(),
            },
        }
    }
}

/// Fit diagnostics document
#[derive(Debug, Serialize)]
struct FitReport<'a> {
    baseline_no_cell: &'a ResonanceFit,
    baseline_with_cell: &'a ResonanceFit,
    frequency_offset: &'a ResolvedOffset,
    position_correction: CorrectionSummary,
    stats: &'a RunStats,
    sweep_fits: &'a [Option<ResonanceFit>],
    skipped_samples: &'a [SkippedSample],
}

/// Write baseline fits, offset, correction summary and per-sweep fits as JSON.
pub fn write_fits_json(path: &Path, output: &PipelineOutput) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::open(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &fit_report(output))?;
    writer.flush()?;
    Ok(())
}

/// Render the fit diagnostics as a JSON string
pub fn fits_to_json(output: &PipelineOutput) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(&fit_report(output))?)
}

fn fit_report(output: &PipelineOutput) -> FitReport<'_> {
    FitReport {
        baseline_no_cell: &output.baseline_no_cell,
        baseline_with_cell: &output.baseline_with_cell,
        frequency_offset: &output.frequency_offset,
        position_correction: CorrectionSummary::from(&output.position_correction),
        stats: &output.stats,
        sweep_fits: &output.sweep_fits,
        skipped_samples: &output.skipped_samples,
    }
}
