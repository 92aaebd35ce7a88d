//! # File input and output
//!
//! Readers for the three recordings of a run and the optional annotation
//! table, plus writers for the result files.
//!
//! ## Inputs
//!
//! - baselines and PLL tables: delimited numeric text, a fixed number of
//!   header lines skipped ([`read_series`]);
//! - sweep tables: one line per channel per sweep, the sweep timestamp in the
//!   last field ([`read_sweep_table`]);
//! - annotations: CSV with a header row ([`read_annotations`]);
//! - data-logger chunks: one file per acquisition chunk, joined into a single
//!   PLL table with a synthesized time column ([`concatenate_series`]).
//!
//! ## Outputs
//!
//! - the mass series as CSV ([`write_mass_csv`]), missing values written as
//!   `nan`;
//! - fit diagnostics as JSON ([`write_fits_json`]).
//!
//! [`load_project_input`] and [`write_project_results`] wire these to a
//! [`ProjectConfig`].

mod annotations;
mod concat;
mod error;
mod results;
mod sweep;
mod text;

#[cfg(test)]
mod tests;

use log::{debug, info};

pub use annotations::{read_annotations, read_annotations_from, write_annotations};
pub use concat::{concatenate_series, logger_files};
pub use error::IoError;
pub use results::{fits_to_json, write_fits_json, write_mass_csv, write_mass_csv_to, MASS_HEADERS, MISSING_VALUE};
pub use sweep::{read_sweep_table, read_sweep_table_from, write_sweep_table};
pub use text::{read_series, read_series_from, write_series, TextFormat};

use crate::config::ProjectConfig;
use crate::pipeline::{PipelineInput, PipelineOutput, RawMeasurement};
use crate::position::AnnotationSet;
use crate::series::{AcquisitionMode, PllSeries};

/// Text layout of the baseline files
pub fn baseline_format(config: &ProjectConfig) -> Result<TextFormat, IoError> {
    TextFormat::new(config.project.delimiter, config.project.baseline_header_lines)
}

/// Text layout of the measurement file
pub fn measurement_format(config: &ProjectConfig) -> Result<TextFormat, IoError> {
    TextFormat::new(config.project.delimiter, config.project.measurement_header_lines)
}

/// Read every input a project references.
pub fn load_project_input(config: &ProjectConfig) -> Result<PipelineInput, IoError> {
    let project = &config.project;
    let baseline_fmt = baseline_format(config)?;

    let path = config.resolve(&project.baseline_no_cell);
    debug!("Reading baseline without cell from {}", path.display());
    let baseline_no_cell = read_series(&path, &baseline_fmt)?;

    let path = config.resolve(&project.baseline_with_cell);
    debug!("Reading baseline with cell from {}", path.display());
    let baseline_with_cell = read_series(&path, &baseline_fmt)?;

    let path = config.resolve(&project.measurement);
    let measurement_fmt = measurement_format(config)?;
    let measurement = match project.mode {
        AcquisitionMode::Pll => {
            debug!("Reading PLL measurement from {}", path.display());
            RawMeasurement::Pll(PllSeries {
                series: read_series(&path, &measurement_fmt)?,
                columns: config.columns.pll,
            })
        }
        AcquisitionMode::Sweep => {
            debug!("Reading sweep table from {}", path.display());
            RawMeasurement::Sweep(read_sweep_table(&path, &measurement_fmt, &config.sweep.channel_names)?)
        }
    };

    let annotations = match &project.annotations {
        Some(path) => {
            let path = config.resolve(path);
            debug!("Reading annotations from {}", path.display());
            read_annotations(&path)?
        }
        None => AnnotationSet::default(),
    };

    Ok(PipelineInput {
        baseline_no_cell,
        baseline_with_cell,
        measurement,
        annotations,
    })
}

/// Write the mass CSV and, when enabled, the fit JSON into the project's
/// output directory (created if missing).
pub fn write_project_results(config: &ProjectConfig, output: &PipelineOutput) -> Result<(), IoError> {
    let dir = config.resolve(&config.project.output_dir);
    std::fs::create_dir_all(&dir).map_err(|e| IoError::open(&dir, e))?;

    let mass_path = config.mass_output_path();
    write_mass_csv(&mass_path, &output.mass)?;
    info!("Wrote {} mass samples to {}", output.mass.len(), mass_path.display());

    if config.output.write_fits {
        let fits_path = config.fits_output_path();
        write_fits_json(&fits_path, output)?;
        info!("Wrote fit diagnostics to {}", fits_path.display());
    }
    Ok(())
}
