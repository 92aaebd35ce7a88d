use std::path::{Path, PathBuf};

use log::{debug, info};

use super::text::read_series;
use super::{IoError, TextFormat};
use crate::series::RawSeries;

/// Data files in `dir` with the given extension, sorted by file name.
pub fn logger_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, IoError> {
    let entries = std::fs::read_dir(dir).map_err(|e| IoError::open(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if path.is_file() && matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Append logger files in order and prepend a time column (s) with samples
/// `time_interval_ms` apart, starting at 0.
pub fn concatenate_series(files: &[PathBuf], format: &TextFormat, time_interval_ms: f64) -> Result<RawSeries, IoError> {
    if !(time_interval_ms.is_finite() && time_interval_ms > 0.0) {
        return Err(IoError::InvalidInterval(time_interval_ms));
    }
    let dt = time_interval_ms / 1000.0;

    let mut rows = Vec::new();
    for path in files {
        let series = read_series(path, format)?;
        debug!("{}: {} rows", path.display(), series.len());
        let columns = (0..series.n_columns())
            .map(|c| series.column(c))
            .collect::<Result<Vec<_>, _>>()?;
        for r in 0..series.len() {
            let mut row = Vec::with_capacity(columns.len() + 1);
            row.push(rows.len() as f64 * dt);
            row.extend(columns.iter().map(|c| c[r]));
            rows.push(row);
        }
    }
    info!("Concatenated {} files into {} samples", files.len(), rows.len());
    Ok(RawSeries::from_rows(rows)?)
}
