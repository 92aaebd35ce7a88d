use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::DataFormatError;

/// Timestamp attached to one sweep as delivered by the acquisition software
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SweepTimestamp {
    /// Already numeric (seconds since the Unix epoch)
    Seconds(f64),
    /// Date-time text, RFC 3339 or `YYYY-MM-DD HH:MM:SS[.fff]` (UTC)
    Text(String),
}

impl SweepTimestamp {
    /// Convert to seconds since the Unix epoch.
    pub fn to_epoch_seconds(&self, sweep: usize) -> Result<f64, DataFormatError> {
        match self {
            SweepTimestamp::Seconds(s) if s.is_finite() => Ok(*s),
            SweepTimestamp::Seconds(s) => Err(DataFormatError::InvalidTimestamp {
                sweep,
                value: s.to_string(),
            }),
            SweepTimestamp::Text(text) => parse_timestamp_text(text).ok_or_else(|| {
                DataFormatError::InvalidTimestamp {
                    sweep,
                    value: text.clone(),
                }
            }),
        }
    }
}

fn parse_timestamp_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(seconds) = text.parse::<f64>() {
        return seconds.is_finite().then_some(seconds);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(micros_to_seconds(dt.timestamp_micros()));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%d.%m.%Y %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(micros_to_seconds(naive.and_utc().timestamp_micros()));
        }
    }
    None
}

fn micros_to_seconds(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}

/// Sweep-mode data exactly as acquired, before demuxing.
///
/// `rows` holds one row per channel per sweep, in acquisition order. Channel
/// names come from the acquisition metadata and identify the role of each row
/// inside a block. Timestamps are one per sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSweepTable {
    /// Channel names in acquisition-metadata order
    pub channel_names: Vec<String>,
    /// Sweep rows (all of equal length)
    pub rows: Vec<Vec<f64>>,
    /// One timestamp per sweep
    pub timestamps: Vec<SweepTimestamp>,
}

/// Canonical sweep data: three rows per sweep in a fixed order.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSeries {
    rows: Vec<Vec<f64>>,
    timestamps: Vec<f64>,
}

/// Borrowed view of a single canonical sweep
#[derive(Debug, Clone, Copy)]
pub struct SweepView<'a> {
    /// Amplitude response
    pub amplitude: &'a [f64],
    /// Phase response
    pub phase: &'a [f64],
    /// Excitation frequencies
    pub frequency: &'a [f64],
}

impl SweepSeries {
    /// Rows per sweep in the canonical layout
    pub const ROWS_PER_SWEEP: usize = 3;
    /// Row offset of the amplitude row inside a block
    pub const AMPLITUDE_ROW: usize = 0;
    /// Row offset of the phase row inside a block
    pub const PHASE_ROW: usize = 1;
    /// Row offset of the frequency row inside a block
    pub const FREQUENCY_ROW: usize = 2;

    /// Build a canonical series. `rows.len()` must be `3 * timestamps.len()`.
    pub fn new(rows: Vec<Vec<f64>>, timestamps: Vec<f64>) -> Result<Self, DataFormatError> {
        if rows.is_empty() {
            return Err(DataFormatError::EmptySeries);
        }
        if rows.len() % Self::ROWS_PER_SWEEP != 0 {
            return Err(DataFormatError::IncompleteBlock {
                rows: rows.len(),
                block_size: Self::ROWS_PER_SWEEP,
            });
        }
        let sweeps = rows.len() / Self::ROWS_PER_SWEEP;
        if timestamps.len() != sweeps {
            return Err(DataFormatError::TimestampCount {
                sweeps,
                timestamps: timestamps.len(),
            });
        }
        Ok(Self { rows, timestamps })
    }

    /// Number of sweeps
    pub fn n_sweeps(&self) -> usize {
        self.rows.len() / Self::ROWS_PER_SWEEP
    }

    /// Timestamps in epoch seconds, one per sweep
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// All rows in canonical order
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// View of sweep `index`
    pub fn sweep(&self, index: usize) -> Option<SweepView<'_>> {
        let base = index.checked_mul(Self::ROWS_PER_SWEEP)?;
        let block = self.rows.get(base..base + Self::ROWS_PER_SWEEP)?;
        Some(SweepView {
            amplitude: &block[Self::AMPLITUDE_ROW],
            phase: &block[Self::PHASE_ROW],
            frequency: &block[Self::FREQUENCY_ROW],
        })
    }

    /// Iterate over all sweeps in order
    pub fn sweeps(&self) -> impl Iterator<Item = SweepView<'_>> + '_ {
        (0..self.n_sweeps()).filter_map(move |i| self.sweep(i))
    }

    /// Return a new series with the phase and frequency rows mapped.
    pub fn map_rows<P, F>(&self, phase: P, frequency: F) -> Self
    where
        P: Fn(f64) -> f64,
        F: Fn(f64) -> f64,
    {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| match idx % Self::ROWS_PER_SWEEP {
                Self::PHASE_ROW => row.iter().map(|&v| phase(v)).collect(),
                Self::FREQUENCY_ROW => row.iter().map(|&v| frequency(v)).collect(),
                _ => row.clone(),
            })
            .collect();
        Self {
            rows,
            timestamps: self.timestamps.clone(),
        }
    }
}
