use log::{debug, info};

use crate::series::{DataFormatError, RawSweepTable, SweepSeries};

/// Rows per sweep written by the legacy prototype acquisition software
pub const LEGACY_BLOCK_SIZE: usize = 4;

const FREQUENCY_NAMES: &[&str] = &[
    "frequency",
    "center",
    "centre",
    "center frequency",
    "centre frequency",
];
const PHASE_NAMES: &[&str] = &["phase"];
const AMPLITUDE_NAMES: &[&str] = &["amplitude", "amp"];
const OFFSET_NAMES: &[&str] = &["offset"];
const PADDING_PREFIX: &str = "untitled";

/// Row roles detected from channel names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    /// Row offset of the frequency channel
    pub frequency: usize,
    /// Row offset of the phase channel
    pub phase: usize,
    /// Row offset of the amplitude channel, if present
    pub amplitude: Option<usize>,
    /// Row offset of the frequency offset channel, if present
    pub offset: Option<usize>,
    /// Number of rows per sweep
    pub block_size: usize,
}

impl ChannelLayout {
    /// Detect row roles from channel names in acquisition-metadata order.
    ///
    /// The first match wins for every role. The index of the first padding
    /// channel (`Untitled ...`) is the block size; without padding channels the
    /// block spans all names.
    pub fn detect<S: AsRef<str>>(channel_names: &[S]) -> Result<Self, DataFormatError> {
        let mut frequency = None;
        let mut phase = None;
        let mut amplitude = None;
        let mut offset = None;
        let mut block_size = None;

        for (idx, name) in channel_names.iter().enumerate() {
            let name = name.as_ref().trim().to_lowercase();
            let is_one_of = |synonyms: &[&str]| synonyms.iter().any(|s| *s == name);

            if frequency.is_none() && is_one_of(FREQUENCY_NAMES) {
                frequency = Some(idx);
            }
            if phase.is_none() && is_one_of(PHASE_NAMES) {
                phase = Some(idx);
            }
            if amplitude.is_none() && is_one_of(AMPLITUDE_NAMES) {
                amplitude = Some(idx);
            }
            if offset.is_none() && is_one_of(OFFSET_NAMES) {
                offset = Some(idx);
            }
            if block_size.is_none() && name.starts_with(PADDING_PREFIX) {
                block_size = Some(idx);
            }
        }

        let layout = Self {
            frequency: frequency.ok_or(DataFormatError::MissingChannel("frequency"))?,
            phase: phase.ok_or(DataFormatError::MissingChannel("phase"))?,
            amplitude,
            offset,
            block_size: block_size.unwrap_or(channel_names.len()),
        };
        layout.check_roles_inside_block()?;
        Ok(layout)
    }

    /// True for the 4-row prototype layout
    pub fn is_legacy(&self) -> bool {
        self.block_size == LEGACY_BLOCK_SIZE
    }

    fn check_roles_inside_block(&self) -> Result<(), DataFormatError> {
        if self.block_size == 0 {
            return Err(DataFormatError::UnsupportedLayout(
                "padding channel precedes all data channels".to_string(),
            ));
        }
        let roles = [
            ("frequency", Some(self.frequency)),
            ("phase", Some(self.phase)),
            ("amplitude", self.amplitude),
            ("offset", self.offset),
        ];
        for (role, index) in roles {
            if let Some(index) = index {
                if index >= self.block_size {
                    return Err(DataFormatError::ChannelOutsideBlock {
                        role,
                        index,
                        block_size: self.block_size,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Normalizes raw sweep tables into the canonical 3-row layout
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepDemuxer;

impl SweepDemuxer {
    /// Create a demuxer
    pub fn new() -> Self {
        Self
    }

    /// Demux a raw table into a canonical [`SweepSeries`].
    ///
    /// The input is left untouched; the canonical rows are freshly allocated.
    pub fn demux(&self, table: &RawSweepTable) -> Result<SweepSeries, DataFormatError> {
        let layout = ChannelLayout::detect(&table.channel_names)?;
        self.demux_with_layout(table, &layout)
    }

    /// Demux with an already detected layout
    pub fn demux_with_layout(
        &self,
        table: &RawSweepTable,
        layout: &ChannelLayout,
    ) -> Result<SweepSeries, DataFormatError> {
        let n_sweeps = check_block_shape(table, layout.block_size)?;

        if table.timestamps.len() != n_sweeps {
            return Err(DataFormatError::TimestampCount {
                sweeps: n_sweeps,
                timestamps: table.timestamps.len(),
            });
        }
        let timestamps = table
            .timestamps
            .iter()
            .enumerate()
            .map(|(sweep, ts)| ts.to_epoch_seconds(sweep))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Demuxing {} sweeps ({} rows per sweep{})",
            n_sweeps,
            layout.block_size,
            if layout.is_legacy() { ", legacy layout" } else { "" }
        );

        let mut rows = Vec::with_capacity(n_sweeps * SweepSeries::ROWS_PER_SWEEP);
        for block in table.rows.chunks_exact(layout.block_size) {
            let [amplitude, phase, frequency] = if layout.is_legacy() {
                legacy_block(block, layout)?
            } else {
                canonical_block(block, layout)
            };
            rows.push(amplitude);
            rows.push(phase);
            rows.push(frequency);
        }
        debug!("Demuxed into {} canonical rows", rows.len());

        SweepSeries::new(rows, timestamps)
    }
}

/// Validate row widths and block divisibility, returning the sweep count
fn check_block_shape(table: &RawSweepTable, block_size: usize) -> Result<usize, DataFormatError> {
    let width = table.rows.first().map(Vec::len).ok_or(DataFormatError::EmptySeries)?;
    if let Some((row, found)) = table
        .rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, len)| *len != width)
    {
        return Err(DataFormatError::RaggedRow {
            row,
            expected: width,
            found,
        });
    }
    if table.rows.len() % block_size != 0 {
        return Err(DataFormatError::IncompleteBlock {
            rows: table.rows.len(),
            block_size,
        });
    }
    Ok(table.rows.len() / block_size)
}

/// Legacy block: frequency is reconstructed as offset + residual
fn legacy_block(block: &[Vec<f64>], layout: &ChannelLayout) -> Result<[Vec<f64>; 3], DataFormatError> {
    let offset = layout.offset.ok_or(DataFormatError::MissingChannel("offset"))?;
    let amplitude = layout
        .amplitude
        .ok_or(DataFormatError::MissingChannel("amplitude"))?;

    let frequency = block[offset]
        .iter()
        .zip(&block[layout.frequency])
        .map(|(o, f)| o + f)
        .collect();

    Ok([block[amplitude].clone(), block[layout.phase].clone(), frequency])
}

fn canonical_block(block: &[Vec<f64>], layout: &ChannelLayout) -> [Vec<f64>; 3] {
    let width = block[layout.frequency].len();
    let amplitude = match layout.amplitude {
        Some(idx) => block[idx].clone(),
        None => vec![f64::NAN; width],
    };
    [amplitude, block[layout.phase].clone(), block[layout.frequency].clone()]
}
