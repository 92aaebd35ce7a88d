use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::text::{line_of, parse_field, trimmed_fields, TextFormat};
use super::IoError;
use crate::series::{RawSweepTable, SweepTimestamp};
use crate::sweep::ChannelLayout;

/// Read a sweep table: one line per channel per sweep, the last field of each
/// line being the sweep timestamp. The timestamp of a sweep is taken from the
/// first line of its block.
pub fn read_sweep_table(path: &Path, format: &TextFormat, channel_names: &[String]) -> Result<RawSweepTable, IoError> {
    let file = File::open(path).map_err(|e| IoError::open(path, e))?;
    read_sweep_table_from(BufReader::new(file), format, channel_names)
}

/// Read a sweep table from any buffered reader.
pub fn read_sweep_table_from<R: BufRead>(
    reader: R,
    format: &TextFormat,
    channel_names: &[String],
) -> Result<RawSweepTable, IoError> {
    let block_size = ChannelLayout::detect(channel_names)?.block_size;
    let mut csv_reader = format.csv_reader(reader)?;

    let mut rows = Vec::new();
    let mut timestamps = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = line_of(&record, format);
        let fields = trimmed_fields(&record);
        if fields.is_empty() {
            continue;
        }
        let Some((timestamp, values)) = fields.split_last() else {
            return Err(IoError::MissingTimestamp { line });
        };
        if values.is_empty() {
            return Err(IoError::MissingTimestamp { line });
        }

        if rows.len() % block_size == 0 {
            timestamps.push(parse_timestamp(timestamp));
        }
        let row = values
            .iter()
            .enumerate()
            .map(|(i, v)| parse_field(v, line, i))
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }

    Ok(RawSweepTable {
        channel_names: channel_names.to_vec(),
        rows,
        timestamps,
    })
}

fn parse_timestamp(value: &str) -> SweepTimestamp {
    value
        .parse::<f64>()
        .map(SweepTimestamp::Seconds)
        .unwrap_or_else(|_| SweepTimestamp::Text(value.to_string()))
}

/// Write a sweep table in the layout [`read_sweep_table`] expects.
pub fn write_sweep_table(path: &Path, table: &RawSweepTable, format: &TextFormat) -> Result<(), IoError> {
    let block_size = ChannelLayout::detect(&table.channel_names)?.block_size;
    let file = File::create(path).map_err(|e| IoError::open(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    for (i, row) in table.rows.iter().enumerate() {
        let timestamp = match table.timestamps.get(i / block_size) {
            Some(SweepTimestamp::Seconds(t)) => t.to_string(),
            Some(SweepTimestamp::Text(t)) => t.clone(),
            None => String::new(),
        };
        let mut fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        fields.push(timestamp);
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}
