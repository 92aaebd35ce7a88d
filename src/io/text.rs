use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::IoError;
use crate::series::RawSeries;

/// Layout of a delimited numeric text file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    /// Field delimiter
    pub delimiter: u8,
    /// Leading lines skipped before the data
    pub header_lines: usize,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            header_lines: 0,
        }
    }
}

impl TextFormat {
    /// Format with the given delimiter and header length.
    ///
    /// The delimiter must be a single ASCII character.
    pub fn new(delimiter: char, header_lines: usize) -> Result<Self, IoError> {
        if !delimiter.is_ascii() {
            return Err(IoError::InvalidDelimiter(delimiter));
        }
        Ok(Self {
            delimiter: delimiter as u8,
            header_lines,
        })
    }

    pub(super) fn csv_reader<R: BufRead>(&self, mut reader: R) -> Result<csv::Reader<R>, IoError> {
        let mut skipped = String::new();
        for _ in 0..self.header_lines {
            skipped.clear();
            if reader.read_line(&mut skipped)? == 0 {
                break;
            }
        }
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader))
    }
}

/// Line number of a record, offset by the skipped header
pub(super) fn line_of(record: &csv::StringRecord, format: &TextFormat) -> u64 {
    record.position().map_or(0, |p| p.line()) + format.header_lines as u64
}

/// Parse one field as `f64`; `nan`/`inf` spellings are accepted.
pub(super) fn parse_field(value: &str, line: u64, field: usize) -> Result<f64, IoError> {
    value.parse::<f64>().map_err(|_| IoError::Parse {
        line,
        field,
        value: value.to_string(),
    })
}

/// Fields of a record with trailing empty fields (trailing delimiters) removed
pub(super) fn trimmed_fields(record: &csv::StringRecord) -> Vec<&str> {
    let mut fields: Vec<&str> = record.iter().collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Read a delimited numeric table from a file.
pub fn read_series(path: &Path, format: &TextFormat) -> Result<RawSeries, IoError> {
    let file = File::open(path).map_err(|e| IoError::open(path, e))?;
    read_series_from(BufReader::new(file), format)
}

/// Read a delimited numeric table from any buffered reader.
pub fn read_series_from<R: BufRead>(reader: R, format: &TextFormat) -> Result<RawSeries, IoError> {
    let mut csv_reader = format.csv_reader(reader)?;
    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = line_of(&record, format);
        let fields = trimmed_fields(&record);
        if fields.is_empty() {
            continue;
        }
        let row = fields
            .iter()
            .enumerate()
            .map(|(i, v)| parse_field(v, line, i))
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }
    Ok(RawSeries::from_rows(rows)?)
}

/// Write a numeric table with optional header lines (each written verbatim).
pub fn write_series(path: &Path, series: &RawSeries, format: &TextFormat, header: &[String]) -> Result<(), IoError> {
    let mut file = File::create(path).map_err(|e| IoError::open(path, e))?;
    for line in header {
        writeln!(file, "{}", line)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(false)
        .from_writer(file);

    let columns = (0..series.n_columns())
        .map(|c| series.column(c))
        .collect::<Result<Vec<_>, _>>()?;
    for row in 0..series.len() {
        writer.write_record(columns.iter().map(|c| c[row].to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
