use super::DataFormatError;

/// Column-major numeric table holding one raw recording.
///
/// Rows are samples, columns are instrument channels. The role of each column
/// (time, phase, frequency, ...) is not stored here; it is supplied by the
/// column layout of the acquisition mode that consumes the series.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    columns: Vec<Vec<f64>>,
    len: usize,
}

impl RawSeries {
    /// Build a series from row-major values, as read from a delimited file.
    ///
    /// Every row must have the same width as the first one.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DataFormatError> {
        let width = rows.first().map(Vec::len).ok_or(DataFormatError::EmptySeries)?;
        let mut columns: Vec<Vec<f64>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DataFormatError::RaggedRow {
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(*value);
            }
        }

        Ok(Self {
            len: rows.len(),
            columns,
        })
    }

    /// Build a series from column vectors of equal length.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self, DataFormatError> {
        let len = columns.first().map(Vec::len).ok_or(DataFormatError::EmptySeries)?;
        if let Some((idx, column)) = columns.iter().enumerate().find(|(_, c)| c.len() != len) {
            // Report the mismatch the same way a ragged row would be reported
            return Err(DataFormatError::RaggedRow {
                row: idx,
                expected: len,
                found: column.len(),
            });
        }
        Ok(Self { columns, len })
    }

    /// Number of samples (rows)
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of channels (columns)
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Borrow one column by index
    pub fn column(&self, index: usize) -> Result<&[f64], DataFormatError> {
        self.columns
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DataFormatError::MissingColumn {
                column: index,
                available: self.columns.len(),
            })
    }

    /// Return a new series with one column replaced by `f(value)`.
    pub fn map_column<F>(&self, index: usize, f: F) -> Result<Self, DataFormatError>
    where
        F: Fn(f64) -> f64,
    {
        let mapped: Vec<f64> = self.column(index)?.iter().map(|&v| f(v)).collect();
        let mut columns = self.columns.clone();
        columns[index] = mapped;
        Ok(Self {
            columns,
            len: self.len,
        })
    }

    /// Check that all listed columns exist
    pub fn require_columns(&self, indices: &[usize]) -> Result<(), DataFormatError> {
        for &index in indices {
            self.column(index)?;
        }
        Ok(())
    }
}
