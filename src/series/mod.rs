//! # Raw and canonical series
//!
//! In-memory forms of the three recordings a run consumes:
//!
//! - two baseline frequency sweeps of the cantilever (before and after the
//!   cell was attached), held as [`RawSeries`];
//! - one long-term measurement, either a PLL table ([`PllSeries`]) or a set of
//!   sweeps. Sweeps arrive as a [`RawSweepTable`] and are normalized by the
//!   [`crate::sweep`] demuxer into a canonical [`SweepSeries`].
//!
//! All types are immutable once built; conversions return new values.

mod error;
mod mode;
mod sweep;
mod table;

pub use error::DataFormatError;
pub use mode::{AcquisitionMode, BaselineColumns, Measurement, PllColumns, PllSeries};
pub use sweep::{RawSweepTable, SweepSeries, SweepTimestamp, SweepView};
pub use table::RawSeries;
