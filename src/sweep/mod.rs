//! # Sweep demuxing
//!
//! Sweep-mode recordings store one row per channel per sweep. The channel
//! order depends on the acquisition software version:
//!
//! - current layout: 3 rows per sweep (amplitude, phase, frequency)
//! - legacy prototype layout: 4 rows per sweep (offset, frequency, amplitude,
//!   phase), where the swept frequency is stored as a residual on top of the
//!   offset row
//!
//! [`SweepDemuxer`] identifies row roles from the channel names and produces
//! the canonical [`crate::series::SweepSeries`].

mod demux;


pub use demux::{ChannelLayout, SweepDemuxer, LEGACY_BLOCK_SIZE};
