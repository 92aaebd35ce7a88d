//! # Mass calculation
//!
//! Converts resonance frequencies into added mass using the inertial
//! mass-sensing relation of a cantilever (see [`calculate_mass`]), applies the
//! position correction and assembles the final [`MassSeries`] with its
//! rolling mean.

mod calculator;
mod error;
mod rolling;
mod series;

#[cfg(test)]
mod tests;

pub use calculator::{calculate_mass, MassCalculator};
pub use error::MassError;
pub use rolling::rolling_mean;
pub use series::{MassRecord, MassSeries};
