use std::f64::consts::PI;

use super::MassError;

/// kHz⁻² · N/m expressed in ng
const NG_PER_UNIT: f64 = 1e6;

/// Added mass (ng) from a spring constant (N/m) and two resonance
/// frequencies (kHz):
///
/// ```text
/// mass = k / (4 pi^2) * (1 / f_measured^2 - 1 / f_reference^2) * 1e6
/// ```
///
/// The inverse-square difference is evaluated as
/// `(f_ref - f_meas)(f_ref + f_meas) / (f_meas^2 f_ref^2)`, which is exactly
/// zero for equal frequencies.
pub fn calculate_mass(spring_constant: f64, measured: f64, reference: f64) -> Result<f64, MassError> {
    if !(spring_constant.is_finite() && spring_constant > 0.0) {
        return Err(MassError::InvalidSpringConstant(spring_constant));
    }
    check_frequency("measured", measured)?;
    check_frequency("reference", reference)?;

    let inverse_square_difference =
        (reference - measured) * (reference + measured) / (measured * measured * reference * reference);
    Ok(spring_constant / (4.0 * PI * PI) * inverse_square_difference * NG_PER_UNIT)
}

fn check_frequency(role: &'static str, value: f64) -> Result<(), MassError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MassError::InvalidFrequency { role, value })
    }
}

/// Mass calculator bound to one cantilever
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassCalculator {
    spring_constant: f64,
}

impl MassCalculator {
    /// Create a calculator for a cantilever with the given spring constant (N/m)
    pub fn new(spring_constant: f64) -> Result<Self, MassError> {
        if !(spring_constant.is_finite() && spring_constant > 0.0) {
            return Err(MassError::InvalidSpringConstant(spring_constant));
        }
        Ok(Self { spring_constant })
    }

    /// Spring constant (N/m)
    pub fn spring_constant(&self) -> f64 {
        self.spring_constant
    }

    /// Uncorrected mass for one measured frequency
    pub fn mass(&self, measured: f64, reference: f64) -> Result<f64, MassError> {
        calculate_mass(self.spring_constant, measured, reference)
    }

    /// Mass multiplied by a position-correction factor
    pub fn corrected_mass(&self, measured: f64, reference: f64, factor: f64) -> Result<f64, MassError> {
        Ok(self.mass(measured, reference)? * factor)
    }
}
