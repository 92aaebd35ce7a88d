//! Phase response of a driven, damped oscillator near resonance.
//!
//! ```text
//! phase(f) = offset - amplitude * atan((f - center) / width)
//! ```
//!
//! `center` is the resonance frequency and `width` the half linewidth
//! (`center / (2 Q)`); both share the unit of the frequency axis.

/// Number of model parameters
pub const N_PARAMS: usize = 4;

/// Parameter names in vector order
pub const PARAMETER_NAMES: [&str; N_PARAMS] = ["amplitude", "center", "width", "offset"];

/// Index of the amplitude parameter
pub const AMPLITUDE: usize = 0;
/// Index of the center (resonance) frequency parameter
pub const CENTER: usize = 1;
/// Index of the half linewidth parameter
pub const WIDTH: usize = 2;
/// Index of the vertical offset parameter
pub const OFFSET: usize = 3;

/// Evaluate the model at frequency `f`
#[inline]
pub fn phase_response(f: f64, p: &[f64; N_PARAMS]) -> f64 {
    let u = (f - p[CENTER]) / p[WIDTH];
    p[OFFSET] - p[AMPLITUDE] * u.atan()
}

/// Partial derivatives of the model with respect to each parameter
#[inline]
pub fn gradient(f: f64, p: &[f64; N_PARAMS]) -> [f64; N_PARAMS] {
    let w = p[WIDTH];
    let u = (f - p[CENTER]) / w;
    let lorentz = 1.0 / (w * (1.0 + u * u));
    [
        -u.atan(),
        p[AMPLITUDE] * lorentz,
        p[AMPLITUDE] * u * lorentz,
        1.0,
    ]
}
