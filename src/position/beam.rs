//! Point-mass position sensitivity of a clamped-free cantilever.
//!
//! The first bending mode of an Euler–Bernoulli beam of length `L` is
//!
//! ```text
//! phi(x) = cosh(bx) - cos(bx) - sigma * (sinh(bx) - sin(bx)),   b = BETA_L / L
//! sigma  = (cosh(BETA_L) + cos(BETA_L)) / (sinh(BETA_L) + sin(BETA_L))
//! ```
//!
//! with `x` measured from the clamp. A point mass at `x` shifts the resonance
//! as if a mass `m * (phi(x) / phi(L))^2` sat at the tip, so the apparent mass
//! is corrected by `(phi(L) / phi(L - d))^2` for a cell `d` away from the tip.

use super::CorrectionRangeError;

/// First root of `1 + cos(x) cosh(x) = 0`
pub const BETA_L: f64 = 1.875104068711961;

fn sigma() -> f64 {
    (BETA_L.cosh() + BETA_L.cos()) / (BETA_L.sinh() + BETA_L.sin())
}

/// Unnormalized mode shape at dimensionless position `bx`
fn mode_shape(bx: f64, sigma: f64) -> f64 {
    bx.cosh() - bx.cos() - sigma * (bx.sinh() - bx.sin())
}

/// Correction factor for a cell `tip_offset` µm away from the free end of a
/// cantilever `cantilever_length` µm long.
///
/// Equals 1 at the tip and grows towards the clamp.
pub fn position_correction_factor(cantilever_length: f64, tip_offset: f64) -> Result<f64, CorrectionRangeError> {
    if !(cantilever_length.is_finite() && cantilever_length > 0.0) {
        return Err(CorrectionRangeError::InvalidCantileverLength(cantilever_length));
    }
    if !(tip_offset.is_finite() && tip_offset >= 0.0 && tip_offset < cantilever_length) {
        return Err(CorrectionRangeError::OffsetOutsideCantilever {
            offset: tip_offset,
            length: cantilever_length,
        });
    }
    if tip_offset == 0.0 {
        return Ok(1.0);
    }

    let s = sigma();
    let at_tip = mode_shape(BETA_L, s);
    let at_cell = mode_shape(BETA_L * (1.0 - tip_offset / cantilever_length), s);
    Ok((at_tip / at_cell).powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_factor_is_one() {
        assert_eq!(position_correction_factor(100.0, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_factor_grows_towards_clamp() {
        let mut previous = 1.0;
        for offset in [5.0, 10.0, 20.0, 40.0, 80.0] {
            let factor = position_correction_factor(100.0, offset).unwrap();
            assert!(factor > previous, "factor at {offset} not increasing");
            previous = factor;
        }
    }

    #[test]
    fn test_mode_shape_tip_value() {
        // phi(L) = 2 for the normalized clamped-free first mode
        assert!((mode_shape(BETA_L, sigma()) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_factor_depends_on_relative_position() {
        let a = position_correction_factor(100.0, 10.0).unwrap();
        let b = position_correction_factor(250.0, 25.0).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_offsets_outside_beam() {
        assert!(matches!(
            position_correction_factor(100.0, 100.0),
            Err(CorrectionRangeError::OffsetOutsideCantilever { .. })
        ));
        assert!(matches!(
            position_correction_factor(100.0, -1.0),
            Err(CorrectionRangeError::OffsetOutsideCantilever { .. })
        ));
        assert!(matches!(
            position_correction_factor(0.0, 0.0),
            Err(CorrectionRangeError::InvalidCantileverLength(_))
        ));
    }
}
