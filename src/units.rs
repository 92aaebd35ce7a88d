//! Fixed scalar unit conversions applied to raw recordings.
//!
//! Instruments report frequencies in Hz, phases in degrees and image
//! annotations in pixels. The numerical core works in kHz, radians and µm.
//! Conversions divide by the configured factor for frequency and phase and
//! multiply by the pixel size for lengths.

use serde::{Deserialize, Serialize};

use crate::series::{BaselineColumns, DataFormatError, Measurement, PllSeries, RawSeries};

/// Conversion factors between instrument units and computation units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConverter {
    /// Divisor turning Hz into kHz
    pub hz_to_khz: f64,
    /// Divisor turning degrees into radians
    pub deg_to_rad: f64,
    /// Length of one image pixel in µm
    pub px_to_um: f64,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            hz_to_khz: 1000.0,
            deg_to_rad: 57.2958,
            px_to_um: 1.0,
        }
    }
}

impl UnitConverter {
    /// Hz → kHz
    pub fn frequency(&self, hz: f64) -> f64 {
        hz / self.hz_to_khz
    }

    /// Degrees → radians
    pub fn phase(&self, degrees: f64) -> f64 {
        degrees / self.deg_to_rad
    }

    /// Pixels → µm
    pub fn length(&self, pixels: f64) -> f64 {
        pixels * self.px_to_um
    }

    /// Pixels² → µm²
    pub fn area(&self, pixels_sq: f64) -> f64 {
        pixels_sq * self.px_to_um * self.px_to_um
    }

    /// Convert the frequency and phase columns of a baseline recording.
    pub fn convert_baseline(
        &self,
        series: &RawSeries,
        columns: &BaselineColumns,
    ) -> Result<RawSeries, DataFormatError> {
        series
            .map_column(columns.frequency, |v| self.frequency(v))?
            .map_column(columns.phase, |v| self.phase(v))
    }

    /// Convert the frequency and phase content of a measurement.
    ///
    /// PLL: phase and frequency-shift columns. Sweep: every phase and
    /// frequency row.
    pub fn convert_measurement(&self, measurement: &Measurement) -> Result<Measurement, DataFormatError> {
        match measurement {
            Measurement::Pll(pll) => {
                let series = pll
                    .series
                    .map_column(pll.columns.phase, |v| self.phase(v))?
                    .map_column(pll.columns.frequency_shift, |v| self.frequency(v))?;
                Ok(Measurement::Pll(PllSeries {
                    series,
                    columns: pll.columns,
                }))
            }
            Measurement::Sweep(sweep) => Ok(Measurement::Sweep(
                sweep.map_rows(|v| self.phase(v), |v| self.frequency(v)),
            )),
        }
    }

    /// Check that all factors are usable divisors / multipliers
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("hz_to_khz", self.hz_to_khz),
            ("deg_to_rad", self.deg_to_rad),
            ("px_to_um", self.px_to_um),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("units.{name} must be positive and finite, got {value}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{PllColumns, SweepSeries};

    #[test]
    fn test_baseline_conversion() {
        let raw = RawSeries::from_rows(vec![vec![72_800.0, 0.5, -90.0], vec![72_900.0, 0.6, -180.0]]).unwrap();
        let converter = UnitConverter {
            deg_to_rad: 180.0 / std::f64::consts::PI,
            ..Default::default()
        };
        let converted = converter.convert_baseline(&raw, &BaselineColumns::default()).unwrap();

        assert_eq!(converted.column(0).unwrap(), &[72.8, 72.9]);
        assert_eq!(converted.column(1).unwrap(), &[0.5, 0.6]);
        let phase = converted.column(2).unwrap();
        assert!((phase[0] + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((phase[1] + std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_pll_conversion_touches_only_phase_and_shift() {
        let raw = RawSeries::from_rows(vec![vec![1.0, 2.0, 57.2958, 50.0]]).unwrap();
        let measurement = Measurement::Pll(PllSeries {
            series: raw,
            columns: PllColumns::default(),
        });
        let Measurement::Pll(converted) = UnitConverter::default().convert_measurement(&measurement).unwrap() else {
            panic!("mode changed during conversion");
        };
        assert_eq!(converted.series.column(0).unwrap(), &[1.0]);
        assert_eq!(converted.series.column(1).unwrap(), &[2.0]);
        assert!((converted.series.column(2).unwrap()[0] - 1.0).abs() < 1e-12);
        assert!((converted.series.column(3).unwrap()[0] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_conversion_keeps_amplitude() {
        let rows = vec![vec![3.0], vec![57.2958], vec![72_000.0]];
        let sweep = SweepSeries::new(rows, vec![0.0]).unwrap();
        let Measurement::Sweep(converted) = UnitConverter::default()
            .convert_measurement(&Measurement::Sweep(sweep))
            .unwrap()
        else {
            panic!("mode changed during conversion");
        };
        let view = converted.sweep(0).unwrap();
        assert_eq!(view.amplitude, &[3.0]);
        assert!((view.phase[0] - 1.0).abs() < 1e-12);
        assert_eq!(view.frequency, &[72.0]);
    }

    #[test]
    fn test_area_uses_squared_pixel_size() {
        let converter = UnitConverter {
            px_to_um: 0.5,
            ..Default::default()
        };
        assert_eq!(converter.length(10.0), 5.0);
        assert_eq!(converter.area(100.0), 25.0);
    }

    #[test]
    fn test_validate_rejects_zero_factor() {
        let converter = UnitConverter {
            hz_to_khz: 0.0,
            ..Default::default()
        };
        assert!(converter.validate().is_err());
    }
}
