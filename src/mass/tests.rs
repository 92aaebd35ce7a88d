use std::f64::consts::PI;

use super::*;

fn reference_formula(k: f64, measured: f64, reference: f64) -> f64 {
    k / (4.0 * PI * PI) * (1.0 / measured.powi(2) - 1.0 / reference.powi(2)) * 1e6
}

#[test]
fn test_mass_is_zero_at_identity() {
    for k in [0.1, 8.0, 120.0] {
        for f in [1e-3, 12.5, 71.9, 72.8, 1e4] {
            assert_eq!(calculate_mass(k, f, f).unwrap(), 0.0);
        }
    }
}

#[test]
fn test_mass_matches_reference_formula() {
    let (f0, f1, k, shift) = (72.8, 71.9, 8.0, 0.05);
    let measured = shift + f1;
    let mass = calculate_mass(k, measured, f0).unwrap();
    let expected = reference_formula(k, measured, f0);
    assert!(mass > 0.0);
    assert!((mass - expected).abs() <= 1e-12 * expected.abs());
}

#[test]
fn test_shift_cancelling_baseline_gives_zero_mass() {
    let (f0, f1) = (72.8, 71.9);
    let measured = (f0 - f1) + f1;
    assert_eq!(calculate_mass(8.0, measured, f0).unwrap(), 0.0);
}

#[test]
fn test_mass_sign_follows_frequency_shift() {
    assert!(calculate_mass(8.0, 72.0, 72.8).unwrap() > 0.0);
    assert!(calculate_mass(8.0, 73.0, 72.8).unwrap() < 0.0);
}

#[test]
fn test_invalid_inputs_are_errors() {
    assert_eq!(
        calculate_mass(8.0, 0.0, 72.8).unwrap_err(),
        MassError::InvalidFrequency {
            role: "measured",
            value: 0.0
        }
    );
    assert!(matches!(
        calculate_mass(8.0, 72.8, f64::NAN),
        Err(MassError::InvalidFrequency { role: "reference", .. })
    ));
    assert_eq!(
        MassCalculator::new(-1.0).unwrap_err(),
        MassError::InvalidSpringConstant(-1.0)
    );
}

#[test]
fn test_corrected_mass_scales_with_factor() {
    let calculator = MassCalculator::new(8.0).unwrap();
    let raw = calculator.mass(71.95, 72.8).unwrap();
    assert_eq!(calculator.corrected_mass(71.95, 72.8, 2.0).unwrap(), raw * 2.0);
    assert_eq!(calculator.corrected_mass(71.95, 72.8, 0.0).unwrap(), 0.0);
}

#[test]
fn test_rolling_mean_of_constant_series() {
    let values = vec![2.5; 10];
    let rolling = rolling_mean(&values, 3).unwrap();
    assert_eq!(rolling.len(), 10);
    assert!(rolling[..2].iter().all(|v| v.is_nan()));
    assert!(rolling[2..].iter().all(|&v| v == 2.5));
}

#[test]
fn test_rolling_mean_propagates_nan_within_window() {
    let rolling = rolling_mean(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0], 2).unwrap();
    assert!(rolling[0].is_nan());
    assert_eq!(rolling[1], 1.5);
    assert!(rolling[2].is_nan());
    assert!(rolling[3].is_nan());
    assert_eq!(rolling[4], 4.5);
    assert_eq!(rolling[5], 5.5);
}

#[test]
fn test_rolling_mean_of_inexact_constant_is_exact() {
    let rolling = rolling_mean(&[0.1; 10], 3).unwrap();
    assert!(rolling[2..].iter().all(|&v| v == 0.1), "{:?}", rolling);
}

#[test]
fn test_rolling_mean_recovers_after_spike() {
    assert_eq!(
        rolling_mean(&[1e17, 1.0, 1.0, 1.0, 1.0], 1).unwrap(),
        vec![1e17, 1.0, 1.0, 1.0, 1.0]
    );
    let rolling = rolling_mean(&[1e17, 1.0, 2.0, 3.0], 2).unwrap();
    assert_eq!(rolling[1], 5e16);
    assert_eq!(rolling[2], 1.5);
    assert_eq!(rolling[3], 2.5);
}

#[test]
fn test_rolling_mean_infinity_stays_in_its_windows() {
    assert_eq!(
        rolling_mean(&[f64::INFINITY, 1.0, 1.0, 1.0], 1).unwrap(),
        vec![f64::INFINITY, 1.0, 1.0, 1.0]
    );
    let rolling = rolling_mean(&[1.0, f64::INFINITY, 3.0, 5.0, f64::NEG_INFINITY], 2).unwrap();
    assert_eq!(rolling[1], f64::INFINITY);
    assert_eq!(rolling[2], f64::INFINITY);
    assert_eq!(rolling[3], 4.0);
    assert_eq!(rolling[4], f64::NEG_INFINITY);
    assert!(rolling_mean(&[f64::INFINITY, f64::NEG_INFINITY], 2).unwrap()[1].is_nan());
}

#[test]
fn test_rolling_mean_window_edge_cases() {
    assert_eq!(rolling_mean(&[1.0, 2.0], 1).unwrap(), vec![1.0, 2.0]);
    assert!(rolling_mean(&[1.0, 2.0], 5).unwrap().iter().all(|v| v.is_nan()));
    assert_eq!(rolling_mean(&[1.0], 0).unwrap_err(), MassError::ZeroWindow);
}

#[test]
fn test_mass_series_assembly() {
    let series = MassSeries::new(
        &[100.0, 1900.0, 3700.0],
        &[1.0, f64::NAN, 3.0],
        Some(&[10.0, 11.0, 12.0]),
        1,
    )
    .unwrap();

    let hours: Vec<f64> = series.records().iter().map(|r| r.elapsed_time_hours).collect();
    assert_eq!(hours, vec![0.0, 0.5, 1.0]);
    assert!(series.has_object_area());
    assert_eq!(series.n_valid(), 2);
    assert_eq!(series.mean_mass(), Some(2.0));
    assert_eq!(series.records()[2].object_area_um2, Some(12.0));
}

#[test]
fn test_mass_series_length_mismatch() {
    assert!(matches!(
        MassSeries::new(&[0.0, 1.0], &[1.0], None, 1),
        Err(MassError::LengthMismatch { column: "mass", .. })
    ));
    assert!(matches!(
        MassSeries::new(&[0.0], &[1.0], Some(&[]), 1),
        Err(MassError::LengthMismatch { column: "object_area", .. })
    ));
}
