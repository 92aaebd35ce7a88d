//! Property-based tests for the numerical invariants.

use inertial_mass::mass::{calculate_mass, rolling_mean};
use inertial_mass::position::{
    AnnotationSet, PositionCorrection, PositionCorrectionAnnotation, PositionCorrectionEngine,
    PositionCorrectionSettings,
};
use inertial_mass::series::{RawSweepTable, SweepTimestamp};
use inertial_mass::sweep::SweepDemuxer;
use inertial_mass::units::UnitConverter;
use proptest::prelude::*;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

proptest! {
    /// No frequency shift means no added mass
    #[test]
    fn test_mass_is_zero_without_shift(k in 0.01f64..100.0, f in 1.0f64..1000.0) {
        prop_assert_eq!(calculate_mass(k, f, f).unwrap(), 0.0);
    }

    /// A lower measured frequency always means a positive mass
    #[test]
    fn test_mass_sign_follows_shift(k in 0.01f64..100.0, f_ref in 10.0f64..1000.0, drop in 1e-3f64..5.0) {
        prop_assert!(calculate_mass(k, f_ref - drop, f_ref).unwrap() > 0.0);
        prop_assert!(calculate_mass(k, f_ref + drop, f_ref).unwrap() < 0.0);
    }

    /// The rolling mean of a constant series is that constant once the window is full
    #[test]
    fn test_rolling_mean_of_constant(value in -1e3f64..1e3, len in 1usize..200, window in 1usize..50) {
        let means = rolling_mean(&vec![value; len], window).unwrap();
        prop_assert_eq!(means.len(), len);
        for (i, mean) in means.iter().enumerate() {
            if i + 1 < window {
                prop_assert!(mean.is_nan());
            } else {
                prop_assert_eq!(*mean, value);
            }
        }
    }

    /// Samples outside the annotated range carry exactly the floor value
    #[test]
    fn test_outside_range_is_exact_floor(
        frames in prop::collection::btree_set(1usize..12, 1..6),
        start in 0usize..10,
        spf in 1usize..5,
        extra in 1usize..30,
        zero_outside in any::<bool>(),
    ) {
        let last = *frames.iter().next_back().unwrap();
        let n_samples = (last - 1) * spf + start + extra;
        let annotations = AnnotationSet::new(frames.iter().map(|&frame| PositionCorrectionAnnotation {
            frame_index: frame,
            tip_offset: Some(frame as f64),
            object_area: Some(10.0 * frame as f64),
            ..Default::default()
        }))
        .unwrap();
        let settings = PositionCorrectionSettings {
            image_start_index: start,
            position_correction_end_frame: None,
            samples_per_frame: spf,
            zero_outside_correction_range: zero_outside,
        };
        let engine = PositionCorrectionEngine::new(100.0, 0.0, settings, UnitConverter::default());
        let correction = engine.correction(&annotations, n_samples).unwrap();
        let PositionCorrection::Interpolated(profile) = correction else {
            panic!("annotations must give a profile");
        };

        let floor = if zero_outside { 0.0 } else { 1.0 };
        let (lo, hi) = profile.range();
        prop_assert_eq!(lo, start);
        for i in (0..lo).chain(hi + 1..n_samples) {
            prop_assert_eq!(profile.factors()[i], floor);
            prop_assert_eq!(profile.areas()[i], floor);
        }
        for i in lo..=hi {
            prop_assert!(profile.factors()[i] >= 1.0);
        }
    }

    /// Legacy 4-row blocks demux to the same canonical rows as the 3-row layout
    #[test]
    fn test_legacy_demux_matches_canonical(
        sweeps in prop::collection::vec(
            prop::collection::vec((0u32..1000, 0u32..1000, 60_000u32..80_000, 0u32..100), 4),
            1..6,
        ),
    ) {
        let mut canonical = Vec::new();
        let mut legacy = Vec::new();
        for sweep in &sweeps {
            let amplitude: Vec<f64> = sweep.iter().map(|p| f64::from(p.0)).collect();
            let phase: Vec<f64> = sweep.iter().map(|p| -f64::from(p.1)).collect();
            let offset: Vec<f64> = sweep.iter().map(|p| f64::from(p.2)).collect();
            let residual: Vec<f64> = sweep.iter().map(|p| f64::from(p.3)).collect();
            let frequency: Vec<f64> = offset.iter().zip(&residual).map(|(o, r)| o + r).collect();

            canonical.extend([amplitude.clone(), phase.clone(), frequency]);
            legacy.extend([offset, residual, amplitude, phase]);
        }
        let timestamps: Vec<SweepTimestamp> = (0..sweeps.len()).map(|i| SweepTimestamp::Seconds(i as f64)).collect();

        let three_row = RawSweepTable {
            channel_names: names(&["Amplitude", "Phase", "Frequency", "Untitled 3"]),
            rows: canonical,
            timestamps: timestamps.clone(),
        };
        let four_row = RawSweepTable {
            channel_names: names(&["Offset", "Frequency", "Amplitude", "Phase", "Untitled 4"]),
            rows: legacy,
            timestamps,
        };

        let demuxer = SweepDemuxer::new();
        prop_assert_eq!(demuxer.demux(&four_row).unwrap(), demuxer.demux(&three_row).unwrap());
    }
}
