#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use inertial_mass::io::read_annotations_from;
use inertial_mass::position::{PositionCorrectionEngine, PositionCorrectionSettings};
use inertial_mass::units::UnitConverter;

fuzz_target!(|data: &[u8]| {
    let Ok(annotations) = read_annotations_from(Cursor::new(data)) else {
        return;
    };
    let engine = PositionCorrectionEngine::new(
        100.0,
        0.0,
        PositionCorrectionSettings::default(),
        UnitConverter::default(),
    );
    for n_samples in [1, 16, 1024] {
        let _ = engine.correction(&annotations, n_samples);
    }
});
