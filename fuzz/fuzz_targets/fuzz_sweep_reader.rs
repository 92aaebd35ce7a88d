#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use inertial_mass::io::{read_sweep_table_from, TextFormat};
use inertial_mass::sweep::SweepDemuxer;

fuzz_target!(|data: &[u8]| {
    // Reading and demuxing must fail gracefully, never panic
    for names in [
        &["Amplitude", "Phase", "Frequency", "Untitled 3"][..],
        &["Offset", "Frequency", "Amplitude", "Phase", "Untitled 4"][..],
    ] {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        if let Ok(table) = read_sweep_table_from(Cursor::new(data), &TextFormat::default(), &names) {
            let _ = SweepDemuxer::new().demux(&table);
        }
    }
});
