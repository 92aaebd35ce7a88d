use std::io::Cursor;

use super::*;
use crate::config::ProjectConfig;
use crate::mass::MassSeries;
use crate::pipeline::InertialMassPipeline;
use crate::position::{Point, PositionCorrectionAnnotation};
use crate::series::{AcquisitionMode, DataFormatError, SweepTimestamp};
use crate::synthetic::SyntheticCantilever;

fn channel_names() -> Vec<String> {
    ["Amplitude", "Phase", "Frequency", "Untitled 3"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_read_series_skips_header_and_trailing_delimiters() {
    let text = "Instrument header\nsecond line\n72000\t0.5\t-10\t\n72100\t0.6\t-20\t\n\n";
    let series = read_series_from(Cursor::new(text), &TextFormat::new('\t', 2).unwrap()).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.n_columns(), 3);
    assert_eq!(series.column(0).unwrap(), &[72000.0, 72100.0]);
    assert_eq!(series.column(2).unwrap(), &[-10.0, -20.0]);
}

#[test]
fn test_read_series_accepts_nan_and_reports_bad_fields() {
    let series = read_series_from(Cursor::new("1,nan\n2,3\n"), &TextFormat::new(',', 0).unwrap()).unwrap();
    assert!(series.column(1).unwrap()[0].is_nan());

    let err = read_series_from(Cursor::new("h\n1,2\n3,abc\n"), &TextFormat::new(',', 1).unwrap()).unwrap_err();
    match err {
        IoError::Parse { line, field, value } => {
            assert_eq!(line, 3);
            assert_eq!(field, 1);
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_read_series_rejects_ragged_rows() {
    let err = read_series_from(Cursor::new("1,2,3\n4,5\n"), &TextFormat::new(',', 0).unwrap()).unwrap_err();
    assert!(matches!(err, IoError::DataFormat(DataFormatError::RaggedRow { .. })));
}

#[test]
fn test_read_sweep_table_takes_block_timestamps() {
    let text = "\
0.9\t1.0\t1.1\t1000
10\t20\t30\t1000
71\t72\t73\t1000
0.8\t0.9\t1.0\t2019-03-01 12:00:00
11\t21\t31\t2019-03-01 12:00:00
70\t71\t72\t2019-03-01 12:00:00
";
    let table = read_sweep_table_from(Cursor::new(text), &TextFormat::default(), &channel_names()).unwrap();
    assert_eq!(table.rows.len(), 6);
    assert_eq!(table.rows[1], vec![10.0, 20.0, 30.0]);
    assert_eq!(
        table.timestamps,
        vec![
            SweepTimestamp::Seconds(1000.0),
            SweepTimestamp::Text("2019-03-01 12:00:00".to_string()),
        ]
    );
}

#[test]
fn test_read_sweep_table_requires_timestamp_field() {
    let err = read_sweep_table_from(Cursor::new("42\n"), &TextFormat::default(), &channel_names()).unwrap_err();
    assert!(matches!(err, IoError::MissingTimestamp { line: 1 }));
}

#[test]
fn test_sweep_table_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweeps.txt");
    let cantilever = SyntheticCantilever {
        points: 11,
        ..Default::default()
    };
    let table = cantilever.sweep_table(&[71.9, 71.8], 500.0, 30.0);

    write_sweep_table(&path, &table, &TextFormat::default()).unwrap();
    let read = read_sweep_table(&path, &TextFormat::default(), &table.channel_names).unwrap();
    assert_eq!(read, table);
}

#[test]
fn test_annotations_from_csv() {
    let text = "\
frame,tip_offset,centroid_x,centroid_y,ref1_x,ref1_y,ref2_x,ref2_y,area
2,12.5,,,,,,,30
1,,5,7,0,0,10,0,
";
    let set = read_annotations_from(Cursor::new(text)).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.first_frame(), Some(1));
    let first = set.get(1).unwrap();
    assert_eq!(first.tip_offset, 7.0);
    assert_eq!(first.object_area, 0.0);
    assert_eq!(set.get(2).unwrap().tip_offset, 12.5);
}

#[test]
fn test_annotations_are_validated() {
    let text = "frame,tip_offset,centroid_x,centroid_y,ref1_x,ref1_y,ref2_x,ref2_y,area\n3,1,,,,,,,\n3,2,,,,,,,\n";
    let err = read_annotations_from(Cursor::new(text)).unwrap_err();
    assert!(matches!(
        err,
        IoError::Annotation(crate::position::CorrectionRangeError::DuplicateFrame(3))
    ));
}

#[test]
fn test_annotation_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annotations.csv");
    let annotations = vec![
        PositionCorrectionAnnotation {
            frame_index: 1,
            tip_offset: Some(4.0),
            object_area: Some(12.0),
            ..Default::default()
        },
        PositionCorrectionAnnotation {
            frame_index: 5,
            cell_centroid: Some(Point::new(3.0, 9.0)),
            reference_line: Some((Point::new(0.0, 1.0), Point::new(20.0, 1.0))),
            ..Default::default()
        },
    ];
    write_annotations(&path, &annotations).unwrap();

    let set = read_annotations(&path).unwrap();
    assert_eq!(set, crate::position::AnnotationSet::new(annotations).unwrap());
    assert_eq!(set.get(5).unwrap().tip_offset, 8.0);
}

#[test]
fn test_mass_csv_layout() {
    let series = MassSeries::new(&[0.0, 3600.0], &[1.5, f64::NAN], None, 2).unwrap();
    let mut buffer = Vec::new();
    write_mass_csv_to(&mut buffer, &series).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Time (h),Mass (ng),Mean mass (ng)");
    assert_eq!(lines[1], "0,1.5,nan");
    assert_eq!(lines[2], "1,nan,nan");

    let series = MassSeries::new(&[0.0], &[2.0], Some(&[7.5]), 1).unwrap();
    let mut buffer = Vec::new();
    write_mass_csv_to(&mut buffer, &series).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with("Time (h),Mass (ng),Mean mass (ng),Object area (um_sq)\n0,2,2,7.5"));
}

#[test]
fn test_missing_input_reports_path() {
    let err = read_series(std::path::Path::new("/nonexistent/baseline.txt"), &TextFormat::default()).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/baseline.txt"));
}

#[test]
fn test_project_load_run_and_write() {
    let dir = tempfile::tempdir().unwrap();
    let cantilever = SyntheticCantilever::default();
    let mut config = ProjectConfig::default().with_base_dir(dir.path());
    config.project.baseline_header_lines = 1;
    config.project.mode = AcquisitionMode::Pll;
    config.fit = cantilever.fit_settings();
    config.output.rolling_window = 2;

    let header = vec!["Frequency\tAmplitude\tPhase".to_string()];
    let fmt = baseline_format(&config).unwrap();
    write_series(
        &config.resolve(&config.project.baseline_no_cell),
        &cantilever.baseline(cantilever.f_no_cell).unwrap(),
        &fmt,
        &header,
    )
    .unwrap();
    write_series(
        &config.resolve(&config.project.baseline_with_cell),
        &cantilever.baseline(cantilever.f_with_cell).unwrap(),
        &fmt,
        &header,
    )
    .unwrap();
    let pll = cantilever.pll(&[0.05, 0.06, 0.07], 600.0).unwrap();
    write_series(
        &config.resolve(&config.project.measurement),
        &pll.series,
        &measurement_format(&config).unwrap(),
        &[],
    )
    .unwrap();

    let input = load_project_input(&config).unwrap();
    assert!(input.annotations.is_empty());
    let output = InertialMassPipeline::new(config.pipeline_settings())
        .unwrap()
        .run(&input)
        .unwrap();
    write_project_results(&config, &output).unwrap();

    let mass = std::fs::read_to_string(config.mass_output_path()).unwrap();
    assert_eq!(mass.lines().count(), 4);
    let fits: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config.fits_output_path()).unwrap()).unwrap();
    assert_eq!(fits["position_correction"]["mode"], "static");
    assert_eq!(fits["stats"]["samples"], 3);
    let f0 = fits["baseline_no_cell"]["resonance_frequency"].as_f64().unwrap();
    assert!((f0 - 72.8).abs() < 1e-6);
}

#[test]
fn test_concatenate_logger_files_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("chunk_002.dat"), "3\t30\n").unwrap();
    std::fs::write(dir.path().join("chunk_001.dat"), "1\t10\n2\t20\n").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let files = logger_files(dir.path(), "dat").unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("chunk_001.dat"));

    let series = concatenate_series(&files, &TextFormat::default(), 500.0).unwrap();
    assert_eq!(series.n_columns(), 3);
    assert_eq!(series.column(0).unwrap(), &[0.0, 0.5, 1.0]);
    assert_eq!(series.column(1).unwrap(), &[1.0, 2.0, 3.0]);
    assert_eq!(series.column(2).unwrap(), &[10.0, 20.0, 30.0]);
}

#[test]
fn test_concatenate_rejects_bad_interval_and_mismatched_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.dat"), "1\t10\n").unwrap();
    std::fs::write(dir.path().join("b.dat"), "2\t20\t200\n").unwrap();
    let files = logger_files(dir.path(), "dat").unwrap();

    assert!(matches!(
        concatenate_series(&files, &TextFormat::default(), 0.0),
        Err(IoError::InvalidInterval(_))
    ));
    assert!(matches!(
        concatenate_series(&files, &TextFormat::default(), 100.0),
        Err(IoError::DataFormat(DataFormatError::RaggedRow { .. }))
    ));
}

#[test]
fn test_non_ascii_delimiter_is_rejected() {
    assert!(matches!(TextFormat::new('é', 0), Err(IoError::InvalidDelimiter('é'))));
    assert!(matches!(TextFormat::new('→', 0), Err(IoError::InvalidDelimiter('→'))));
    assert_eq!(TextFormat::new(';', 3).unwrap().delimiter, b';');
}
