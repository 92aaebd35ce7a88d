//! End-to-end tests: project files on disk through the pipeline to result
//! files.

use inertial_mass::config::ProjectConfig;
use inertial_mass::io::{
    load_project_input, measurement_format, write_project_results, write_series, write_sweep_table, MASS_HEADERS,
};
use inertial_mass::pipeline::InertialMassPipeline;
use inertial_mass::series::{AcquisitionMode, RawSweepTable};
use inertial_mass::synthetic::{write_demo_project, SyntheticCantilever, DEMO_SAMPLES};
use tempfile::tempdir;

fn read_mass_rows(config: &ProjectConfig) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(config.mass_output_path()).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

/// Convert a canonical sweep table into the 4-row legacy layout
/// (offset, frequency residual, amplitude, phase).
fn to_legacy(table: &RawSweepTable) -> RawSweepTable {
    let mut rows = Vec::new();
    for block in table.rows.chunks(3) {
        let offset: Vec<f64> = block[2].iter().map(|f| f.floor()).collect();
        let residual: Vec<f64> = block[2].iter().zip(&offset).map(|(f, o)| f - o).collect();
        rows.push(offset);
        rows.push(residual);
        rows.push(block[0].clone());
        rows.push(block[1].clone());
    }
    RawSweepTable {
        channel_names: ["Offset", "Frequency", "Amplitude", "Phase", "Untitled 4"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rows,
        timestamps: table.timestamps.clone(),
    }
}

#[test]
fn test_demo_project_from_saved_toml() {
    let dir = tempdir().unwrap();
    let cantilever = SyntheticCantilever::default();
    let written = write_demo_project(dir.path(), &cantilever).unwrap();
    let project = dir.path().join("project.toml");
    written.save(&project).unwrap();

    let config = ProjectConfig::from_file(&project).unwrap();
    config.validate().unwrap();
    let input = load_project_input(&config).unwrap();
    assert_eq!(input.annotations.len(), 6);

    let output = InertialMassPipeline::new(config.pipeline_settings())
        .unwrap()
        .run(&input)
        .unwrap();
    write_project_results(&config, &output).unwrap();

    let (headers, rows) = read_mass_rows(&config);
    assert_eq!(headers, MASS_HEADERS.to_vec());
    assert_eq!(rows.len(), DEMO_SAMPLES);
    // rolling window 30: the first 29 means are missing
    assert_eq!(rows[0][2], "nan");
    assert_ne!(rows[29][2], "nan");
    // last annotated frame, then the outside-range value
    assert_eq!(rows[200][3], "210");
    assert_eq!(rows[201][3], "1");

    let masses = output.mass.masses();
    assert!(masses.iter().all(|m| m.is_finite()));
    assert!(masses[200] > masses[0]);
    assert!(config.fits_output_path().exists());
}

#[test]
fn test_legacy_sweep_project() {
    let dir = tempdir().unwrap();
    let cantilever = SyntheticCantilever {
        points: 61,
        ..Default::default()
    };
    let mut config = write_demo_project(dir.path(), &cantilever).unwrap();
    config.project.mode = AcquisitionMode::Sweep;
    config.project.annotations = None;
    config.output.rolling_window = 2;
    config.output.write_fits = false;
    config.sweep.channel_names = vec![
        "Offset".to_string(),
        "Frequency".to_string(),
        "Amplitude".to_string(),
        "Phase".to_string(),
        "Untitled 4".to_string(),
    ];

    let centers = [71.9, 71.88, 71.86, 71.84];
    let table = to_legacy(&cantilever.sweep_table(&centers, 1_551_434_400.0, 900.0));
    write_sweep_table(
        &config.resolve(&config.project.measurement),
        &table,
        &measurement_format(&config).unwrap(),
    )
    .unwrap();

    let input = load_project_input(&config).unwrap();
    let output = InertialMassPipeline::new(config.pipeline_settings())
        .unwrap()
        .run(&input)
        .unwrap();
    assert!(output.skipped_samples.is_empty());
    for (fit, center) in output.sweep_fits.iter().zip(centers) {
        let fit = fit.as_ref().unwrap();
        assert!((fit.resonance_frequency - center).abs() < 1e-4);
    }
    let hours: Vec<f64> = output.mass.records().iter().map(|r| r.elapsed_time_hours).collect();
    assert_eq!(hours, vec![0.0, 0.25, 0.5, 0.75]);

    write_project_results(&config, &output).unwrap();
    let (headers, rows) = read_mass_rows(&config);
    assert_eq!(headers.len(), 3);
    assert_eq!(rows.len(), centers.len());
    assert!(!config.fits_output_path().exists());
}

#[test]
fn test_missing_column_is_reported_before_fitting() {
    let dir = tempdir().unwrap();
    let config = write_demo_project(dir.path(), &SyntheticCantilever::default()).unwrap();
    let pll = SyntheticCantilever::default().pll(&[0.0; 4], 1.0).unwrap();
    let truncated = inertial_mass::series::RawSeries::from_columns(vec![
        pll.series.column(0).unwrap().to_vec(),
        pll.series.column(1).unwrap().to_vec(),
    ])
    .unwrap();
    write_series(
        &config.resolve(&config.project.measurement),
        &truncated,
        &measurement_format(&config).unwrap(),
        &[],
    )
    .unwrap();

    let input = load_project_input(&config).unwrap();
    let err = InertialMassPipeline::new(config.pipeline_settings())
        .unwrap()
        .run(&input)
        .unwrap_err();
    assert!(err.to_string().contains("measurement"), "{err}");
}
