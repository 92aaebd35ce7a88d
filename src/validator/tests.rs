use super::*;
use crate::synthetic::{write_demo_project, SyntheticCantilever, DEMO_SAMPLES};

fn demo_project() -> (tempfile::TempDir, ProjectConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = write_demo_project(dir.path(), &SyntheticCantilever::default()).unwrap();
    (dir, config)
}

#[test]
fn test_demo_project_passes() {
    let (_dir, config) = demo_project();
    let report = validate_project(&config);
    assert_eq!(report.verdict(), Verdict::Passed, "{}", report);
    assert_eq!(
        report.tally(),
        Tally {
            passed: 6,
            ..Default::default()
        }
    );
    for stage in Stage::ALL {
        assert!(report.stage(stage).next().is_some(), "no check for {:?}", stage);
    }
    assert_eq!(report.stage(Stage::Baselines).count(), 2);
    assert!(report.to_string().contains("Validation PASSED (6 passed"));
}

#[test]
fn test_invalid_config_skips_later_stages() {
    let (_dir, mut config) = demo_project();
    config.cantilever.spring_constant = -1.0;
    let report = validate_project(&config);

    assert_eq!(report.verdict(), Verdict::Failed);
    let first = &report.checks()[0];
    assert_eq!(first.stage, Stage::Configuration);
    assert!(matches!(first.status, CheckStatus::Failed(ref msg) if msg.contains("spring_constant")));

    let tally = report.tally();
    assert_eq!((tally.failed, tally.skipped), (1, 4));
    let output = report.stage(Stage::Output).next().unwrap();
    assert_eq!(output.status, CheckStatus::Skipped("configuration is invalid".to_string()));
}

#[test]
fn test_missing_measurement_skips_correction() {
    let (dir, config) = demo_project();
    std::fs::remove_file(dir.path().join("measurement.txt")).unwrap();
    let report = validate_project(&config);

    assert_eq!(report.tally().failed, 1);
    let measurement = report.stage(Stage::Measurement).next().unwrap();
    assert!(matches!(measurement.status, CheckStatus::Failed(_)));
    let correction: Vec<_> = report.stage(Stage::Correction).collect();
    assert_eq!(correction.len(), 1);
    assert!(matches!(correction[0].status, CheckStatus::Skipped(_)));
    // baselines and outputs are still checked
    assert_eq!(report.stage(Stage::Baselines).count(), 2);
    assert_eq!(report.stage(Stage::Output).next().unwrap().status, CheckStatus::Passed);
}

#[test]
fn test_clipped_end_frame_is_a_finding() {
    let (_dir, mut config) = demo_project();
    config.position_correction.position_correction_end_frame = Some(50);
    let report = validate_project(&config);

    assert_eq!(report.verdict(), Verdict::PassedWithWarnings, "{}", report);
    let findings: Vec<_> = report.findings().collect();
    assert_eq!(
        findings,
        vec![&Finding::ClippedEnd {
            requested: 49 * 40,
            used: DEMO_SAMPLES - 1,
        }]
    );
}

#[test]
fn test_existing_outputs_are_reported() {
    let (_dir, config) = demo_project();
    let out = config.resolve(&config.project.output_dir);
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(config.mass_output_path(), "old").unwrap();
    let report = validate_project(&config);

    assert_eq!(report.tally().warned, 1);
    assert_eq!(
        report.findings().next(),
        Some(&Finding::Overwrite(vec![config.mass_output_path()]))
    );
    assert!(report.to_string().contains("PASSED with warnings"));
}

#[test]
fn test_render_groups_checks_by_stage() {
    let mut report = ValidationReport::new("demo");
    report.record(Stage::Measurement, "sweep recording: 4 samples", CheckStatus::Warned(Finding::LegacyLayout));
    report.record(Stage::Configuration, "Project file", CheckStatus::Passed);

    let text = report.to_string();
    let configuration = text.find("\nConfiguration\n").unwrap();
    let measurement = text.find("\nMeasurement\n").unwrap();
    assert!(configuration < measurement);
    assert!(!text.contains("\nBaselines\n"));
    assert!(text.contains("warn sweep recording: 4 samples: legacy 4-row sweep layout"));
    assert!(text.ends_with("Validation PASSED with warnings (1 passed, 1 warnings, 0 failed, 0 skipped)"));
    assert!(!report.has_failures());
}
