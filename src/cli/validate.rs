use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use inertial_mass::config::ProjectConfig;
use inertial_mass::validator::validate_project;

/// Validate a project's configuration and inputs
pub fn run(project: PathBuf) -> Result<()> {
    info!("Validating project {}", project.display());

    let config = ProjectConfig::from_file(&project)
        .with_context(|| format!("Failed to load project {}", project.display()))?;
    let report = validate_project(&config);

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
