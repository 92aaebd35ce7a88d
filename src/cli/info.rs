use anyhow::{Context, Result};
use std::path::PathBuf;

use inertial_mass::config::ProjectConfig;

/// Print the resolved settings of a project
pub fn run(project: PathBuf) -> Result<()> {
    if !project.exists() {
        anyhow::bail!("File does not exist: {}", project.display());
    }
    let config = ProjectConfig::from_file(&project)
        .with_context(|| format!("Failed to load project {}", project.display()))?;

    println!("Project File Information");
    println!("========================");
    println!("File: {}", project.display());
    println!();
    println!("{}", config);
    println!();
    println!("Output:");
    println!("  Mass series: {}", config.mass_output_path().display());
    if config.output.write_fits {
        println!("  Fit diagnostics: {}", config.fits_output_path().display());
    }

    if let Err(e) = config.validate() {
        println!();
        println!("Warning: configuration is invalid: {}", e);
    }
    Ok(())
}
