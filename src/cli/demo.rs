use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use inertial_mass::synthetic::{write_demo_project, SyntheticCantilever, DEMO_SAMPLES};

/// File name of the generated project
const PROJECT_FILE: &str = "project.toml";

/// Generate a synthetic PLL dataset with its project file
pub fn run(dir: PathBuf) -> Result<()> {
    info!("Writing synthetic dataset to {}", dir.display());
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let cantilever = SyntheticCantilever::default();
    let config = write_demo_project(&dir, &cantilever).context("Failed to write synthetic recordings")?;

    let project = dir.join(PROJECT_FILE);
    config
        .save(&project)
        .with_context(|| format!("Failed to write {}", project.display()))?;

    println!("Synthetic cantilever:");
    println!("  Resonance without cell: {} kHz", cantilever.f_no_cell);
    println!("  Resonance with cell: {} kHz", cantilever.f_with_cell);
    println!("  PLL samples: {} (one per minute)", DEMO_SAMPLES);
    println!();
    println!("Project written to {}", project.display());
    println!("Run it with: imd run {}", project.display());
    Ok(())
}
