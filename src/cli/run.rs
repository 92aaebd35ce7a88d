use anyhow::{Context, Result};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[cfg(feature = "colorized_output")]
use console::style;

use inertial_mass::config::ProjectConfig;
use inertial_mass::io::{load_project_input, write_project_results};
use inertial_mass::pipeline::{InertialMassPipeline, RunStats};

/// Process projects in order; a failing project does not stop the batch.
pub fn run(projects: Vec<PathBuf>) -> Result<()> {
    let total = projects.len();
    let mut failures = Vec::new();

    for (i, project) in projects.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, total, project.display());
        let start = Instant::now();
        match run_project(project) {
            Ok(stats) => {
                print_success(project, &stats);
                info!("Finished in {:.2}s", start.elapsed().as_secs_f64());
            }
            Err(e) => {
                error!("{}: {:#}", project.display(), e);
                failures.push((project.clone(), e));
            }
        }
    }

    if failures.is_empty() {
        return Ok(());
    }
    eprintln!();
    eprintln!("{} of {} projects failed:", failures.len(), total);
    for (project, e) in &failures {
        eprintln!("  {}: {:#}", project.display(), e);
    }
    anyhow::bail!("{} of {} projects failed", failures.len(), total)
}

fn run_project(project: &Path) -> Result<RunStats> {
    let config = ProjectConfig::from_file(project)
        .with_context(|| format!("Failed to load project {}", project.display()))?;
    config.validate().context("Invalid project configuration")?;

    let input = load_project_input(&config).context("Failed to read input data")?;
    let pipeline = InertialMassPipeline::new(config.pipeline_settings()).context("Invalid pipeline settings")?;
    let output = pipeline.run(&input).context("Mass determination failed")?;

    write_project_results(&config, &output).context("Failed to write results")?;
    Ok(output.stats)
}

fn print_success(project: &Path, stats: &RunStats) {
    #[cfg(feature = "colorized_output")]
    println!("{} {}", style("✓").green().bold(), style(project.display()).bold());

    #[cfg(not(feature = "colorized_output"))]
    println!("[OK] {}", project.display());

    for line in stats.to_string().lines() {
        println!("    {}", line);
    }
}
