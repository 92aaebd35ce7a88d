use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use inertial_mass::io::{concatenate_series, logger_files, write_series, TextFormat};

/// Join logger chunk files into one measurement table
pub fn run(
    dir: PathBuf,
    output: PathBuf,
    interval_ms: f64,
    extension: String,
    delimiter: String,
    header_lines: usize,
) -> Result<()> {
    let delimiter = parse_delimiter(&delimiter)?;
    let format = TextFormat::new(delimiter, header_lines)?;

    let files = logger_files(&dir, &extension)
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    if files.is_empty() {
        anyhow::bail!("No .{} files in {}", extension, dir.display());
    }
    info!("Concatenating {} files from {}", files.len(), dir.display());

    let series = concatenate_series(&files, &format, interval_ms).context("Failed to concatenate files")?;
    let written = TextFormat::new(delimiter, 0)?;
    write_series(&output, &series, &written, &[])
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} samples from {} files to {}",
        series.len(),
        files.len(),
        output.display()
    );
    Ok(())
}

/// Accept a literal character or the escapes `\t` and `\s`
fn parse_delimiter(text: &str) -> Result<char> {
    match text {
        "\\t" | "tab" => Ok('\t'),
        "\\s" | "space" => Ok(' '),
        _ => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c),
                _ => anyhow::bail!("Delimiter must be a single ASCII character, got {:?}", text),
            }
        }
    }
}
