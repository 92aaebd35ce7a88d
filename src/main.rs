//! # imd
//!
//! Command-line front end for inertial mass determination.
//!
//! ## Usage
//!
//! ```bash
//! # Write a synthetic dataset and project file
//! imd demo demo_project
//!
//! # Check a project without computing masses
//! imd validate demo_project/project.toml
//!
//! # Run one or more projects
//! imd -v run demo_project/project.toml other/project.toml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
