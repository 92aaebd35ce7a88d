use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod concat;
mod demo;
mod info;
mod run;
mod validate;

/// Inertial mass determination of single cells on resonant cantilevers
#[derive(Parser)]
#[command(name = "imd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the mass series of one or more projects
    Run {
        /// Project files (TOML), processed in order
        #[arg(value_name = "PROJECT", required = true)]
        projects: Vec<PathBuf>,
    },

    /// Print the settings of a project
    Info {
        /// Project file (TOML)
        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },

    /// Check a project's settings and inputs without computing masses
    Validate {
        /// Project file (TOML)
        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },

    /// Join data-logger chunk files into one PLL measurement table
    Concat {
        /// Directory holding the chunk files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Sampling interval in milliseconds
        #[arg(short = 'i', long, default_value = "100")]
        interval_ms: f64,

        /// Extension of the chunk files
        #[arg(short = 'e', long, default_value = "dat")]
        extension: String,

        /// Field delimiter of input and output
        #[arg(short = 'd', long, default_value = "\t")]
        delimiter: String,

        /// Header lines skipped in each chunk file
        #[arg(long, default_value = "0")]
        header_lines: usize,
    },

    /// Write a synthetic PLL dataset and its project file
    Demo {
        /// Output directory
        #[arg(value_name = "DIR", default_value = "imd_demo")]
        dir: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { projects } => run::run(projects),
        Commands::Info { project } => info::run(project),
        Commands::Validate { project } => validate::run(project),
        Commands::Concat {
            dir,
            output,
            interval_ms,
            extension,
            delimiter,
            header_lines,
        } => concat::run(dir, output, interval_ms, extension, delimiter, header_lines),
        Commands::Demo { dir } => demo::run(dir),
    }
}
