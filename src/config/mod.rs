//! # Project configuration
//!
//! A project is described by one TOML file naming the input recordings and
//! holding every physical constant and processing setting of a run. All
//! sections are optional and fall back to defaults.
//!
//! ```rust
//! use inertial_mass::config::ProjectConfig;
//!
//! let config = ProjectConfig::from_str(r#"
//!     [cantilever]
//!     spring_constant = 4.5
//!
//!     [output]
//!     rolling_window = 50
//! "#)?;
//! config.validate()?;
//! assert_eq!(config.pipeline_settings().spring_constant, 4.5);
//! # Ok::<(), inertial_mass::config::ConfigError>(())
//! ```

mod error;
mod project;


pub use error::ConfigError;
pub use project::{
    CantileverSection, ColumnsSection, OutputSection, ProjectConfig, ProjectSection, SweepSection,
};
