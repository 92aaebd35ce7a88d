use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::fit::FitSettings;
use crate::offset::{FrequencyOffsetMode, FrequencyOffsetSettings};
use crate::pipeline::PipelineSettings;
use crate::position::PositionCorrectionSettings;
use crate::series::{AcquisitionMode, BaselineColumns, PllColumns};
use crate::units::UnitConverter;

/// Input files and text layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Free-form project name
    pub name: String,
    /// Acquisition mode of the measurement
    pub mode: AcquisitionMode,
    /// Baseline sweep without cell
    pub baseline_no_cell: PathBuf,
    /// Baseline sweep with cell
    pub baseline_with_cell: PathBuf,
    /// PLL table or sweep table
    pub measurement: PathBuf,
    /// Optional position annotation CSV
    pub annotations: Option<PathBuf>,
    /// Directory results are written to
    pub output_dir: PathBuf,
    /// Field delimiter of the data files
    pub delimiter: char,
    /// Header lines skipped in baseline files
    pub baseline_header_lines: usize,
    /// Header lines skipped in the measurement file
    pub measurement_header_lines: usize,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: "untitled".to_string(),
            mode: AcquisitionMode::Pll,
            baseline_no_cell: PathBuf::from("baseline_no_cell.txt"),
            baseline_with_cell: PathBuf::from("baseline_with_cell.txt"),
            measurement: PathBuf::from("measurement.txt"),
            annotations: None,
            output_dir: PathBuf::from("results"),
            delimiter: '\t',
            baseline_header_lines: 23,
            measurement_header_lines: 0,
        }
    }
}

/// Cantilever properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CantileverSection {
    /// Spring constant (N/m)
    pub spring_constant: f64,
    /// Length (µm)
    pub length: f64,
    /// Static cell offset from the tip (µm)
    pub cell_position: f64,
}

impl Default for CantileverSection {
    fn default() -> Self {
        Self {
            spring_constant: 8.0,
            length: 100.0,
            cell_position: 0.0,
        }
    }
}

/// Result files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Rolling mean window (samples)
    pub rolling_window: usize,
    /// Mass series CSV file name
    pub mass_file: String,
    /// Fit diagnostics JSON file name
    pub fits_file: String,
    /// Write the fit diagnostics at all
    pub write_fits: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            rolling_window: 1000,
            mass_file: "mass.csv".to_string(),
            fits_file: "fits.json".to_string(),
            write_fits: true,
        }
    }
}

/// Sweep acquisition metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSection {
    /// Channel names in acquisition order, including `Untitled` padding
    pub channel_names: Vec<String>,
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            channel_names: ["Amplitude", "Phase", "Frequency", "Untitled 3"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Column roles of the text inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsSection {
    /// Baseline columns
    pub baseline: BaselineColumns,
    /// PLL measurement columns
    pub pll: PllColumns,
}

/// A project file: inputs, physical constants and processing settings.
///
/// ```toml
/// [project]
/// name = "HeLa 2019-03-01"
/// mode = "pll"
/// measurement = "pll.txt"
///
/// [cantilever]
/// spring_constant = 8.0
/// length = 100.0
///
/// [frequency_offset]
/// enabled = true
/// mode = "auto"
/// n_measurements_used = 20
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Inputs and text layout
    pub project: ProjectSection,
    /// Cantilever properties
    pub cantilever: CantileverSection,
    /// Resonance fit
    pub fit: FitSettings,
    /// Unit conversion factors
    pub units: UnitConverter,
    /// PLL drift correction
    pub frequency_offset: FrequencyOffsetSettings,
    /// Annotation range policy
    pub position_correction: PositionCorrectionSettings,
    /// Result files
    pub output: OutputSection,
    /// Sweep channel metadata
    pub sweep: SweepSection,
    /// Column roles
    pub columns: ColumnsSection,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load a project file; relative paths resolve against its directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse a project from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the project file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Directory relative paths resolve against
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Override the base directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Resolve a project path against the project directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Resolved path of the mass CSV
    pub fn mass_output_path(&self) -> PathBuf {
        self.resolve(&self.project.output_dir).join(&self.output.mass_file)
    }

    /// Resolved path of the fit JSON
    pub fn fits_output_path(&self) -> PathBuf {
        self.resolve(&self.project.output_dir).join(&self.output.fits_file)
    }

    /// Check every setting that can be checked without reading data.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.cantilever;
        if !(c.spring_constant.is_finite() && c.spring_constant > 0.0) {
            return Err(ConfigError::invalid(
                "cantilever.spring_constant",
                format!("must be positive, got {}", c.spring_constant),
            ));
        }
        if !(c.length.is_finite() && c.length > 0.0) {
            return Err(ConfigError::invalid(
                "cantilever.length",
                format!("must be positive, got {}", c.length),
            ));
        }
        if !(c.cell_position.is_finite() && c.cell_position >= 0.0 && c.cell_position < c.length) {
            return Err(ConfigError::invalid(
                "cantilever.cell_position",
                format!("must lie in [0, {}), got {}", c.length, c.cell_position),
            ));
        }

        self.fit
            .fitter()
            .map_err(|e| ConfigError::invalid("fit", e.to_string()))?;
        self.units.validate().map_err(|e| ConfigError::invalid("units", e))?;

        if self.output.rolling_window == 0 {
            return Err(ConfigError::invalid("output.rolling_window", "must be >= 1"));
        }
        let offset = &self.frequency_offset;
        if offset.enabled && offset.mode == FrequencyOffsetMode::Auto && offset.n_measurements_used == 0 {
            return Err(ConfigError::invalid(
                "frequency_offset.n_measurements_used",
                "must be >= 1 in auto mode",
            ));
        }
        if !offset.frequency_offset.is_finite() {
            return Err(ConfigError::invalid("frequency_offset.frequency_offset", "must be finite"));
        }
        if self.position_correction.samples_per_frame == 0 {
            return Err(ConfigError::invalid(
                "position_correction.samples_per_frame",
                "must be >= 1",
            ));
        }
        if !self.project.delimiter.is_ascii() {
            return Err(ConfigError::invalid(
                "project.delimiter",
                format!("must be a single ASCII character, got {:?}", self.project.delimiter),
            ));
        }
        if self.project.mode == AcquisitionMode::Sweep && self.sweep.channel_names.is_empty() {
            return Err(ConfigError::invalid("sweep.channel_names", "must not be empty in sweep mode"));
        }
        Ok(())
    }

    /// Settings for the numerical pipeline
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            spring_constant: self.cantilever.spring_constant,
            cantilever_length: self.cantilever.length,
            cell_position: self.cantilever.cell_position,
            fit: self.fit,
            units: self.units,
            frequency_offset: self.frequency_offset,
            position_correction: self.position_correction,
            baseline_columns: self.columns.baseline,
            rolling_window: self.output.rolling_window,
        }
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.project;
        writeln!(f, "Project: {}", p.name)?;
        writeln!(f, "  Mode: {}", p.mode)?;
        writeln!(f, "  Baseline (no cell): {}", self.resolve(&p.baseline_no_cell).display())?;
        writeln!(f, "  Baseline (with cell): {}", self.resolve(&p.baseline_with_cell).display())?;
        writeln!(f, "  Measurement: {}", self.resolve(&p.measurement).display())?;
        match &p.annotations {
            Some(path) => writeln!(f, "  Annotations: {}", self.resolve(path).display())?,
            None => writeln!(f, "  Annotations: none (static position correction)")?,
        }
        writeln!(f, "Cantilever:")?;
        writeln!(f, "  Spring constant: {} N/m", self.cantilever.spring_constant)?;
        writeln!(f, "  Length: {} um", self.cantilever.length)?;
        writeln!(f, "  Cell position: {} um from tip", self.cantilever.cell_position)?;
        writeln!(f, "Fit:")?;
        writeln!(f, "  Initial guess: {:?}", self.fit.initial_guess)?;
        writeln!(f, "  Lower bounds: {:?}", self.fit.lower_bounds)?;
        writeln!(f, "  Upper bounds: {:?}", self.fit.upper_bounds)?;
        writeln!(f, "  Max iterations: {}", self.fit.solver.max_iterations)?;
        let offset = &self.frequency_offset;
        if !offset.enabled {
            writeln!(f, "Frequency offset: disabled")?;
        } else {
            match offset.mode {
                FrequencyOffsetMode::Auto => writeln!(
                    f,
                    "Frequency offset: auto (mean of first {} samples)",
                    offset.n_measurements_used
                )?,
                FrequencyOffsetMode::Manual => {
                    writeln!(f, "Frequency offset: manual ({} kHz)", offset.frequency_offset)?
                }
            }
        }
        let pc = &self.position_correction;
        writeln!(
            f,
            "Position correction: start index {}, {} samples/frame, end frame {}, outside range = {}",
            pc.image_start_index,
            pc.samples_per_frame,
            pc.position_correction_end_frame
                .map_or_else(|| "last annotated".to_string(), |v| v.to_string()),
            pc.floor()
        )?;
        write!(f, "Rolling window: {} samples", self.output.rolling_window)
    }
}
