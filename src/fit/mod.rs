//! # Resonance frequency fitting
//!
//! Extracts the resonance frequency of the cantilever from a phase-vs-frequency
//! curve by fitting the damped-oscillator phase response (see [`model`]) with a
//! box-constrained Levenberg–Marquardt solver (see [`solver`]).
//!
//! The fitter is used on both baseline recordings and, in sweep mode, once per
//! sweep of the long-term measurement.
//!
//! ```rust
//! use inertial_mass::fit::{FitSettings, model};
//!
//! let truth = [1.0, 72.8, 0.04, -1.5];
//! let frequency: Vec<f64> = (0..81).map(|i| 72.6 + i as f64 * 0.005).collect();
//! let phase: Vec<f64> = frequency.iter().map(|&f| model::phase_response(f, &truth)).collect();
//!
//! let fit = FitSettings::default().fitter()?.fit(&frequency, &phase)?;
//! assert!((fit.resonance_frequency - 72.8).abs() < 1e-6);
//! # Ok::<(), inertial_mass::fit::FitError>(())
//! ```

mod error;
pub mod model;
pub mod solver;


use log::debug;
use serde::{Deserialize, Serialize};

pub use error::FitError;
use model::{N_PARAMS, PARAMETER_NAMES, WIDTH};
pub use solver::{Solution, SolverOptions};

/// Box constraints on the four model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    /// Lower bounds `[amplitude, center, width, offset]`
    pub lower: [f64; N_PARAMS],
    /// Upper bounds `[amplitude, center, width, offset]`
    pub upper: [f64; N_PARAMS],
}

impl ParameterBounds {
    /// Create bounds, checking `lower <= upper` and a positive width floor.
    pub fn new(lower: [f64; N_PARAMS], upper: [f64; N_PARAMS]) -> Result<Self, FitError> {
        for i in 0..N_PARAMS {
            if lower[i].is_nan() || upper[i].is_nan() || lower[i] > upper[i] {
                return Err(FitError::InvalidBounds(format!(
                    "{}: lower {} exceeds upper {}",
                    PARAMETER_NAMES[i], lower[i], upper[i]
                )));
            }
        }
        if lower[WIDTH] <= 0.0 {
            return Err(FitError::InvalidBounds(format!(
                "width lower bound must be positive, got {}",
                lower[WIDTH]
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Clamp a parameter vector into the box
    pub fn project(&self, mut p: [f64; N_PARAMS]) -> [f64; N_PARAMS] {
        for i in 0..N_PARAMS {
            p[i] = p[i].clamp(self.lower[i], self.upper[i]);
        }
        p
    }

    /// True if every component lies inside the box
    pub fn contains(&self, p: &[f64; N_PARAMS]) -> bool {
        (0..N_PARAMS).all(|i| self.lower[i] <= p[i] && p[i] <= self.upper[i])
    }
}

/// Result of one resonance fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonanceFit {
    /// Fitted center frequency (same unit as the frequency axis)
    pub resonance_frequency: f64,
    /// Fitted `[amplitude, center, width, offset]`
    pub parameters: [f64; N_PARAMS],
    /// Bounds the fit was constrained to
    pub bounds: ParameterBounds,
    /// Solver iterations
    pub iterations: usize,
    /// Sum of squared residuals
    pub residual_sum_of_squares: f64,
}

impl ResonanceFit {
    /// Evaluate the fitted curve, e.g. for plotting
    pub fn evaluate(&self, frequency: f64) -> f64 {
        model::phase_response(frequency, &self.parameters)
    }
}

/// Configured fitter: initial guess, bounds and solver budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResonanceFrequencyFitter {
    initial_guess: [f64; N_PARAMS],
    bounds: ParameterBounds,
    options: SolverOptions,
}

impl ResonanceFrequencyFitter {
    /// Create a fitter; the guess must lie inside the bounds.
    pub fn new(
        initial_guess: [f64; N_PARAMS],
        bounds: ParameterBounds,
        options: SolverOptions,
    ) -> Result<Self, FitError> {
        for i in 0..N_PARAMS {
            let value = initial_guess[i];
            if !(bounds.lower[i] <= value && value <= bounds.upper[i]) {
                return Err(FitError::GuessOutOfBounds {
                    parameter: PARAMETER_NAMES[i],
                    value,
                    lower: bounds.lower[i],
                    upper: bounds.upper[i],
                });
            }
        }
        Ok(Self {
            initial_guess,
            bounds,
            options,
        })
    }

    /// Bounds used by this fitter
    pub fn bounds(&self) -> &ParameterBounds {
        &self.bounds
    }

    /// Fit the model to a `(frequency, phase)` curve.
    pub fn fit(&self, frequency: &[f64], phase: &[f64]) -> Result<ResonanceFit, FitError> {
        if frequency.len() != phase.len() {
            return Err(FitError::LengthMismatch {
                frequency: frequency.len(),
                phase: phase.len(),
            });
        }
        if frequency.len() < N_PARAMS {
            return Err(FitError::InsufficientData {
                expected: N_PARAMS,
                got: frequency.len(),
            });
        }
        if let Some(index) = frequency
            .iter()
            .zip(phase)
            .position(|(f, p)| !f.is_finite() || !p.is_finite())
        {
            return Err(FitError::NonFiniteInput { index });
        }

        let solution = solver::solve(frequency, phase, self.initial_guess, &self.bounds, &self.options)?;
        debug!(
            "Resonance fit converged in {} iterations: f0 = {:.6}, RSS = {:e}",
            solution.iterations,
            solution.parameters[model::CENTER],
            solution.residual_sum_of_squares
        );

        Ok(ResonanceFit {
            resonance_frequency: solution.parameters[model::CENTER],
            parameters: solution.parameters,
            bounds: self.bounds,
            iterations: solution.iterations,
            residual_sum_of_squares: solution.residual_sum_of_squares,
        })
    }
}

/// Fit settings as stored in a project file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    /// Initial guess `[amplitude, center, width, offset]`
    pub initial_guess: [f64; N_PARAMS],
    /// Lower bounds
    pub lower_bounds: [f64; N_PARAMS],
    /// Upper bounds
    pub upper_bounds: [f64; N_PARAMS],
    /// Solver termination settings
    pub solver: SolverOptions,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            initial_guess: [1.0, 72.7, 0.05, -1.0],
            lower_bounds: [-10.0, 10.0, 1e-4, -10.0],
            upper_bounds: [10.0, 100.0, 10.0, 10.0],
            solver: SolverOptions::default(),
        }
    }
}

impl FitSettings {
    /// Build the fitter these settings describe
    pub fn fitter(&self) -> Result<ResonanceFrequencyFitter, FitError> {
        let bounds = ParameterBounds::new(self.lower_bounds, self.upper_bounds)?;
        ResonanceFrequencyFitter::new(self.initial_guess, bounds, self.solver)
    }
}
