//! Box-constrained Levenberg–Marquardt for the four-parameter resonance model.
//!
//! Steps are computed on the free parameters only; parameters sitting on a
//! bound with the gradient pointing outwards are held fixed for that
//! iteration, and every trial point is projected back into the box. The
//! solver is fully deterministic.

use log::trace;
use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};

use super::model::{gradient, phase_response, N_PARAMS};
use super::{FitError, ParameterBounds};

const LAMBDA_INITIAL: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e16;
const DIAG_FLOOR: f64 = 1e-12;

/// Termination settings for the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Maximum number of accepted or rejected outer iterations
    pub max_iterations: usize,
    /// Relative cost reduction below which the fit is converged
    pub ftol: f64,
    /// Relative step size below which the fit is converged
    pub xtol: f64,
    /// Projected gradient norm below which the fit is converged
    pub gtol: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1e-12,
            xtol: 1e-10,
            gtol: 1e-12,
        }
    }
}

/// Converged solver state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Fitted parameters
    pub parameters: [f64; N_PARAMS],
    /// Sum of squared residuals at the solution
    pub residual_sum_of_squares: f64,
    /// Outer iterations used
    pub iterations: usize,
}

/// Minimise the squared residuals of the phase model over `(x, y)`.
///
/// Inputs are assumed validated (equal lengths, finite values, guess inside
/// the bounds).
pub fn solve(
    x: &[f64],
    y: &[f64],
    guess: [f64; N_PARAMS],
    bounds: &ParameterBounds,
    options: &SolverOptions,
) -> Result<Solution, FitError> {
    let mut p = bounds.project(guess);
    let mut cost = half_sum_squares(x, y, &p);
    if !cost.is_finite() {
        return Err(FitError::NotConverged { iterations: 0, cost });
    }
    let mut lambda = LAMBDA_INITIAL;

    for iteration in 1..=options.max_iterations {
        let (jtj, jtr) = normal_equations(x, y, &p);
        let free = free_parameters(&p, &jtr, bounds);

        let projected_gradient = (0..N_PARAMS)
            .filter(|&i| free[i])
            .map(|i| jtr[i].abs())
            .fold(0.0_f64, f64::max);
        if projected_gradient <= options.gtol {
            return Ok(converged(p, cost, iteration));
        }

        // Inner loop: raise damping until a step lowers the cost
        loop {
            let Some(step) = damped_step(&jtj, &jtr, &free, lambda) else {
                lambda *= 10.0;
                if lambda > LAMBDA_MAX {
                    return Ok(converged(p, cost, iteration));
                }
                continue;
            };

            let mut candidate = p;
            for i in 0..N_PARAMS {
                candidate[i] += step[i];
            }
            let candidate = bounds.project(candidate);
            let candidate_cost = half_sum_squares(x, y, &candidate);

            if candidate_cost.is_finite() && candidate_cost < cost {
                let step_norm = norm(&sub(&candidate, &p));
                let reduction = cost - candidate_cost;
                trace!(
                    "iteration {}: cost {:e} -> {:e} (lambda {:e})",
                    iteration,
                    cost,
                    candidate_cost,
                    lambda
                );

                let previous_norm = norm(&p);
                p = candidate;
                cost = candidate_cost;
                lambda = (lambda / 10.0).max(LAMBDA_MIN);

                if reduction <= options.ftol * (cost + reduction)
                    || step_norm <= options.xtol * (previous_norm + options.xtol)
                {
                    return Ok(converged(p, cost, iteration));
                }
                break;
            }

            lambda *= 10.0;
            if lambda > LAMBDA_MAX {
                // No descent possible at any damping: the iterate is stationary
                return Ok(converged(p, cost, iteration));
            }
        }
    }

    Err(FitError::NotConverged {
        iterations: options.max_iterations,
        cost: 2.0 * cost,
    })
}

fn converged(parameters: [f64; N_PARAMS], cost: f64, iterations: usize) -> Solution {
    Solution {
        parameters,
        residual_sum_of_squares: 2.0 * cost,
        iterations,
    }
}

fn half_sum_squares(x: &[f64], y: &[f64], p: &[f64; N_PARAMS]) -> f64 {
    0.5 * x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r = phase_response(xi, p) - yi;
            r * r
        })
        .sum::<f64>()
}

/// Accumulate JᵀJ and Jᵀr without materialising the Jacobian
fn normal_equations(x: &[f64], y: &[f64], p: &[f64; N_PARAMS]) -> (Matrix4<f64>, Vector4<f64>) {
    let mut jtj = Matrix4::<f64>::zeros();
    let mut jtr = Vector4::<f64>::zeros();
    for (&xi, &yi) in x.iter().zip(y) {
        let r = phase_response(xi, p) - yi;
        let row = Vector4::from(gradient(xi, p));
        jtj += row * row.transpose();
        jtr += row * r;
    }
    (jtj, jtr)
}

/// A parameter is free unless it sits on a bound and descent would push it out
fn free_parameters(p: &[f64; N_PARAMS], jtr: &Vector4<f64>, bounds: &ParameterBounds) -> [bool; N_PARAMS] {
    let mut free = [true; N_PARAMS];
    for i in 0..N_PARAMS {
        let at_lower = p[i] <= bounds.lower[i] && jtr[i] > 0.0;
        let at_upper = p[i] >= bounds.upper[i] && jtr[i] < 0.0;
        free[i] = !(at_lower || at_upper);
    }
    free
}

fn damped_step(
    jtj: &Matrix4<f64>,
    jtr: &Vector4<f64>,
    free: &[bool; N_PARAMS],
    lambda: f64,
) -> Option<[f64; N_PARAMS]> {
    let mut a = *jtj;
    let mut rhs = -(*jtr);
    for i in 0..N_PARAMS {
        if free[i] {
            a[(i, i)] += lambda * jtj[(i, i)].max(DIAG_FLOOR);
        } else {
            for j in 0..N_PARAMS {
                a[(i, j)] = 0.0;
                a[(j, i)] = 0.0;
            }
            a[(i, i)] = 1.0;
            rhs[i] = 0.0;
        }
    }
    let delta = a.cholesky()?.solve(&rhs);
    delta
        .iter()
        .all(|d| d.is_finite())
        .then(|| [delta[0], delta[1], delta[2], delta[3]])
}

fn sub(a: &[f64; N_PARAMS], b: &[f64; N_PARAMS]) -> [f64; N_PARAMS] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]]
}

fn norm(v: &[f64; N_PARAMS]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
