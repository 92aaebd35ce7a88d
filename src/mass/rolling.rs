use super::MassError;

/// Trailing rolling mean.
///
/// Entry `i` is the mean of `values[i + 1 - window..=i]`. The first
/// `window - 1` entries and every window containing a NaN are NaN.
/// Each window is summed on its own with compensated summation, so a
/// large or infinite value only affects the windows that contain it, and
/// a window of identical values yields exactly that value.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<f64>, MassError> {
    if window == 0 {
        return Err(MassError::ZeroWindow);
    }

    let mut out = Vec::with_capacity(values.len());
    // length of the run of identical values ending at `i`
    let mut run = 0usize;
    for (i, &v) in values.iter().enumerate() {
        run = if i > 0 && v == values[i - 1] { run + 1 } else { 1 };
        if i + 1 < window {
            out.push(f64::NAN);
        } else if run >= window {
            out.push(v);
        } else {
            out.push(window_mean(&values[i + 1 - window..=i]));
        }
    }
    Ok(out)
}

fn window_mean(window: &[f64]) -> f64 {
    let n = window.len() as f64;
    if window.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    if window.iter().any(|v| v.is_infinite()) {
        // ±inf, or NaN when both signs are present
        return window.iter().sum::<f64>() / n;
    }
    neumaier_sum(window) / n
}

/// Kahan–Babuška summation
fn neumaier_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}
