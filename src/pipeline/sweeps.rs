use crate::fit::{FitError, ResonanceFit, ResonanceFrequencyFitter};
use crate::series::{SweepSeries, SweepView};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fit every sweep; results are in sweep order.
#[cfg(feature = "parallel")]
pub(super) fn fit_sweeps(
    fitter: &ResonanceFrequencyFitter,
    sweeps: &SweepSeries,
) -> Vec<Result<ResonanceFit, FitError>> {
    let views: Vec<SweepView<'_>> = sweeps.sweeps().collect();
    views.par_iter().map(|view| fit_one(fitter, view)).collect()
}

/// Fit every sweep; results are in sweep order.
#[cfg(not(feature = "parallel"))]
pub(super) fn fit_sweeps(
    fitter: &ResonanceFrequencyFitter,
    sweeps: &SweepSeries,
) -> Vec<Result<ResonanceFit, FitError>> {
    sweeps.sweeps().map(|view| fit_one(fitter, &view)).collect()
}

fn fit_one(fitter: &ResonanceFrequencyFitter, view: &SweepView<'_>) -> Result<ResonanceFit, FitError> {
    fitter.fit(view.frequency, view.phase)
}
