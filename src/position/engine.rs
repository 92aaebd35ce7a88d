use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::beam::position_correction_factor;
use super::{AnnotationSet, ClippedEnd, CorrectionProfile, CorrectionRangeError, PositionCorrection};
use crate::units::UnitConverter;

/// Frame-to-sample mapping and range policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionCorrectionSettings {
    /// Sample index of the first image frame
    pub image_start_index: usize,
    /// Last frame covered by the correction; defaults to the last annotated frame
    pub position_correction_end_frame: Option<usize>,
    /// Raw samples acquired per image frame
    pub samples_per_frame: usize,
    /// Floor value outside the range: 0 when set, 1 otherwise
    pub zero_outside_correction_range: bool,
}

impl Default for PositionCorrectionSettings {
    fn default() -> Self {
        Self {
            image_start_index: 0,
            position_correction_end_frame: None,
            samples_per_frame: 1,
            zero_outside_correction_range: true,
        }
    }
}

impl PositionCorrectionSettings {
    /// Factor and area used outside the interpolated range
    pub fn floor(&self) -> f64 {
        if self.zero_outside_correction_range {
            0.0
        } else {
            1.0
        }
    }
}

/// Turns the cell position (static) or frame annotations (interpolated)
/// into the correction applied to each mass sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionCorrectionEngine {
    cantilever_length: f64,
    cell_position: f64,
    settings: PositionCorrectionSettings,
    units: UnitConverter,
}

impl PositionCorrectionEngine {
    /// `cantilever_length` and `cell_position` (offset from the tip) in µm.
    pub fn new(
        cantilever_length: f64,
        cell_position: f64,
        settings: PositionCorrectionSettings,
        units: UnitConverter,
    ) -> Self {
        Self {
            cantilever_length,
            cell_position,
            settings,
            units,
        }
    }

    /// Settings in use
    pub fn settings(&self) -> &PositionCorrectionSettings {
        &self.settings
    }

    /// Static factor from the configured cell position
    pub fn static_factor(&self) -> Result<f64, CorrectionRangeError> {
        position_correction_factor(self.cantilever_length, self.cell_position)
    }

    /// Static correction without annotations, interpolated profile otherwise.
    pub fn correction(
        &self,
        annotations: &AnnotationSet,
        n_samples: usize,
    ) -> Result<PositionCorrection, CorrectionRangeError> {
        if annotations.is_empty() {
            let factor = self.static_factor()?;
            info!("Static position correction factor {:.6}", factor);
            return Ok(PositionCorrection::Static { factor });
        }
        self.profile(annotations, n_samples).map(PositionCorrection::Interpolated)
    }

    /// Interpolate the annotations over the sample range.
    ///
    /// Annotation frame `k` sits at sample `(k - 1) * samples_per_frame +
    /// image_start_index`; tip offset and area are interpolated linearly
    /// between annotated samples and held constant past the first and last.
    pub fn profile(
        &self,
        annotations: &AnnotationSet,
        n_samples: usize,
    ) -> Result<CorrectionProfile, CorrectionRangeError> {
        let spf = self.settings.samples_per_frame;
        let start = self.settings.image_start_index;
        if spf == 0 {
            return Err(CorrectionRangeError::ZeroSamplesPerFrame);
        }
        if start >= n_samples {
            return Err(CorrectionRangeError::ImageStartOutOfRange {
                image_start_index: start,
                n_samples,
            });
        }
        let (Some(first_frame), Some(last_frame)) = (annotations.first_frame(), annotations.last_frame()) else {
            return Err(CorrectionRangeError::NoAnnotations);
        };

        let end_frame = self.settings.position_correction_end_frame.unwrap_or(last_frame);
        if end_frame < first_frame {
            return Err(CorrectionRangeError::EndBeforeStart { end_frame, first_frame });
        }

        let mut offsets = Vec::with_capacity(annotations.len());
        let mut areas = Vec::with_capacity(annotations.len());
        for (frame, values) in annotations.iter() {
            let index = frame_to_index(frame, spf, start);
            if index >= n_samples {
                return Err(CorrectionRangeError::AnnotationOutOfRange {
                    frame,
                    index,
                    n_samples,
                });
            }
            // Fail on any unusable offset before touching the samples
            position_correction_factor(self.cantilever_length, self.units.length(values.tip_offset))?;
            offsets.push((index, values.tip_offset));
            areas.push((index, values.object_area));
        }

        let requested_end = frame_to_index(end_frame, spf, start);
        let (end, clipped_end) = if requested_end > n_samples - 1 {
            let used = n_samples - 1;
            warn!(
                "Position correction end frame {} maps to sample {} but the measurement ends at {}; clipping",
                end_frame, requested_end, used
            );
            (
                used,
                Some(ClippedEnd {
                    requested: requested_end,
                    used,
                }),
            )
        } else {
            (requested_end, None)
        };

        let floor = self.settings.floor();
        let mut factors = vec![floor; n_samples];
        let mut object_areas = vec![floor; n_samples];
        for i in start..=end {
            let offset_um = self.units.length(interpolate(&offsets, i));
            factors[i] = position_correction_factor(self.cantilever_length, offset_um)?;
            object_areas[i] = self.units.area(interpolate(&areas, i));
        }

        info!(
            "Position correction profile over samples [{}, {}] from {} annotated frames",
            start,
            end,
            annotations.len()
        );
        debug!("Outside-range floor value {}", floor);

        Ok(CorrectionProfile::new(
            factors,
            object_areas,
            start,
            end,
            floor,
            clipped_end,
        ))
    }
}

fn frame_to_index(frame: usize, samples_per_frame: usize, start: usize) -> usize {
    (frame - 1).saturating_mul(samples_per_frame).saturating_add(start)
}

/// Piecewise-linear interpolation over sorted `(index, value)` knots,
/// constant beyond the ends. Exact at knots.
fn interpolate(knots: &[(usize, f64)], index: usize) -> f64 {
    let upper = knots.partition_point(|&(k, _)| k < index);
    if upper == knots.len() {
        return knots[knots.len() - 1].1;
    }
    let (k1, v1) = knots[upper];
    if k1 == index || upper == 0 {
        return v1;
    }
    let (k0, v0) = knots[upper - 1];
    let t = (index - k0) as f64 / (k1 - k0) as f64;
    v0 + t * (v1 - v0)
}

#[cfg(test)]
mod tests {
    use super::interpolate;

    #[test]
    fn test_interpolate_between_and_beyond_knots() {
        let knots = [(2, 10.0), (6, 20.0)];
        assert_eq!(interpolate(&knots, 0), 10.0);
        assert_eq!(interpolate(&knots, 2), 10.0);
        assert_eq!(interpolate(&knots, 4), 15.0);
        assert_eq!(interpolate(&knots, 6), 20.0);
        assert_eq!(interpolate(&knots, 9), 20.0);
    }
}
