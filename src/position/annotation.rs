use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::CorrectionRangeError;

/// Image coordinate in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometric annotation of one image frame (pixel units).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionCorrectionAnnotation {
    /// 1-based image frame number
    pub frame_index: usize,
    /// Distance of the cell from the cantilever tip
    pub tip_offset: Option<f64>,
    /// Cell centroid
    pub cell_centroid: Option<Point>,
    /// Two points on the line through the cantilever tip
    pub reference_line: Option<(Point, Point)>,
    /// Projected cell area (px²)
    pub object_area: Option<f64>,
}

impl PositionCorrectionAnnotation {
    /// Tip offset as given, or the distance from the centroid to the
    /// reference line when only the geometry was recorded.
    pub fn resolved_tip_offset(&self) -> Result<f64, CorrectionRangeError> {
        if let Some(offset) = self.tip_offset {
            return Ok(offset);
        }
        match (self.cell_centroid, self.reference_line) {
            (Some(c), Some((p1, p2))) => point_line_distance(c, p1, p2)
                .ok_or(CorrectionRangeError::DegenerateReferenceLine(self.frame_index)),
            _ => Err(CorrectionRangeError::MissingTipOffset(self.frame_index)),
        }
    }
}

/// Perpendicular distance from `c` to the line through `p1` and `p2`
fn point_line_distance(c: Point, p1: Point, p2: Point) -> Option<f64> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }
    Some((dx * (c.y - p1.y) - dy * (c.x - p1.x)).abs() / length)
}

/// Resolved per-frame values used for interpolation (pixel units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameValues {
    /// Tip offset (px)
    pub tip_offset: f64,
    /// Object area (px²); 0 when not annotated
    pub object_area: f64,
}

/// Validated annotations keyed and ordered by frame number
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    frames: BTreeMap<usize, FrameValues>,
}

impl AnnotationSet {
    /// Validate raw annotations: frames >= 1 and unique, finite values,
    /// tip offset present or derivable.
    pub fn new<I>(annotations: I) -> Result<Self, CorrectionRangeError>
    where
        I: IntoIterator<Item = PositionCorrectionAnnotation>,
    {
        let mut frames = BTreeMap::new();
        for annotation in annotations {
            let frame = annotation.frame_index;
            if frame == 0 {
                return Err(CorrectionRangeError::FrameZero);
            }
            let tip_offset = annotation.resolved_tip_offset()?;
            if !tip_offset.is_finite() {
                return Err(CorrectionRangeError::NonFinite {
                    frame,
                    field: "tip_offset",
                });
            }
            let object_area = annotation.object_area.unwrap_or(0.0);
            if !object_area.is_finite() {
                return Err(CorrectionRangeError::NonFinite {
                    frame,
                    field: "object_area",
                });
            }
            if object_area < 0.0 {
                return Err(CorrectionRangeError::NegativeArea {
                    frame,
                    area: object_area,
                });
            }
            let values = FrameValues {
                tip_offset,
                object_area,
            };
            if frames.insert(frame, values).is_some() {
                return Err(CorrectionRangeError::DuplicateFrame(frame));
            }
        }
        Ok(Self { frames })
    }

    /// Number of annotated frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame is annotated
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// First annotated frame
    pub fn first_frame(&self) -> Option<usize> {
        self.frames.keys().next().copied()
    }

    /// Last annotated frame
    pub fn last_frame(&self) -> Option<usize> {
        self.frames.keys().next_back().copied()
    }

    /// Values of one frame
    pub fn get(&self, frame: usize) -> Option<&FrameValues> {
        self.frames.get(&frame)
    }

    /// Frames in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &FrameValues)> + '_ {
        self.frames.iter().map(|(&k, v)| (k, v))
    }
}
