use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::IoError;
use crate::position::{AnnotationSet, Point, PositionCorrectionAnnotation};

/// One line of the annotation CSV
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
struct AnnotationRow {
    frame: usize,
    tip_offset: Option<f64>,
    centroid_x: Option<f64>,
    centroid_y: Option<f64>,
    ref1_x: Option<f64>,
    ref1_y: Option<f64>,
    ref2_x: Option<f64>,
    ref2_y: Option<f64>,
    area: Option<f64>,
}

fn point(x: Option<f64>, y: Option<f64>) -> Option<Point> {
    Some(Point::new(x?, y?))
}

impl From<AnnotationRow> for PositionCorrectionAnnotation {
    fn from(row: AnnotationRow) -> Self {
        let reference_line = match (point(row.ref1_x, row.ref1_y), point(row.ref2_x, row.ref2_y)) {
            (Some(p1), Some(p2)) => Some((p1, p2)),
            _ => None,
        };
        PositionCorrectionAnnotation {
            frame_index: row.frame,
            tip_offset: row.tip_offset,
            cell_centroid: point(row.centroid_x, row.centroid_y),
            reference_line,
            object_area: row.area,
        }
    }
}

impl From<&PositionCorrectionAnnotation> for AnnotationRow {
    fn from(a: &PositionCorrectionAnnotation) -> Self {
        AnnotationRow {
            frame: a.frame_index,
            tip_offset: a.tip_offset,
            centroid_x: a.cell_centroid.map(|p| p.x),
            centroid_y: a.cell_centroid.map(|p| p.y),
            ref1_x: a.reference_line.map(|(p, _)| p.x),
            ref1_y: a.reference_line.map(|(p, _)| p.y),
            ref2_x: a.reference_line.map(|(_, p)| p.x),
            ref2_y: a.reference_line.map(|(_, p)| p.y),
            area: a.object_area,
        }
    }
}

/// Read and validate an annotation CSV.
pub fn read_annotations(path: &Path) -> Result<AnnotationSet, IoError> {
    let file = File::open(path).map_err(|e| IoError::open(path, e))?;
    read_annotations_from(file)
}

/// Read and validate annotations from any reader.
pub fn read_annotations_from<R: Read>(reader: R) -> Result<AnnotationSet, IoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let annotations = csv_reader
        .deserialize::<AnnotationRow>()
        .map(|row| row.map(PositionCorrectionAnnotation::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AnnotationSet::new(annotations)?)
}

/// Write annotations in the CSV layout [`read_annotations`] accepts.
pub fn write_annotations(path: &Path, annotations: &[PositionCorrectionAnnotation]) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::open(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    for annotation in annotations {
        writer.serialize(AnnotationRow::from(annotation))?;
    }
    writer.flush()?;
    Ok(())
}
