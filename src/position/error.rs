/// Errors raised while building a position-correction profile.
///
/// All of these are detected before any mass value is computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorrectionRangeError {
    /// Interpolated profile requested without annotations
    #[error("No position annotations to interpolate")]
    NoAnnotations,

    /// Frames are numbered from 1
    #[error("Annotation frame index must be >= 1, got 0")]
    FrameZero,

    /// The same frame was annotated twice
    #[error("Frame {0} is annotated more than once")]
    DuplicateFrame(usize),

    /// Neither a tip offset nor the geometry to derive it
    #[error("Frame {0} has no tip offset and no centroid/reference line to derive one")]
    MissingTipOffset(usize),

    /// Reference line endpoints coincide
    #[error("Frame {0} has a degenerate reference line (both endpoints are equal)")]
    DegenerateReferenceLine(usize),

    /// NaN or infinite annotation value
    #[error("Frame {frame}: {field} is not finite")]
    NonFinite {
        /// Annotated frame
        frame: usize,
        /// Offending field
        field: &'static str,
    },

    /// Negative object area
    #[error("Frame {frame}: object area {area} is negative")]
    NegativeArea {
        /// Annotated frame
        frame: usize,
        /// Area in px²
        area: f64,
    },

    /// End frame lies before the first annotation
    #[error("Position correction end frame {end_frame} is before the first annotated frame {first_frame}")]
    EndBeforeStart {
        /// Configured end frame
        end_frame: usize,
        /// First annotated frame
        first_frame: usize,
    },

    /// An annotation maps past the last sample
    #[error("Frame {frame} maps to sample {index}, but the measurement has only {n_samples} samples")]
    AnnotationOutOfRange {
        /// Annotated frame
        frame: usize,
        /// Mapped sample index
        index: usize,
        /// Available samples
        n_samples: usize,
    },

    /// First image lies past the last sample
    #[error("Image start index {image_start_index} is outside the measurement ({n_samples} samples)")]
    ImageStartOutOfRange {
        /// Configured image start index
        image_start_index: usize,
        /// Available samples
        n_samples: usize,
    },

    /// Frame-to-sample mapping needs at least one sample per frame
    #[error("samples_per_frame must be >= 1")]
    ZeroSamplesPerFrame,

    /// Non-positive or non-finite cantilever length
    #[error("Cantilever length must be positive and finite, got {0}")]
    InvalidCantileverLength(f64),

    /// Offset from the tip must lie in `[0, length)`
    #[error("Tip offset {offset} um is outside the cantilever [0, {length}) um")]
    OffsetOutsideCantilever {
        /// Offset from the free end (µm)
        offset: f64,
        /// Cantilever length (µm)
        length: f64,
    },
}
