use serde::{Deserialize, Serialize};

/// A detected text region on a single frame.
///
/// The polygon is an ordered sequence of points, at least three, not
/// required to be convex. Regions carry the recognized text and the
/// backend's confidence, which downstream mask construction may ignore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRegion {
    /// Polygon vertices in pixel coordinates, `[x, y]` per point
    pub polygon: Vec<[f32; 2]>,
    /// Recognized text payload
    pub text: String,
    /// Backend confidence in the range 0.0 to 1.0
    pub confidence: f32,
}

impl TextRegion {
    pub fn new(polygon: Vec<[f32; 2]>, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            polygon,
            text: text.into(),
            confidence,
        }
    }

    /// Axis-aligned rectangle helper used by backends that only report boxes
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32, text: impl Into<String>, confidence: f32) -> Self {
        Self::new(
            vec![
                [left, top],
                [left + width, top],
                [left + width, top + height],
                [left, top + height],
            ],
            text,
            confidence,
        )
    }
}
