// Modular text detection architecture
//
// This module provides interchangeable detection backends behind one
// capability contract:
// - Tesseract: word boxes parsed from the tesseract binary's TSV output
// - EasyOcr: an external bridge command emitting a JSON detection array
// - Mock: deterministic regions from configuration, for tests and dry runs
//
// To add a new detection backend:
// 1. Create backend-specific structures for parsing its output
// 2. Implement TextRegionDetector for your backend
// 3. Add the backend to the DetectorKind enum
// 4. Update the factory to create your implementation

pub mod easyocr;
pub mod mock;
pub mod tesseract;

use image::RgbImage;

use crate::config::{DetectorConfig, DetectorKind};
use crate::error::Result;
use crate::region::TextRegion;

/// Capability contract every detection backend satisfies.
///
/// A backend is expensive to construct (engine warm-up) and cheap to invoke,
/// so callers construct one per run or per worker and reuse it across
/// frames. Backends are owned by a single worker at a time and are not
/// shared across threads.
pub trait TextRegionDetector: Send {
    /// Detect text regions on a single frame
    fn detect(&self, frame: &RgbImage) -> Result<Vec<TextRegion>>;
}

/// Factory for creating detector instances
pub struct DetectorFactory;

impl DetectorFactory {
    /// Create a detector based on the configured backend kind
    pub fn create_detector(config: &DetectorConfig) -> Box<dyn TextRegionDetector> {
        match config.kind {
            DetectorKind::Tesseract => Box::new(tesseract::TesseractDetector::new(config)),
            DetectorKind::EasyOcr => Box::new(easyocr::EasyOcrDetector::new(config)),
            DetectorKind::Mock => Box::new(mock::MockDetector::new(config)),
        }
    }
}
