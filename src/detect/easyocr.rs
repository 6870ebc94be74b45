use std::process::Command;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DetectorConfig;
use crate::error::{DesubError, Result};
use crate::region::TextRegion;

/// Wire format emitted by the easyocr bridge command, one object per
/// detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EasyOcrDetection {
    pub polygon: Vec<[f32; 2]>,
    pub text: String,
    pub confidence: f32,
}

/// Detector driving an external easyocr bridge process.
///
/// The bridge is invoked with the frame image path as its only argument
/// and prints a JSON array of detections on stdout. Unlike tesseract,
/// easyocr reports full quadrilaterals, so rotated text keeps its shape.
pub struct EasyOcrDetector {
    binary: String,
    min_confidence: f32,
}

impl EasyOcrDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            binary: config.easyocr_binary.clone(),
            min_confidence: config.min_confidence,
        }
    }
}

impl super::TextRegionDetector for EasyOcrDetector {
    fn detect(&self, frame: &RgbImage) -> Result<Vec<TextRegion>> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| DesubError::Detector(format!("Failed to create temp directory: {}", e)))?;
        let frame_path = temp_dir.path().join("frame.png");
        frame
            .save(&frame_path)
            .map_err(|e| DesubError::Detector(format!("Failed to write frame image: {}", e)))?;

        let output = Command::new(&self.binary)
            .arg(&frame_path)
            .output()
            .map_err(|e| DesubError::Detector(format!("Failed to execute easyocr bridge: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DesubError::Detector(format!(
                "EasyOcr bridge failed: {}",
                stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let regions = parse_detections(&stdout, self.min_confidence)?;
        debug!("EasyOcr reported {} regions", regions.len());
        Ok(regions)
    }
}

/// Parse the bridge's JSON detection array, dropping detections below
/// the confidence floor or with degenerate polygons.
pub fn parse_detections(json: &str, min_confidence: f32) -> Result<Vec<TextRegion>> {
    let detections: Vec<EasyOcrDetection> = serde_json::from_str(json)
        .map_err(|e| DesubError::Detector(format!("Failed to parse EasyOcr JSON: {}", e)))?;

    Ok(detections
        .into_iter()
        .filter(|d| d.confidence >= min_confidence && d.polygon.len() >= 3)
        .map(|d| TextRegion::new(d.polygon, d.text, d.confidence))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"[
        {
            "polygon": [[10.0, 400.0], [200.0, 398.0], [202.0, 440.0], [12.0, 442.0]],
            "text": "Some subtitle",
            "confidence": 0.92
        },
        {
            "polygon": [[300.0, 400.0], [360.0, 400.0], [360.0, 440.0], [300.0, 440.0]],
            "text": "noise",
            "confidence": 0.1
        },
        {
            "polygon": [[0.0, 0.0], [5.0, 0.0]],
            "text": "degenerate",
            "confidence": 0.9
        }
    ]"#;

    #[test]
    fn detections_map_to_regions() {
        let regions = parse_detections(SAMPLE_JSON, 0.3).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].text, "Some subtitle");
        assert_eq!(regions[0].polygon.len(), 4);
        // Quadrilaterals keep their exact vertices, not a bounding box.
        assert_eq!(regions[0].polygon[1], [200.0, 398.0]);
    }

    #[test]
    fn confidence_floor_applies() {
        let regions = parse_detections(SAMPLE_JSON, 0.0).unwrap();
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn empty_array_is_no_detections() {
        let regions = parse_detections("[]", 0.3).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_detections("not json", 0.3).is_err());
        assert!(parse_detections(r#"{"polygon": []}"#, 0.3).is_err());
    }
}
