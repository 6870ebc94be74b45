use std::process::Command;

use image::RgbImage;
use tracing::debug;

use crate::config::DetectorConfig;
use crate::error::{DesubError, Result};
use crate::region::TextRegion;

/// TSV column layout emitted by `tesseract ... tsv`
const TSV_COLUMNS: usize = 12;
/// Level value of word rows in the TSV hierarchy
const WORD_LEVEL: &str = "5";

/// Detector shelling out to the tesseract binary.
///
/// Each frame is written to a temporary PNG, handed to tesseract in TSV
/// mode, and the word boxes are read back from stdout. Tesseract reports
/// axis-aligned boxes only, so every region is a rectangle.
pub struct TesseractDetector {
    binary: String,
    language: String,
    min_confidence: f32,
}

impl TesseractDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            binary: config.tesseract_binary.clone(),
            language: config.tesseract_language.clone(),
            min_confidence: config.min_confidence,
        }
    }
}

impl super::TextRegionDetector for TesseractDetector {
    fn detect(&self, frame: &RgbImage) -> Result<Vec<TextRegion>> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| DesubError::Detector(format!("Failed to create temp directory: {}", e)))?;
        let frame_path = temp_dir.path().join("frame.png");
        frame
            .save(&frame_path)
            .map_err(|e| DesubError::Detector(format!("Failed to write frame image: {}", e)))?;

        let output = Command::new(&self.binary)
            .arg(&frame_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg("6")
            .arg("tsv")
            .output()
            .map_err(|e| DesubError::Detector(format!("Failed to execute tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DesubError::Detector(format!(
                "Tesseract failed: {}",
                stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let regions = parse_tsv(&stdout, self.min_confidence);
        debug!("Tesseract reported {} word boxes", regions.len());
        Ok(regions)
    }
}

/// Parse tesseract TSV output into word-level text regions.
///
/// Word rows carry level 5; header and structural rows (page, block,
/// paragraph, line) are skipped, as are words below the confidence floor
/// and words with a blank payload. Tesseract confidence is 0 to 100 and
/// is normalized to 0.0 to 1.0 here.
pub fn parse_tsv(tsv: &str, min_confidence: f32) -> Vec<TextRegion> {
    let mut regions = Vec::new();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_COLUMNS {
            continue;
        }
        if fields[0] != WORD_LEVEL {
            continue;
        }

        let (Ok(left), Ok(top), Ok(width), Ok(height), Ok(conf)) = (
            fields[6].parse::<f32>(),
            fields[7].parse::<f32>(),
            fields[8].parse::<f32>(),
            fields[9].parse::<f32>(),
            fields[10].parse::<f32>(),
        ) else {
            continue;
        };

        let confidence = conf / 100.0;
        if confidence < min_confidence {
            continue;
        }

        let text = fields[11..].join("\t");
        if text.trim().is_empty() {
            continue;
        }

        regions.push(TextRegion::from_rect(
            left, top, width, height, text, confidence,
        ));
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t\n\
2\t1\t1\t0\t0\t0\t48\t410\t544\t40\t-1\t\n\
3\t1\t1\t1\t0\t0\t48\t410\t544\t40\t-1\t\n\
4\t1\t1\t1\t1\t0\t48\t410\t544\t40\t-1\t\n\
5\t1\t1\t1\t1\t1\t48\t412\t120\t36\t95.1\tHello\n\
5\t1\t1\t1\t1\t2\t180\t412\t140\t36\t88.4\tworld\n\
5\t1\t1\t1\t1\t3\t332\t412\t60\t36\t12.0\t~,\n\
5\t1\t1\t1\t1\t4\t400\t412\t60\t36\t91.0\t \n";

    #[test]
    fn word_rows_become_rectangles() {
        let regions = parse_tsv(SAMPLE_TSV, 0.3);
        assert_eq!(regions.len(), 2);

        assert_eq!(regions[0].text, "Hello");
        assert_eq!(regions[0].polygon[0], [48.0, 412.0]);
        assert_eq!(regions[0].polygon[2], [168.0, 448.0]);
        assert!((regions[0].confidence - 0.951).abs() < 1e-4);

        assert_eq!(regions[1].text, "world");
    }

    #[test]
    fn low_confidence_words_are_discarded() {
        let regions = parse_tsv(SAMPLE_TSV, 0.3);
        assert!(regions.iter().all(|r| r.confidence >= 0.3));

        let none = parse_tsv(SAMPLE_TSV, 0.99);
        assert!(none.is_empty());
    }

    #[test]
    fn structural_rows_and_blank_words_are_skipped() {
        // Level 1-4 rows carry conf -1 and no text; the last word row in
        // the sample is whitespace only.
        let regions = parse_tsv(SAMPLE_TSV, 0.0);
        assert!(regions.iter().all(|r| !r.text.trim().is_empty()));
        assert_eq!(regions.len(), 3);
    }

    #[test]
    fn malformed_rows_are_ignored() {
        let tsv = "header\n5\t1\t1\n5\t1\t1\t1\t1\t1\tx\ty\tw\th\tc\ttext\n";
        assert!(parse_tsv(tsv, 0.0).is_empty());
    }

    #[test]
    fn empty_output_yields_no_regions() {
        assert!(parse_tsv("", 0.3).is_empty());
        let header_only =
            "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n";
        assert!(parse_tsv(header_only, 0.3).is_empty());
    }
}
