use image::RgbImage;

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::region::TextRegion;

/// Deterministic backend returning the regions configured for it.
///
/// Exists for tests and dry runs: no external binary, no model download,
/// identical output on every frame.
pub struct MockDetector {
    regions: Vec<TextRegion>,
}

impl MockDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        let regions = config
            .mock_regions
            .iter()
            .map(|polygon| TextRegion::new(polygon.clone(), "mock", 1.0))
            .collect();
        Self { regions }
    }
}

impl super::TextRegionDetector for MockDetector {
    fn detect(&self, _frame: &RgbImage) -> Result<Vec<TextRegion>> {
        Ok(self.regions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DetectorKind};
    use crate::detect::{DetectorFactory, TextRegionDetector};

    fn config_with_regions(regions: Vec<Vec<[f32; 2]>>) -> Config {
        let mut config = Config::default();
        config.detector.kind = DetectorKind::Mock;
        config.detector.mock_regions = regions;
        config
    }

    #[test]
    fn returns_configured_regions_on_every_frame() {
        let config = config_with_regions(vec![vec![
            [10.0, 10.0],
            [50.0, 10.0],
            [50.0, 30.0],
            [10.0, 30.0],
        ]]);
        let detector = MockDetector::new(&config.detector);
        let frame = RgbImage::new(64, 64);

        let first = detector.detect(&frame).unwrap();
        let second = detector.detect(&frame).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].polygon, second[0].polygon);
        assert_eq!(first[0].confidence, 1.0);
    }

    #[test]
    fn no_configured_regions_means_no_detections() {
        let config = config_with_regions(Vec::new());
        let detector = MockDetector::new(&config.detector);
        let frame = RgbImage::new(64, 64);
        assert!(detector.detect(&frame).unwrap().is_empty());
    }

    #[test]
    fn factory_builds_the_mock_backend() {
        let config = config_with_regions(vec![vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [0.0, 4.0],
        ]]);
        let detector = DetectorFactory::create_detector(&config.detector);
        let frame = RgbImage::new(8, 8);
        assert_eq!(detector.detect(&frame).unwrap().len(), 1);
    }
}
