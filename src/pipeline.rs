use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{Config, InpaintConfig, PipelineConfig};
use crate::detect::{DetectorFactory, TextRegionDetector};
use crate::error::Result;
use crate::inpaint::inpaint;
use crate::mask::{build_mask, Mask};
use crate::staging::{self, StagedArtifact};

/// Per-frame processing chain: detect, mask, inpaint, persist.
///
/// One pipeline wraps one detector instance, so a worker constructs its
/// pipeline once and feeds it frames. A detector failure on a frame
/// degrades that frame to a pass-through copy instead of failing the run;
/// IO and decode failures are the caller's to handle.
pub struct FramePipeline {
    detector: Box<dyn TextRegionDetector>,
    inpaint: InpaintConfig,
    pipeline: PipelineConfig,
}

impl FramePipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            detector: DetectorFactory::create_detector(&config.detector),
            inpaint: config.inpaint.clone(),
            pipeline: config.pipeline.clone(),
        }
    }

    /// Process one raw frame and write its processed counterpart.
    ///
    /// Returns the path of the processed artifact.
    pub fn process(&self, raw: &StagedArtifact) -> Result<PathBuf> {
        let frame = image::open(&raw.path)?.to_rgb8();

        let regions = match self.detector.detect(&frame) {
            Ok(regions) => regions,
            Err(e) => {
                warn!(
                    "Detection failed on {}, passing frame through: {}",
                    raw.path.display(),
                    e
                );
                Vec::new()
            }
        };
        debug!(
            "Frame {}: {} text regions",
            raw.path.display(),
            regions.len()
        );

        let mask = build_mask(frame.width(), frame.height(), &regions);
        let processed = if mask.is_empty() {
            frame.clone()
        } else {
            inpaint(&frame, &mask, self.inpaint.radius)
        };

        let processed_path = staging::processed_path_for(raw);
        processed.save(&processed_path)?;

        if self.pipeline.diagnostics {
            self.write_diagnostics(raw, &processed, &mask)?;
        }

        Ok(processed_path)
    }

    fn write_diagnostics(
        &self,
        raw: &StagedArtifact,
        processed: &image::RgbImage,
        mask: &Mask,
    ) -> Result<()> {
        let diagnostics_dir = Path::new(&self.pipeline.diagnostics_dir);
        std::fs::create_dir_all(diagnostics_dir)?;
        mask.as_image()
            .save(diagnostics_dir.join(staging::diagnostic_mask_name(raw.index)))?;
        processed.save(diagnostics_dir.join(staging::processed_frame_name(raw.index)))?;
        Ok(())
    }
}
