use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::error::{DesubError, Result};
use crate::media::{MediaCommandBuilder, MediaRunner};
use crate::staging::{self, ArtifactKind};

/// Extracts the raw frame sequence from a source video into the staging
/// directory.
///
/// Sampling rate and duration window come from the pipeline configuration;
/// the external tool names frames with the shared staging pattern so later
/// stages can list them in temporal order.
pub struct FrameExtractor<'a> {
    config: &'a Config,
    runner: &'a dyn MediaRunner,
}

impl<'a> FrameExtractor<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn MediaRunner) -> Self {
        Self { config, runner }
    }

    /// Extract frames and return how many landed in the staging directory.
    ///
    /// An extraction that produces zero frames is fatal: nothing downstream
    /// can run, and the most likely cause is an unreadable or empty input.
    pub async fn extract(&self, input: &Path) -> Result<usize> {
        if !input.exists() {
            return Err(DesubError::FileNotFound(input.display().to_string()));
        }

        let frames_dir = Path::new(&self.config.pipeline.frames_dir);
        std::fs::create_dir_all(frames_dir)?;

        let pattern = frames_dir.join(staging::raw_frame_pattern());
        info!(
            "Extracting frames from {} at {} fps for {}s",
            input.display(),
            self.config.pipeline.fps,
            self.config.pipeline.duration_secs
        );

        let command = MediaCommandBuilder::new(&self.config.media.binary_path).extract_frames(
            input,
            &pattern,
            self.config.pipeline.fps,
            self.config.pipeline.duration_secs,
        );
        self.runner.run(&command).await?;

        let extracted = staging::list_artifacts(frames_dir, ArtifactKind::Raw)?;
        if extracted.is_empty() {
            return Err(DesubError::Media(format!(
                "Frame extraction produced no frames in {}",
                frames_dir.display()
            )));
        }

        info!("Extracted {} frames", extracted.len());
        Ok(extracted.len())
    }
}
