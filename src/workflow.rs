use std::path::Path;
use tracing::info;

use crate::assemble::VideoAssembler;
use crate::config::Config;
use crate::error::Result;
use crate::extract::FrameExtractor;
use crate::media::{self, MediaRunner, SubprocessMediaRunner};
use crate::pool::FrameWorkerPool;

/// Pipeline stages in execution order.
///
/// The ordering is what makes resuming work: starting at a later stage
/// skips every stage that sorts before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Extract,
    Inpaint,
    Assemble,
}

/// Orchestrates the extract, inpaint, assemble sequence over one staging
/// directory.
///
/// Resuming from a later stage trusts whatever artifacts are already
/// staged; a stale or missing prerequisite surfaces as that stage's own
/// failure rather than an upfront check.
pub struct Workflow {
    config: Config,
    runner: Box<dyn MediaRunner>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        // Check dependencies
        media::check_availability(&config.media)?;

        Ok(Self {
            config,
            runner: Box::new(SubprocessMediaRunner),
        })
    }

    /// Construct with a caller-supplied runner, skipping the binary
    /// availability check
    pub fn with_runner(config: Config, runner: Box<dyn MediaRunner>) -> Self {
        Self { config, runner }
    }

    /// Run the full pipeline from the given stage onward
    pub async fn run(&self, input: &Path, output: &Path, start: Stage) -> Result<()> {
        if start > Stage::Extract {
            info!("Resuming from stage {:?}, reusing staged artifacts", start);
        }

        if start <= Stage::Extract {
            self.extract_frames(input).await?;
        }
        if start <= Stage::Inpaint {
            self.process_frames().await?;
        }
        self.assemble_video(output).await?;

        info!("Pipeline finished, output at {}", output.display());
        Ok(())
    }

    /// Extract the raw frame sequence into the staging directory
    pub async fn extract_frames(&self, input: &Path) -> Result<usize> {
        FrameExtractor::new(&self.config, self.runner.as_ref())
            .extract(input)
            .await
    }

    /// Detect and inpaint text on every staged raw frame, returning
    /// processed and skipped counts
    pub async fn process_frames(&self) -> Result<(usize, usize)> {
        FrameWorkerPool::new(self.config.clone()).process_all().await
    }

    /// Reassemble processed frames into the output video
    pub async fn assemble_video(&self, output: &Path) -> Result<()> {
        VideoAssembler::new(&self.config, self.runner.as_ref())
            .assemble(output)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorKind;
    use crate::media::MediaCommand;
    use crate::staging::{self, ArtifactKind};
    use async_trait::async_trait;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;

    const BACKGROUND: [u8; 3] = [25, 90, 25];

    /// Stands in for the external media tool: extraction writes synthetic
    /// frames with a burned-in block, assembly writes the output file.
    struct FakeRunner {
        commands: Mutex<Vec<MediaCommand>>,
        frames: u32,
    }

    impl FakeRunner {
        fn new(frames: u32) -> Self {
            Self {
                commands: Mutex::new(Vec::new()),
                frames,
            }
        }

        fn descriptions(&self) -> Vec<String> {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.description.clone())
                .collect()
        }
    }

    #[async_trait]
    impl MediaRunner for FakeRunner {
        async fn run(&self, command: &MediaCommand) -> Result<()> {
            if command.description == "Frame extraction" {
                let pattern = command.args.last().cloned().unwrap_or_default();
                let dir = PathBuf::from(&pattern)
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default();
                for index in 1..=self.frames {
                    let mut frame = RgbImage::from_pixel(32, 32, Rgb(BACKGROUND));
                    for y in 20..28 {
                        for x in 4..28 {
                            frame.put_pixel(x, y, Rgb([255, 255, 255]));
                        }
                    }
                    frame.save(dir.join(staging::raw_frame_name(index)))?;
                }
            } else {
                let output = command.args.last().cloned().unwrap_or_default();
                fs::write(output, b"encoded")?;
            }
            self.commands.lock().unwrap().push(command.clone());
            Ok(())
        }
    }

    fn pipeline_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.detector.kind = DetectorKind::Mock;
        config.detector.mock_regions = vec![vec![
            [4.0, 20.0],
            [27.0, 20.0],
            [27.0, 27.0],
            [4.0, 27.0],
        ]];
        config.pipeline.frames_dir = dir.join("frames").display().to_string();
        config
    }

    #[tokio::test]
    async fn resuming_at_assemble_skips_earlier_stages() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clean.mp4");
        let config = pipeline_config(dir.path());
        let frames_dir = PathBuf::from(&config.pipeline.frames_dir);
        fs::create_dir_all(&frames_dir).unwrap();
        for index in 1..=2 {
            let frame = RgbImage::from_pixel(8, 8, Rgb(BACKGROUND));
            frame
                .save(frames_dir.join(staging::processed_frame_name(index)))
                .unwrap();
        }

        let runner = FakeRunner::new(0);
        let workflow = Workflow::with_runner(config, Box::new(runner));
        let unused_input = dir.path().join("missing.mp4");
        workflow
            .run(&unused_input, &output, Stage::Assemble)
            .await
            .unwrap();

        assert!(output.exists());
        // No raw frames were ever staged.
        assert!(staging::list_artifacts(&frames_dir, ArtifactKind::Raw)
            .unwrap()
            .is_empty());
    }

    struct SharedRunner(std::sync::Arc<FakeRunner>);

    #[async_trait]
    impl MediaRunner for SharedRunner {
        async fn run(&self, command: &MediaCommand) -> Result<()> {
            self.0.run(command).await
        }
    }

    #[tokio::test]
    async fn stages_run_in_order_on_a_full_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.mp4");
        fs::write(&input, b"video").unwrap();
        let output = dir.path().join("clean.mp4");
        let config = pipeline_config(dir.path());

        let runner = std::sync::Arc::new(FakeRunner::new(2));
        let workflow = Workflow::with_runner(config, Box::new(SharedRunner(runner.clone())));
        workflow.run(&input, &output, Stage::Extract).await.unwrap();

        let descriptions = runner.descriptions();
        assert_eq!(descriptions.len(), 2);
        assert_eq!(descriptions[0], "Frame extraction");
        assert!(descriptions[1].starts_with("Video assembly"));
    }

    #[test]
    fn stages_order_matches_execution_order() {
        assert!(Stage::Extract < Stage::Inpaint);
        assert!(Stage::Inpaint < Stage::Assemble);
    }
}
