use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::Config;
use crate::error::{DesubError, Result};
use crate::media::{MediaCommandBuilder, MediaRunner};
use crate::staging::{self, ArtifactKind, StagedArtifact};

/// Manifest filename written into the staging directory for the concat
/// demuxer
pub const MANIFEST_NAME: &str = "assembly-manifest.txt";

/// Reassembles processed frames into the output video.
///
/// Frames that no longer decode are dropped from the sequence rather than
/// aborting the assembly, so one corrupt artifact costs one frame, not the
/// whole run. Encoders are tried in the configured fallback order until one
/// produces the output.
pub struct VideoAssembler<'a> {
    config: &'a Config,
    runner: &'a dyn MediaRunner,
}

impl<'a> VideoAssembler<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn MediaRunner) -> Self {
        Self { config, runner }
    }

    pub async fn assemble(&self, output: &Path) -> Result<()> {
        let frames_dir = Path::new(&self.config.pipeline.frames_dir);
        let processed = staging::list_artifacts(frames_dir, ArtifactKind::Processed)?;
        if processed.is_empty() {
            return Err(DesubError::NoProcessedFrames(
                frames_dir.display().to_string(),
            ));
        }

        let readable = probe_frames(&processed);
        if readable.is_empty() {
            return Err(DesubError::NoProcessedFrames(
                frames_dir.display().to_string(),
            ));
        }

        let manifest_path = frames_dir.join(MANIFEST_NAME);
        let manifest = build_manifest(&readable, self.config.pipeline.fps);
        std::fs::write(&manifest_path, manifest)?;

        self.encode_with_fallback(&manifest_path, output).await?;

        if !output.exists() {
            return Err(DesubError::Media(format!(
                "Encoder reported success but produced no output at {}",
                output.display()
            )));
        }

        info!(
            "Assembled {} frames into {}",
            readable.len(),
            output.display()
        );
        Ok(())
    }

    async fn encode_with_fallback(&self, manifest_path: &Path, output: &Path) -> Result<()> {
        let builder = MediaCommandBuilder::new(&self.config.media.binary_path);

        for codec in &self.config.media.codec_fallback {
            let command = builder.assemble_from_manifest(
                manifest_path,
                output,
                self.config.pipeline.fps,
                codec,
                &self.config.media.output_options,
            );

            match self.runner.run(&command).await {
                Ok(()) => {
                    info!("Encoded output with codec {}", codec);
                    return Ok(());
                }
                Err(e) => {
                    error!("Codec {} failed, trying next: {}", codec, e);
                }
            }
        }

        Err(DesubError::CodecUnavailable(
            self.config.media.codec_fallback.join(", "),
        ))
    }
}

/// Keep only artifacts that still decode as images.
///
/// Order of the input listing is preserved for the survivors.
fn probe_frames(processed: &[StagedArtifact]) -> Vec<PathBuf> {
    let mut readable = Vec::with_capacity(processed.len());
    for artifact in processed {
        match image::open(&artifact.path) {
            Ok(_) => readable.push(artifact.path.clone()),
            Err(e) => {
                error!(
                    "Skipping unreadable frame {}: {}",
                    artifact.path.display(),
                    e
                );
            }
        }
    }
    readable
}

/// Concat demuxer manifest body, one frame per entry.
///
/// Paths are reduced to bare filenames since the manifest sits in the same
/// directory as the frames. Each frame is held for one sampling interval.
fn build_manifest(frames: &[PathBuf], fps: u32) -> String {
    let frame_duration = 1.0 / fps.max(1) as f64;
    let mut manifest = String::new();
    for path in frames {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        manifest.push_str(&format!("file '{}'\n", name));
        manifest.push_str(&format!("duration {:.6}\n", frame_duration));
    }
    manifest
}
