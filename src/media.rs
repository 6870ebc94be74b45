use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{DesubError, Result};

/// Abstract media processing command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Add video filter
    pub fn video_filter<S: Into<String>>(self, filter: S) -> Self {
        self.arg("-vf").arg(filter)
    }

    /// Limit processing to a duration window from the start
    pub fn duration(self, seconds: u32) -> Self {
        self.arg("-t").arg(seconds.to_string())
    }
}

/// Executes media commands. The subprocess implementation is the only one
/// used in production; tests substitute a recording runner to observe
/// which commands a caller issues without spawning processes.
#[async_trait]
pub trait MediaRunner: Send + Sync {
    async fn run(&self, command: &MediaCommand) -> Result<()>;
}

/// Runner spawning the configured binary as a child process
pub struct SubprocessMediaRunner;

#[async_trait]
impl MediaRunner for SubprocessMediaRunner {
    async fn run(&self, command: &MediaCommand) -> Result<()> {
        debug!(
            "Executing media processing command: {} {:?}",
            command.binary_path, command.args
        );
        debug!("Description: {}", command.description);

        let output = Command::new(&command.binary_path)
            .args(&command.args)
            .output()
            .map_err(|e| DesubError::Media(format!("Failed to execute media processor: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DesubError::Media(format!(
                "{} failed: {}",
                command.description, stderr
            )));
        }

        Ok(())
    }
}

/// Builder for the media operations the pipeline issues
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build frame extraction command sampling at a fixed rate over a
    /// duration window
    pub fn extract_frames<P: AsRef<Path>>(
        &self,
        input_path: P,
        output_pattern: P,
        fps: u32,
        duration_secs: u32,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Frame extraction")
            .input(input_path)
            .video_filter(format!("fps={}", fps))
            .duration(duration_secs)
            .overwrite()
            .output(output_pattern)
    }

    /// Build video assembly command reading a concat demuxer manifest
    pub fn assemble_from_manifest<P: AsRef<Path>>(
        &self,
        manifest_path: P,
        output_path: P,
        fps: u32,
        codec: &str,
        output_options: &[String],
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, format!("Video assembly ({})", codec))
            .arg("-f")
            .arg("concat")
            .arg("-safe")
            .arg("0")
            .input(manifest_path)
            .video_codec(codec)
            .arg("-pix_fmt")
            .arg("yuv420p")
            .arg("-r")
            .arg(fps.to_string())
            .args(output_options.iter().cloned())
            .overwrite()
            .output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check").arg("-version")
    }
}

/// Check that the configured media binary is present and runnable
pub fn check_availability(config: &MediaConfig) -> Result<()> {
    let output = Command::new(&config.binary_path)
        .arg("-version")
        .output()
        .map_err(|e| DesubError::Media(format!("Media processor not found: {}", e)))?;

    if output.status.success() {
        info!("Media processor is available");
        Ok(())
    } else {
        Err(DesubError::Media(
            "Media processor version check failed".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_command_samples_and_limits_duration() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let cmd = builder.extract_frames("input.mp4", "frames/frame-%04d.png", 30, 10);

        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(
            cmd.args,
            vec![
                "-i",
                "input.mp4",
                "-vf",
                "fps=30",
                "-t",
                "10",
                "-y",
                "frames/frame-%04d.png"
            ]
        );
    }

    #[test]
    fn assembly_command_uses_concat_manifest_and_codec() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let cmd = builder.assemble_from_manifest(
            "frames/manifest.txt",
            "out.mp4",
            24,
            "libx264",
            &["-crf".to_string(), "23".to_string()],
        );

        assert_eq!(
            cmd.args,
            vec![
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                "frames/manifest.txt",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-r",
                "24",
                "-crf",
                "23",
                "-y",
                "out.mp4"
            ]
        );
        assert!(cmd.description.contains("libx264"));
    }

    #[test]
    fn version_check_is_a_single_flag() {
        let cmd = MediaCommandBuilder::new("ffmpeg").version_check();
        assert_eq!(cmd.args, vec!["-version"]);
    }
}
