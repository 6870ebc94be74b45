use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: extract, inpaint, assemble
    Run {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Output video file
        #[arg(short, long)]
        output: PathBuf,

        /// Text detection backend (tesseract, easyocr, mock)
        #[arg(long, default_value = "tesseract")]
        detector: String,

        /// Frames per second to sample
        #[arg(long)]
        fps: Option<u32>,

        /// Duration in seconds to process
        #[arg(long)]
        duration: Option<u32>,

        /// Staging directory for extracted frames
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// Write per-frame masks and outputs to the diagnostics directory
        #[arg(long)]
        diagnostics: bool,

        /// Disable parallel frame processing
        #[arg(long)]
        no_parallel: bool,

        /// Stage to start processing from (extract, inpaint, assemble)
        #[arg(long, default_value = "extract")]
        start_stage: String,
    },

    /// Extract frames from a video into the staging directory
    Extract {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Staging directory for extracted frames
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// Frames per second to sample
        #[arg(long)]
        fps: Option<u32>,

        /// Duration in seconds to process
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Detect and inpaint subtitles over already-extracted frames
    Inpaint {
        /// Staging directory holding raw frames
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// Text detection backend (tesseract, easyocr, mock)
        #[arg(long, default_value = "tesseract")]
        detector: String,

        /// Write per-frame masks and outputs to the diagnostics directory
        #[arg(long)]
        diagnostics: bool,

        /// Disable parallel frame processing
        #[arg(long)]
        no_parallel: bool,
    },

    /// Assemble processed frames back into a video
    Assemble {
        /// Output video file
        #[arg(short, long)]
        output: PathBuf,

        /// Staging directory holding processed frames
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        /// Output frame rate
        #[arg(long)]
        fps: Option<u32>,
    },
}
