//! Desub - Burned-In Subtitle Removal Pipeline
//!
//! This is the main entry point for the desub application, which removes
//! burned-in subtitles from video files by detecting on-screen text per
//! frame and reconstructing the occluded pixels, using ffmpeg and an
//! interchangeable OCR backend.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use desub::cli::{Args, Commands};
use desub::config::{Config, DetectorKind};
use desub::error::DesubError;
use desub::workflow::{Stage, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    info!("Starting desub - burned-in subtitle removal");

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Execute command
    match args.command {
        Commands::Run {
            input,
            output,
            detector,
            fps,
            duration,
            frames_dir,
            diagnostics,
            no_parallel,
            start_stage,
        } => {
            info!("Processing video file: {}", input.display());

            config.detector.kind = parse_detector_kind(&detector)?;
            apply_pipeline_overrides(
                &mut config,
                fps,
                duration,
                frames_dir,
                diagnostics,
                no_parallel,
            );
            let start = parse_start_stage(&start_stage)?;

            let workflow = Workflow::new(config)?;
            workflow.run(&input, &output, start).await?;
        }
        Commands::Extract {
            input,
            frames_dir,
            fps,
            duration,
        } => {
            info!("Extracting frames from: {}", input.display());

            apply_pipeline_overrides(&mut config, fps, duration, frames_dir, false, false);

            let workflow = Workflow::new(config)?;
            workflow.extract_frames(&input).await?;
        }
        Commands::Inpaint {
            frames_dir,
            detector,
            diagnostics,
            no_parallel,
        } => {
            config.detector.kind = parse_detector_kind(&detector)?;
            apply_pipeline_overrides(&mut config, None, None, frames_dir, diagnostics, no_parallel);

            info!("Inpainting frames in: {}", config.pipeline.frames_dir);

            let workflow = Workflow::new(config)?;
            workflow.process_frames().await?;
        }
        Commands::Assemble {
            output,
            frames_dir,
            fps,
        } => {
            info!("Assembling video: {}", output.display());

            apply_pipeline_overrides(&mut config, fps, None, frames_dir, false, false);

            let workflow = Workflow::new(config)?;
            workflow.assemble_video(&output).await?;
        }
    }

    info!("desub workflow completed successfully");
    Ok(())
}

/// Fold per-run CLI flags into the loaded configuration
fn apply_pipeline_overrides(
    config: &mut Config,
    fps: Option<u32>,
    duration: Option<u32>,
    frames_dir: Option<std::path::PathBuf>,
    diagnostics: bool,
    no_parallel: bool,
) {
    if let Some(fps) = fps {
        config.pipeline.fps = fps;
    }
    if let Some(duration) = duration {
        config.pipeline.duration_secs = duration;
    }
    if let Some(dir) = frames_dir {
        config.pipeline.frames_dir = dir.display().to_string();
    }
    if diagnostics {
        config.pipeline.diagnostics = true;
    }
    if no_parallel {
        config.pipeline.parallel = false;
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let desub_dir = std::env::current_dir()?.join(".desub");
    let log_dir = desub_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "desub.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber.try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("desub.log").display());

    Ok(())
}

/// Parse detector backend choice from string
fn parse_detector_kind(kind: &str) -> Result<DetectorKind> {
    match kind.to_lowercase().as_str() {
        "tesseract" => Ok(DetectorKind::Tesseract),
        "easyocr" => Ok(DetectorKind::EasyOcr),
        "mock" => Ok(DetectorKind::Mock),
        _ => Err(DesubError::Config(format!(
            "Invalid detector '{}'. Valid detectors: tesseract, easyocr, mock",
            kind
        )).into()),
    }
}

/// Parse starting stage from string
fn parse_start_stage(stage: &str) -> Result<Stage> {
    match stage.to_lowercase().as_str() {
        "extract" => Ok(Stage::Extract),
        "inpaint" => Ok(Stage::Inpaint),
        "assemble" => Ok(Stage::Assemble),
        _ => Err(DesubError::Config(format!(
            "Invalid start stage '{}'. Valid stages: extract, inpaint, assemble",
            stage
        )).into()),
    }
}
