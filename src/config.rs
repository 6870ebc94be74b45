use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, DesubError};

fn default_inpaint_radius() -> u32 {
    3
}

fn default_min_confidence() -> f32 {
    0.3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub detector: DetectorConfig,
    pub inpaint: InpaintConfig,
    pub media: MediaConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Detection backend to use for a run
    pub kind: DetectorKind,
    /// Path to the tesseract binary
    pub tesseract_binary: String,
    /// Language pack passed to tesseract
    pub tesseract_language: String,
    /// Path to the easyocr bridge binary (prints a JSON detection array)
    pub easyocr_binary: String,
    /// Word boxes below this confidence are discarded
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// Fixed regions returned by the mock backend, one polygon per region
    #[serde(default)]
    pub mock_regions: Vec<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectorKind {
    /// Tesseract word boxes parsed from TSV output
    Tesseract,
    /// External easyocr bridge command emitting JSON detections
    EasyOcr,
    /// Deterministic backend returning configured regions
    Mock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InpaintConfig {
    /// Neighborhood sampling radius in pixels, fixed for a run
    #[serde(default = "default_inpaint_radius")]
    pub radius: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Video encoders tried in order until one opens a writer
    pub codec_fallback: Vec<String>,
    /// Additional encoding options appended to the assembly command
    /// Common options: ["-preset", "medium", "-crf", "23"]
    pub output_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Frame sampling rate for extraction and reassembly
    pub fps: u32,
    /// Duration window in seconds to process from the start of the video
    pub duration_secs: u32,
    /// Fan frame processing out across a bounded worker pool
    pub parallel: bool,
    /// Staging directory holding raw and processed frame artifacts
    pub frames_dir: String,
    /// Write inpainted frames and masks here when diagnostics are enabled
    pub diagnostics_dir: String,
    /// Emit per-frame mask and output copies for inspection
    pub diagnostics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: DetectorConfig {
                kind: DetectorKind::Tesseract,
                tesseract_binary: "tesseract".to_string(),
                tesseract_language: "eng".to_string(),
                easyocr_binary: "easyocr-bridge".to_string(),
                min_confidence: default_min_confidence(),
                mock_regions: Vec::new(),
            },
            inpaint: InpaintConfig {
                radius: default_inpaint_radius(),
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                codec_fallback: vec![
                    "libx264".to_string(),
                    "mpeg4".to_string(),
                    "libxvid".to_string(),
                    "mjpeg".to_string(),
                ],
                output_options: vec![
                    // Example encoding options users can customize:
                    // "-preset".to_string(), "medium".to_string(),  // Encoding speed
                    // "-crf".to_string(), "23".to_string(),         // Quality (0-51)
                ],
            },
            pipeline: PipelineConfig {
                fps: 30,
                duration_secs: 10,
                parallel: true,
                frames_dir: "frames".to_string(),
                diagnostics_dir: "debug_frames".to_string(),
                diagnostics: false,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DesubError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DesubError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DesubError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DesubError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
