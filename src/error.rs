use thiserror::Error;

#[derive(Error, Debug)]
pub enum DesubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Text detection error: {0}")]
    Detector(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("No processed frames found to reassemble the video in {0}")]
    NoProcessedFrames(String),

    #[error("No codec in the fallback list could open a video writer (tried: {0})")]
    CodecUnavailable(String),
}

pub type Result<T> = std::result::Result<T, DesubError>;
