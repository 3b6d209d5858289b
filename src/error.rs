use rgb_pixmap::RasterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown image: {0}")]
    UnknownImage(String),

    #[error("Codec error for {path}: {source}")]
    Codec {
        path: String,
        #[source]
        source: CodecError,
    },

    #[error("Step {step} failed: {source}")]
    Raster {
        step: String,
        #[source]
        source: RasterError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for PipelineError {
    fn from(e: serde_yaml::Error) -> Self {
        PipelineError::Config(e.to_string())
    }
}
