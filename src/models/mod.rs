pub mod config;
pub mod step;

pub use config::{JobConfig, PipelineConfig};
pub use step::{ParseStepError, Step};
