pub mod pipeline;

pub use pipeline::{PipelineReport, PipelineRunner};
