use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::Step;
use crate::error::PipelineError;

/// Pipeline configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PipelineConfig {
    /// Directory input images are read from
    #[serde(default = "default_dir")]
    pub input_dir: PathBuf,

    /// Directory results are written to
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,

    /// Reverse row order when loading and saving
    #[serde(default)]
    pub flip: bool,

    /// Re-compress written PNGs with oxipng
    #[serde(default)]
    pub optimize: bool,

    /// Image name to file path (relative to `input_dir`)
    #[serde(default)]
    pub images: HashMap<String, PathBuf>,

    /// Jobs, executed in order
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

/// One chain of steps applied to a named source image
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct JobConfig {
    /// Output file (relative to `output_dir`)
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Image the chain starts from
    pub source: String,

    #[serde(default)]
    pub steps: Vec<Step>,

    /// Keep the result under this name for later jobs
    #[serde(default)]
    pub store_as: Option<String>,
}

impl JobConfig {
    /// Short label for logs: the output file, else the stored name.
    pub fn label(&self) -> String {
        match (&self.output, &self.store_as) {
            (Some(output), _) => output.display().to_string(),
            (None, Some(name)) => name.clone(),
            (None, None) => self.source.clone(),
        }
    }
}

impl PipelineConfig {
    /// Parse a pipeline from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a pipeline file.
    ///
    /// Relative `input_dir` and `output_dir` are resolved against the
    /// directory containing the file.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;

        if let Some(base) = path.parent() {
            config.input_dir = base.join(&config.input_dir);
            config.output_dir = base.join(&config.output_dir);
        }

        tracing::info!(
            path = %path.display(),
            images = config.images.len(),
            jobs = config.jobs.len(),
            "Loaded pipeline"
        );
        Ok(config)
    }

    /// Reject jobs that produce nothing and `store_as` names that shadow
    /// loaded images.
    fn validate(&self) -> Result<(), PipelineError> {
        for (i, job) in self.jobs.iter().enumerate() {
            if job.output.is_none() && job.store_as.is_none() {
                return Err(PipelineError::Config(format!(
                    "job {} ({}) has neither output nor store_as",
                    i + 1,
                    job.source
                )));
            }
            if let Some(name) = &job.store_as {
                if self.images.contains_key(name) {
                    return Err(PipelineError::Config(format!(
                        "job {} stores '{name}', which is already an input image",
                        i + 1
                    )));
                }
            }
        }
        Ok(())
    }

    /// Path of a named input image.
    pub fn image_path(&self, name: &str) -> Option<PathBuf> {
        self.images.get(name).map(|file| self.input_dir.join(file))
    }
}
