use rgb_pixmap::PixelBuffer;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::codec::{self, EncodeOptions};
use crate::error::PipelineError;
use crate::models::{JobConfig, PipelineConfig};

/// What a pipeline run loaded and wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Loaded images as `(name, width, height)`, sorted by name
    pub loaded: Vec<(String, usize, usize)>,
    /// Files written, in job order
    pub written: Vec<PathBuf>,
}

/// Runs a [`PipelineConfig`]: load images, apply each job's steps, save
pub struct PipelineRunner {
    config: PipelineConfig,
    images: HashMap<String, PixelBuffer>,
}

impl PipelineRunner {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            images: HashMap::new(),
        }
    }

    /// Images loaded or stored so far.
    pub fn image(&self, name: &str) -> Option<&PixelBuffer> {
        self.images.get(name)
    }

    /// Load every configured image, then run the jobs in order.
    pub fn run(&mut self) -> Result<PipelineReport, PipelineError> {
        let mut report = PipelineReport {
            loaded: self.load_images()?,
            ..Default::default()
        };

        if self.config.jobs.iter().any(|job| job.output.is_some()) {
            std::fs::create_dir_all(&self.config.output_dir)?;
        }

        for job in self.config.jobs.clone() {
            if let Some(path) = self.run_job(&job)? {
                report.written.push(path);
            }
        }

        tracing::info!(
            loaded = report.loaded.len(),
            written = report.written.len(),
            "Pipeline finished"
        );
        Ok(report)
    }

    fn load_images(&mut self) -> Result<Vec<(String, usize, usize)>, PipelineError> {
        let mut names: Vec<&String> = self.config.images.keys().collect();
        names.sort();

        let mut loaded = Vec::with_capacity(names.len());
        for name in names {
            let path = self
                .config
                .image_path(name)
                .ok_or_else(|| PipelineError::UnknownImage(name.clone()))?;
            let image = codec::decode(&path, self.config.flip).map_err(|source| {
                PipelineError::Codec {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            tracing::info!(
                image = %name,
                width = image.width(),
                height = image.height(),
                "Loaded image"
            );
            loaded.push((name.clone(), image.width(), image.height()));
            self.images.insert(name.clone(), image);
        }
        Ok(loaded)
    }

    /// Run one job, returning the path written, if any.
    fn run_job(&mut self, job: &JobConfig) -> Result<Option<PathBuf>, PipelineError> {
        let source = self
            .images
            .get(&job.source)
            .ok_or_else(|| PipelineError::UnknownImage(job.source.clone()))?;

        let mut image = source.clone();
        for step in &job.steps {
            tracing::debug!(job = %job.label(), step = step.name(), "Applying step");
            image = step.apply(&image, &self.images)?;
        }

        let written = match &job.output {
            Some(output) => {
                let path = self.config.output_dir.join(output);
                let options = EncodeOptions {
                    flip: self.config.flip,
                    optimize: self.config.optimize,
                };
                codec::encode(&path, &image, options).map_err(|source| PipelineError::Codec {
                    path: path.display().to_string(),
                    source,
                })?;
                tracing::info!(
                    path = %path.display(),
                    width = image.width(),
                    height = image.height(),
                    "Saved image"
                );
                Some(path)
            }
            None => None,
        };

        if let Some(name) = &job.store_as {
            self.images.insert(name.clone(), image);
        }
        Ok(written)
    }
}
