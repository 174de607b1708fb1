// rescale/src/core/runner.rs
use super::{RescaleError, Result, ScaleConfig};
use crate::processors::{BatchExpander, Compressor, Loader, LogProgress, ProgressSink, WriteStats};
use crate::utils::collect_input_paths;
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub inputs_found: usize,
    pub inputs_decoded: usize,
    pub outputs: WriteStats,
}

/// Decodes the inputs, expands them to every target size, and writes the results.
pub struct Runner {
    config: ScaleConfig,
    loader: Loader,
    progress: Arc<dyn ProgressSink>,
}

impl Runner {
    pub fn new(config: ScaleConfig) -> Self {
        Self {
            config,
            loader: Loader::new(),
            progress: Arc::new(LogProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    /// `input` is a directory or a comma-separated list of image files.
    pub fn run(&self, input: &str) -> Result<RunSummary> {
        self.config.validate()?;

        let paths = collect_input_paths(input)?;
        log::info!("Reading {} input file(s)", paths.len());

        let sources = self.loader.load_sources(&paths);
        if sources.is_empty() {
            return Err(RescaleError::NoInputFiles(format!(
                "none of the {} input file(s) could be decoded",
                paths.len()
            )));
        }

        let expander = BatchExpander::new(self.config.format, self.config.method)
            .with_threads(self.config.threads)
            .with_progress(self.progress.clone());
        let outputs = expander.scale(&sources, &self.config.dimensions)?;
        let inputs_decoded = sources.len();
        drop(sources);

        log::info!("Writing {} image(s) to {}", outputs.len(), self.config.output_dir.display());
        let compressor = Compressor::new(self.config.format, self.config.quality);
        let written = compressor.write_all(&outputs, &self.config.output_dir)?;

        if written.failed > 0 {
            log::warn!("{} image(s) could not be written", written.failed);
        }

        Ok(RunSummary {
            inputs_found: paths.len(),
            inputs_decoded,
            outputs: written,
        })
    }
}
