// rescale/src/processors/batch.rs
use crate::core::{
    Dimensions, InterpolationMethod, OutputFormat, OutputSet, RescaleError, Result, SourceSet,
};
use crate::processors::Scaler;
use crate::utils::file_name_of;
use image::DynamicImage;
use rayon::prelude::*;
use std::sync::Arc;

/// Passive observer of batch progress. Never used for control flow.
pub trait ProgressSink: Send + Sync {
    /// Called once before scaling starts with the number of pairs to process.
    fn started(&self, _pair_count: usize) {}

    /// Called once per scaled (source, dimension) pair.
    fn pair_scaled(&self, _source: &str, _dims: Dimensions) {}

    /// Called once after every pair has been processed.
    fn finished(&self, input_count: usize, output_count: usize);
}

/// Default sink: a single log line at the end of the batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn finished(&self, input_count: usize, output_count: usize) {
        log::info!(
            "{} input images resulted in {} output images",
            input_count,
            output_count
        );
    }
}

/// Builds the output identifier for one source/dimension pair.
///
/// The source's own extension is kept, so `photo.png` at 300x200 as JPG becomes
/// `300_x_200_photo.png.jpg`. Existing output folders depend on this layout.
pub fn output_identifier(source: &str, dims: Dimensions, format: OutputFormat) -> String {
    format!(
        "{}_x_{}_{}.{}",
        dims.width(),
        dims.height(),
        file_name_of(source),
        format.extension()
    )
}

/// Expands every source into one scaled copy per target dimension.
pub struct BatchExpander {
    scaler: Scaler,
    format: OutputFormat,
    threads: usize,
    progress: Arc<dyn ProgressSink>,
}

impl BatchExpander {
    pub fn new(format: OutputFormat, method: InterpolationMethod) -> Self {
        Self {
            scaler: Scaler::new(method),
            format,
            threads: 1,
            progress: Arc::new(LogProgress),
        }
    }

    /// `1` keeps everything on the calling thread, `0` uses every core.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Scales every source to every target. Yields `|sources| * |targets|` entries
    /// unless two sources share a base file name, in which case the later one wins.
    pub fn scale(&self, sources: &SourceSet, targets: &[Dimensions]) -> Result<OutputSet> {
        if targets.is_empty() {
            return Err(RescaleError::EmptyTargets);
        }

        let output_count = sources.len() * targets.len();
        self.progress.started(output_count);

        let outputs = if self.threads == 1 {
            self.scale_sequential(sources, targets)?
        } else {
            self.scale_parallel(sources, targets)?
        };

        if outputs.len() < output_count {
            log::warn!(
                "{} output names collided, later images replace earlier ones",
                output_count - outputs.len()
            );
        }

        self.progress.finished(sources.len(), output_count);
        Ok(outputs)
    }

    fn scale_pair(
        &self,
        key: &str,
        image: &DynamicImage,
        dims: Dimensions,
    ) -> Result<(String, DynamicImage)> {
        let scaled = self.scaler.resize_exact(image, dims.width(), dims.height())?;
        self.progress.pair_scaled(key, dims);
        Ok((output_identifier(key, dims, self.format), scaled))
    }

    fn scale_sequential(&self, sources: &SourceSet, targets: &[Dimensions]) -> Result<OutputSet> {
        let mut outputs = OutputSet::with_capacity(sources.len() * targets.len());
        for (key, image) in sources {
            for &dims in targets {
                let (name, scaled) = self.scale_pair(key, image, dims)?;
                outputs.insert(name, scaled);
            }
        }
        Ok(outputs)
    }

    fn scale_parallel(&self, sources: &SourceSet, targets: &[Dimensions]) -> Result<OutputSet> {
        let pairs: Vec<(&String, &DynamicImage, Dimensions)> = sources
            .iter()
            .flat_map(|(key, image)| targets.iter().map(move |&dims| (key, image, dims)))
            .collect();

        let run = || -> Result<Vec<(String, DynamicImage)>> {
            pairs
                .par_iter()
                .map(|&(key, image, dims)| self.scale_pair(key, image, dims))
                .collect()
        };

        let scaled = if self.threads == 0 {
            run()?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| {
                    RescaleError::ProcessingError(format!("Failed to create thread pool: {}", e))
                })?;
            pool.install(run)?
        };

        Ok(scaled.into_iter().collect())
    }
}
