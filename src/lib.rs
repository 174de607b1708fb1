pub mod cli;
mod core;
mod processors;
mod utils;

pub use crate::cli::{Algorithm, Cli, Format};
pub use crate::core::runner::{RunSummary, Runner};
pub use crate::core::{
    Dimensions, InterpolationMethod, OutputFormat, OutputSet, RescaleError, Result, ScaleConfig,
    SourceSet, MAX_DIMENSION, MAX_PIXELS,
};
pub use crate::processors::{
    output_identifier, scale, BatchExpander, Compressor, Loader, LogProgress, ProgressSink,
    Scaler, WriteStats,
};
pub use crate::utils::{collect_input_paths, file_name_of, format_file_size, is_supported_file_name};

pub mod prelude {
    pub use crate::{
        BatchExpander, Dimensions, InterpolationMethod, OutputFormat, Runner, ScaleConfig, Scaler,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
