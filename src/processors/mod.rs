// rescale/src/processors/mod.rs
mod batch;
mod compressor;
mod loader;
mod resizer;

pub use batch::{output_identifier, BatchExpander, LogProgress, ProgressSink};
pub use compressor::{Compressor, WriteStats};
pub use loader::Loader;
pub use resizer::{scale, Scaler};
