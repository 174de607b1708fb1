use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use rescale::{format_file_size, Cli, Dimensions, ProgressSink, Runner};
use std::sync::Arc;

/// Terminal progress bar over (source, dimension) pairs.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn started(&self, pair_count: usize) {
        self.bar.set_length(pair_count as u64);
    }

    fn pair_scaled(&self, _source: &str, dims: Dimensions) {
        self.bar.set_message(dims.to_string());
        self.bar.inc(1);
    }

    fn finished(&self, input_count: usize, output_count: usize) {
        self.bar.finish_with_message(format!(
            "{} input images resulted in {} output images",
            input_count, output_count
        ));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    log::info!("rescale v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.to_config();
    let output_dir = config.output_dir.clone();
    let runner = Runner::new(config).with_progress(Arc::new(BarProgress::new()));

    let summary = runner
        .run(&cli.input)
        .with_context(|| format!("failed to resize images from {}", cli.input))?;

    println!(
        "Wrote {} image(s) ({}) from {} of {} input file(s) to: {}",
        summary.outputs.written,
        format_file_size(summary.outputs.bytes),
        summary.inputs_decoded,
        summary.inputs_found,
        output_dir.display()
    );

    if summary.outputs.failed > 0 {
        println!("{} image(s) could not be written", summary.outputs.failed);
    }

    Ok(())
}
