// rescale/src/cli.rs
use crate::core::{Dimensions, InterpolationMethod, OutputFormat, ScaleConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rescale",
    version,
    about = "Resize a batch of images to one or more sizes",
    override_usage = "rescale [OPTIONS] --dimensions <WxH,...> <INPUT>"
)]
pub struct Cli {
    /// Folder with images, or a comma-separated list of image files
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Comma-separated list of target dimensions in pixels (e.g. 1280x720,1920x1080)
    #[arg(short, long, required = true, value_delimiter = ',', value_name = "WxH")]
    pub dimensions: Vec<Dimensions>,

    /// Image output folder
    #[arg(short, long, default_value = "output/")]
    pub output: PathBuf,

    /// Image output format
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = Format::Png)]
    pub format: Format,

    /// Scaling hint
    #[arg(short = 's', long = "scalinghint", value_enum, default_value_t = Algorithm::Bilinear)]
    pub scaling_hint: Algorithm,

    /// JPEG quality (1-100), ignored for png and gif
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Worker threads: 1 runs sequentially, 0 uses every core
    #[arg(short = 'j', long, default_value_t = 1)]
    pub threads: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Png,
    Jpg,
    Gif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    #[value(alias = "n")]
    Nearest,
    #[value(alias = "b")]
    Bilinear,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => OutputFormat::Png,
            Format::Jpg => OutputFormat::Jpg,
            Format::Gif => OutputFormat::Gif,
        }
    }
}

impl From<Algorithm> for InterpolationMethod {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => InterpolationMethod::Nearest,
            Algorithm::Bilinear => InterpolationMethod::Bilinear,
        }
    }
}

impl Cli {
    pub fn to_config(&self) -> ScaleConfig {
        ScaleConfig {
            dimensions: self.dimensions.clone(),
            output_dir: self.output.clone(),
            format: self.format.into(),
            method: self.scaling_hint.into(),
            quality: self.quality,
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rescale").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&["-d", "64x32", "in/"]).unwrap();
        let config = cli.to_config();

        assert_eq!(config.dimensions, vec![Dimensions::new(64, 32).unwrap()]);
        assert_eq!(config.output_dir, PathBuf::from("output/"));
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.method, InterpolationMethod::Bilinear);
        assert_eq!((config.quality, config.threads), (85, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn multiple_dimensions_and_options() {
        let cli = parse(&[
            "--dimensions", "1280x720,1920x1080", "-d", "10x10",
            "-f", "JPG", "-s", "n", "-o", "out", "a.png,b.png",
        ])
        .unwrap();
        let config = cli.to_config();

        assert_eq!(config.dimensions.len(), 3);
        assert_eq!(config.dimensions[1].to_string(), "1920x1080");
        assert_eq!(config.format, OutputFormat::Jpg);
        assert_eq!(config.method, InterpolationMethod::Nearest);
        assert_eq!(cli.input, "a.png,b.png");
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(parse(&["in/"]).is_err());
        assert!(parse(&["-d", "64x0", "in/"]).is_err());
        assert!(parse(&["-d", "64by32", "in/"]).is_err());
        assert!(parse(&["-d", "64x32", "-f", "bmp", "in/"]).is_err());
        assert!(parse(&["-d", "64x32", "-s", "bicubic", "in/"]).is_err());
        assert!(parse(&["-d", "64x32", "-q", "0", "in/"]).is_err());
        assert!(parse(&["-d", "64x32"]).is_err());
    }
}
