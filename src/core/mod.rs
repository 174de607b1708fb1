// rescale/src/core/mod.rs
pub mod runner;

use image::DynamicImage;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Largest accepted edge length, in pixels.
pub const MAX_DIMENSION: u32 = 100_000;

/// Largest accepted target area (16384 x 16384).
pub const MAX_PIXELS: u64 = 268_435_456;

/// Target size of one output raster. Both edges are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RescaleError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = RescaleError;

    /// Parses a `WxH` token such as `1280x720`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            RescaleError::InvalidParameter(format!(
                "Dimension argument was not correct: ({}), expected WIDTHxHEIGHT",
                s
            ))
        };

        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;

        Self::new(width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMethod {
    Nearest,
    #[default]
    Bilinear,
}

impl FromStr for InterpolationMethod {
    type Err = RescaleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "nearest" => Ok(Self::Nearest),
            "b" | "bilinear" => Ok(Self::Bilinear),
            other => Err(RescaleError::InvalidParameter(format!(
                "Wrong scaling hint: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Jpg, OutputFormat::Gif];

    /// File extension appended to every output identifier.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Gif => "gif",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpg => image::ImageFormat::Jpeg,
            OutputFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RescaleError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == lower)
            .ok_or_else(|| RescaleError::UnsupportedFormat(format!("Wrong output image format: {}", s)))
    }
}

/// Decoded inputs keyed by their source identifier (usually the file path).
pub type SourceSet = HashMap<String, DynamicImage>;

/// Scaled rasters keyed by output file name.
pub type OutputSet = HashMap<String, DynamicImage>;

#[derive(Debug, Clone)]
pub struct ScaleConfig {
    pub dimensions: Vec<Dimensions>,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub method: InterpolationMethod,
    pub quality: u8,
    pub threads: usize,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            dimensions: Vec::new(),
            output_dir: PathBuf::from("output/"),
            format: OutputFormat::Png,
            method: InterpolationMethod::Bilinear,
            quality: 85,
            threads: 1,
        }
    }
}

impl ScaleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(RescaleError::EmptyTargets);
        }

        for dims in &self.dimensions {
            if dims.width() > MAX_DIMENSION || dims.height() > MAX_DIMENSION {
                return Err(RescaleError::InvalidParameter(format!(
                    "Dimensions too large: {} (max {} pixels)",
                    dims, MAX_DIMENSION
                )));
            }

            if u64::from(dims.width()) * u64::from(dims.height()) > MAX_PIXELS {
                return Err(RescaleError::InvalidParameter(format!(
                    "Dimensions too large: {} exceeds {} pixels in total",
                    dims, MAX_PIXELS
                )));
            }
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(RescaleError::InvalidParameter(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(RescaleError::InvalidParameter(
                "Output directory must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum RescaleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid dimensions {width}x{height}: both edges must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("At least one target dimension is required")]
    EmptyTargets,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("No input files found: {0}")]
    NoInputFiles(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),
}

pub type Result<T> = std::result::Result<T, RescaleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dimension_tokens() {
        let dims: Dimensions = "1280x720".parse().unwrap();
        assert_eq!((dims.width(), dims.height()), (1280, 720));
        assert_eq!(dims.to_string(), "1280x720");

        let upper: Dimensions = " 64X32 ".parse().unwrap();
        assert_eq!((upper.width(), upper.height()), (64, 32));

        // A leading plus sign is accepted on either edge.
        let signed: Dimensions = "+64x+32".parse().unwrap();
        assert_eq!((signed.width(), signed.height()), (64, 32));
    }

    #[test]
    fn rejects_bad_dimension_tokens() {
        for token in ["", "100", "x100", "100x", "axb", "-5x10", "10x-5", "1.5x2"] {
            assert!(token.parse::<Dimensions>().is_err(), "accepted {:?}", token);
        }

        assert!(matches!(
            "0x10".parse::<Dimensions>(),
            Err(RescaleError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn format_lookup_is_case_insensitive() {
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert_eq!("gif".parse::<OutputFormat>().unwrap().extension(), "gif");
        assert!("jpeg".parse::<OutputFormat>().is_err());
        assert!("webp".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn scaling_hint_accepts_short_and_long_names() {
        assert_eq!("n".parse::<InterpolationMethod>().unwrap(), InterpolationMethod::Nearest);
        assert_eq!("Bilinear".parse::<InterpolationMethod>().unwrap(), InterpolationMethod::Bilinear);
        assert!("bicubic".parse::<InterpolationMethod>().is_err());
        assert_eq!(InterpolationMethod::default(), InterpolationMethod::Bilinear);
    }

    #[test]
    fn config_validation() {
        let mut config = ScaleConfig::default();
        assert!(matches!(config.validate(), Err(RescaleError::EmptyTargets)));

        config.dimensions = vec![Dimensions::new(10, 10).unwrap()];
        assert!(config.validate().is_ok());

        config.quality = 0;
        assert!(config.validate().is_err());

        config.quality = 90;
        config.dimensions.push(Dimensions::new(MAX_DIMENSION + 1, 1).unwrap());
        assert!(config.validate().is_err());

        // Every edge within bounds, but the area is not.
        config.dimensions = vec![Dimensions::new(MAX_DIMENSION, MAX_DIMENSION).unwrap()];
        assert!(matches!(config.validate(), Err(RescaleError::InvalidParameter(_))));

        config.dimensions = vec![
            Dimensions::new(70_000, 1).unwrap(),
            Dimensions::new(16_384, 16_384).unwrap(),
        ];
        assert!(config.validate().is_ok());
    }
}
