// rescale/src/processors/compressor.rs
use crate::core::{OutputFormat, OutputSet, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    pub written: usize,
    pub failed: usize,
    pub bytes: u64,
}

/// Encodes scaled rasters and writes them into an output directory.
pub struct Compressor {
    format: OutputFormat,
    quality: u8,
}

impl Compressor {
    pub fn new(format: OutputFormat, quality: u8) -> Self {
        Self {
            format,
            quality: quality.clamp(1, 100),
        }
    }

    /// Writes every entry of `outputs` under `output_dir`, creating it if needed.
    /// A failed entry is logged and skipped; only directory creation is fatal.
    pub fn write_all(&self, outputs: &OutputSet, output_dir: &Path) -> Result<WriteStats> {
        std::fs::create_dir_all(output_dir)?;

        let mut names: Vec<&String> = outputs.keys().collect();
        names.sort();

        let mut stats = WriteStats::default();
        for name in names {
            let path = output_dir.join(name);
            match self.save(&outputs[name], &path) {
                Ok(size) => {
                    stats.written += 1;
                    stats.bytes += size;
                }
                Err(e) => {
                    log::error!("Cannot write {} to output folder, ignoring... ({})", name, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    /// Encodes one raster to `path`, returning the written size in bytes.
    /// Nothing is written when encoding fails.
    pub fn save(&self, image: &DynamicImage, path: &Path) -> Result<u64> {
        log::debug!(
            "Saving image to {} as {:?}, quality: {}",
            path.display(),
            self.format,
            self.quality
        );

        let bytes = self.compress_to_bytes(image)?;
        std::fs::write(path, &bytes)?;

        let size = bytes.len() as u64;
        log::info!("Saved image: {} ({} bytes)", path.display(), size);
        Ok(size)
    }

    pub fn compress_to_bytes(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let encodable = self.encodable(image);
        let mut buffer = Cursor::new(Vec::new());

        match self.format {
            OutputFormat::Jpg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
                encodable.write_with_encoder(encoder)?;
            }
            OutputFormat::Png | OutputFormat::Gif => {
                encodable.write_to(&mut buffer, self.format.image_format())?;
            }
        }

        Ok(buffer.into_inner())
    }

    /// Converts pixel data the chosen encoder cannot take as-is.
    fn encodable<'a>(&self, image: &'a DynamicImage) -> Cow<'a, DynamicImage> {
        match (self.format, image.color()) {
            (OutputFormat::Jpg, ColorType::L8 | ColorType::Rgb8) => Cow::Borrowed(image),
            (OutputFormat::Jpg, ColorType::L16 | ColorType::La8 | ColorType::La16) => {
                Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8()))
            }
            (OutputFormat::Jpg, _) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
            (OutputFormat::Gif, ColorType::Rgb8 | ColorType::Rgba8) => Cow::Borrowed(image),
            (OutputFormat::Gif, _) => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
            (OutputFormat::Png, ColorType::Rgb32F) => {
                Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16()))
            }
            (OutputFormat::Png, ColorType::Rgba32F) => {
                Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16()))
            }
            (OutputFormat::Png, _) => Cow::Borrowed(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb32FImage, RgbaImage};
    use tempfile::TempDir;

    fn outputs(names: &[&str], image: DynamicImage) -> OutputSet {
        names
            .iter()
            .map(|name| (name.to_string(), image.clone()))
            .collect()
    }

    #[test]
    fn writes_each_format() {
        let dir = TempDir::new().unwrap();
        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(5, 3));

        for format in OutputFormat::ALL {
            let name = format!("5_x_3_src.png.{}", format.extension());
            let set = outputs(&[name.as_str()], rgba.clone());
            let stats = Compressor::new(format, 85).write_all(&set, dir.path()).unwrap();

            assert_eq!((stats.written, stats.failed), (1, 0));
            let decoded = image::open(dir.path().join(&name)).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (5, 3));
        }
    }

    #[test]
    fn float_rasters_are_converted_for_png() {
        let dir = TempDir::new().unwrap();
        let float = DynamicImage::ImageRgb32F(Rgb32FImage::new(2, 2));
        let path = dir.path().join("f.png");

        let size = Compressor::new(OutputFormat::Png, 85).save(&float, &path).unwrap();
        assert!(size > 0);
        assert_eq!(image::open(&path).unwrap().color(), ColorType::Rgb16);
    }

    #[test]
    fn failed_entry_is_counted_not_fatal() {
        let dir = TempDir::new().unwrap();
        // A directory squatting on the target name makes the write fail.
        std::fs::create_dir(dir.path().join("1_x_1_blocked.png.png")).unwrap();

        let image = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        let set = outputs(&["1_x_1_blocked.png.png", "1_x_1_ok.png.png"], image);
        let stats = Compressor::new(OutputFormat::Png, 85).write_all(&set, dir.path()).unwrap();

        assert_eq!((stats.written, stats.failed), (1, 1));
        assert!(stats.bytes > 0);
    }

    #[test]
    fn encoder_rejection_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        // GIF frames cannot be wider than 65535 pixels.
        let wide = DynamicImage::ImageRgba8(RgbaImage::new(70_000, 1));
        let set = outputs(&["70000_x_1_a.png.gif"], wide);

        let stats = Compressor::new(OutputFormat::Gif, 85).write_all(&set, dir.path()).unwrap();

        assert_eq!((stats.written, stats.failed), (0, 1));
        assert!(!dir.path().join("70000_x_1_a.png.gif").exists());
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        let set = outputs(&["x.png"], DynamicImage::ImageRgba8(RgbaImage::new(1, 1)));

        Compressor::new(OutputFormat::Png, 85).write_all(&set, &nested).unwrap();
        assert!(nested.join("x.png").is_file());
    }
}
