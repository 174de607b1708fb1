// rescale/src/processors/loader.rs
use crate::core::{RescaleError, Result, SourceSet, MAX_DIMENSION};
use image::{DynamicImage, ImageReader};
use std::path::Path;

#[derive(Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((MAX_DIMENSION, MAX_DIMENSION)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        if !path.is_file() {
            return Err(RescaleError::InvalidParameter(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;

        if let Some((max_w, max_h)) = self.max_dimensions {
            if image.width() > max_w || image.height() > max_h {
                return Err(RescaleError::InvalidParameter(format!(
                    "Image dimensions {}x{} exceed maximum {}x{}",
                    image.width(),
                    image.height(),
                    max_w,
                    max_h
                )));
            }
        }

        log::debug!(
            "Loaded image: {}x{} pixels, format: {:?}",
            image.width(),
            image.height(),
            image.color()
        );

        Ok(image)
    }

    /// Decodes every path it can. Unreadable files are warned about and skipped.
    pub fn load_sources<P: AsRef<Path>>(&self, paths: &[P]) -> SourceSet {
        let mut sources = SourceSet::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            match self.load(path) {
                Ok(image) => {
                    sources.insert(path.to_string_lossy().into_owned(), image);
                }
                Err(e) => {
                    log::warn!(
                        "File {} missing, corrupted or not supported, ignoring... ({})",
                        path.display(),
                        e
                    );
                }
            }
        }

        sources
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    #[test]
    fn skips_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        RgbImage::new(6, 4).save(&good).unwrap();
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"definitely not a png").unwrap();
        let missing = dir.path().join("missing.gif");

        let sources = Loader::new().load_sources(&[&good, &bad, &missing]);

        assert_eq!(sources.len(), 1);
        let image = &sources[&good.to_string_lossy().into_owned()];
        assert_eq!((image.width(), image.height()), (6, 4));
    }

    #[test]
    fn enforces_dimension_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::new(20, 2).save(&path).unwrap();

        let loader = Loader::new().with_max_dimensions(10, 10);
        assert!(loader.load(&path).is_err());
        assert!(Loader::default().load(&path).is_ok());
    }
}
