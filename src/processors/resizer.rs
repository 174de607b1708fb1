// rescale/src/processors/resizer.rs
use crate::core::{InterpolationMethod, RescaleError, Result};
use image::{DynamicImage, ImageBuffer, Pixel};

/// Channel types we know how to blend.
trait Channel: Copy + Default {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

impl Channel for u8 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        value.round().clamp(0.0, f64::from(u8::MAX)) as u8
    }
}

impl Channel for u16 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        value.round().clamp(0.0, f64::from(u16::MAX)) as u16
    }
}

impl Channel for f32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

/// Where one destination row or column reads from in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisSample {
    lo: usize,
    hi: usize,
    frac: f64,
}

/// Maps destination pixel centres onto the source axis, clamped to valid indices.
fn axis_samples(src_len: u32, dst_len: u32, method: InterpolationMethod) -> Vec<AxisSample> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    let last = src_len as usize - 1;

    (0..dst_len)
        .map(|d| {
            let pos = ((f64::from(d) + 0.5) * scale - 0.5).clamp(0.0, last as f64);
            match method {
                InterpolationMethod::Nearest => {
                    let index = (pos.round() as usize).min(last);
                    AxisSample { lo: index, hi: index, frac: 0.0 }
                }
                InterpolationMethod::Bilinear => {
                    let floor = pos.floor();
                    let lo = (floor as usize).min(last);
                    AxisSample {
                        lo,
                        hi: (lo + 1).min(last),
                        frac: pos - floor,
                    }
                }
            }
        })
        .collect()
}

/// Zero-weight taps are never read, so non-finite neighbours cannot leak in.
fn lerp<S: Channel>(a: S, b: S, t: f64) -> f64 {
    if t == 0.0 {
        a.to_f64()
    } else {
        a.to_f64() * (1.0 - t) + b.to_f64() * t
    }
}

fn resample<P>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    width: u32,
    height: u32,
    method: InterpolationMethod,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>>
where
    P: Pixel,
    P::Subpixel: Channel,
{
    let channels = usize::from(P::CHANNEL_COUNT);
    let (src_w, src_h) = src.dimensions();
    let mut out = vec![P::Subpixel::default(); width as usize * height as usize * channels];

    if src_w == 0 || src_h == 0 {
        log::warn!(
            "Source raster is {}x{}, producing a blank {}x{} raster",
            src_w,
            src_h,
            width,
            height
        );
    } else {
        let raw = src.as_raw();
        let src_stride = src_w as usize * channels;
        let columns = axis_samples(src_w, width, method);
        let rows = axis_samples(src_h, height, method);

        for (dst_row, row) in out.chunks_exact_mut(width as usize * channels).zip(&rows) {
            let top = &raw[row.lo * src_stride..(row.lo + 1) * src_stride];
            let bottom = &raw[row.hi * src_stride..(row.hi + 1) * src_stride];

            for (dst_px, col) in dst_row.chunks_exact_mut(channels).zip(&columns) {
                let (l, r) = (col.lo * channels, col.hi * channels);
                match method {
                    InterpolationMethod::Nearest => {
                        dst_px.copy_from_slice(&top[l..l + channels]);
                    }
                    InterpolationMethod::Bilinear => {
                        for c in 0..channels {
                            let upper = lerp(top[l + c], top[r + c], col.frac);
                            let value = if row.frac == 0.0 {
                                upper
                            } else {
                                let lower = lerp(bottom[l + c], bottom[r + c], col.frac);
                                upper * (1.0 - row.frac) + lower * row.frac
                            };
                            dst_px[c] = Channel::from_f64(value);
                        }
                    }
                }
            }
        }
    }

    ImageBuffer::from_raw(width, height, out).ok_or_else(|| {
        RescaleError::ProcessingError(format!(
            "Resampled buffer does not fit {}x{}",
            width, height
        ))
    })
}

/// Stretches rasters to exact target sizes; aspect ratio is never preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scaler {
    method: InterpolationMethod,
}

impl Scaler {
    pub fn new(method: InterpolationMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    /// Returns a new `width` x `height` raster with the same pixel format as `image`.
    ///
    /// Same-size requests still run the full resample pass; the result is then
    /// pixel-identical to the input.
    pub fn resize_exact(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage> {
        if width == 0 || height == 0 {
            return Err(RescaleError::InvalidDimensions { width, height });
        }

        log::debug!(
            "Scaling image from {}x{} to {}x{} ({:?})",
            image.width(),
            image.height(),
            width,
            height,
            self.method
        );

        let method = self.method;
        macro_rules! scale_variant {
            ($($variant:ident),* $(,)?) => {
                match image {
                    $(DynamicImage::$variant(buf) => {
                        DynamicImage::$variant(resample(buf, width, height, method)?)
                    })*
                    other => {
                        return Err(RescaleError::UnsupportedPixelFormat(format!(
                            "{:?}",
                            other.color()
                        )))
                    }
                }
            };
        }

        Ok(scale_variant!(
            ImageLuma8,
            ImageLumaA8,
            ImageRgb8,
            ImageRgba8,
            ImageLuma16,
            ImageLumaA16,
            ImageRgb16,
            ImageRgba16,
            ImageRgb32F,
            ImageRgba32F,
        ))
    }
}

/// Convenience wrapper around [`Scaler::resize_exact`].
pub fn scale(
    image: &DynamicImage,
    width: u32,
    height: u32,
    method: InterpolationMethod,
) -> Result<DynamicImage> {
    Scaler::new(method).resize_exact(image, width, height)
}
