use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

use crate::error::{Error, Result};
use crate::types::RasterImage;

/// Resample `src` to `width` x `height` with a separable Lanczos3 filter.
///
/// Works for both up- and downscaling and always returns a new buffer.
pub fn resize(src: &RasterImage, width: u32, height: u32) -> Result<RasterImage> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidParameter(format!(
            "resize target must be non-empty, got {}x{}",
            width, height
        )));
    }

    let view: ImageBuffer<Rgba<u8>, &[u8]> =
        ImageBuffer::from_raw(src.width(), src.height(), src.pixels()).ok_or(
            Error::InvalidImageBuffer {
                width: src.width(),
                height: src.height(),
                expected: src.width() as usize * src.height() as usize * 4,
                len: src.pixels().len(),
            },
        )?;

    let resized = imageops::resize(&view, width, height, FilterType::Lanczos3);
    RasterImage::try_from(resized)
}

/// Scale proportionally so the longest side becomes `max_side`.
///
/// The shorter side is truncated like a canvas size would be, never below one pixel.
pub fn scale_to_fit(src: &RasterImage, max_side: u32) -> Result<RasterImage> {
    if max_side == 0 {
        return Err(Error::InvalidParameter(
            "max_side must be greater than zero".to_string(),
        ));
    }

    let (w, h) = (src.width(), src.height());
    let shorter = |short: u32, long: u32| {
        // Fits in u32: short <= long, so the quotient is at most max_side
        ((u64::from(short) * u64::from(max_side) / u64::from(long)) as u32).max(1)
    };
    let (width, height) = if w >= h {
        (max_side, shorter(h, w))
    } else {
        (shorter(w, h), max_side)
    };

    resize(src, width, height)
}
