//! Image decoding into RGBA pixel buffers
//!
//! This module provides a single entry point for turning encoded image bytes
//! (an uploaded file) into a [`PixelBuffer`] the extractor can sample.
//!
//! ## Supported Formats
//!
//! Via the `image` crate: PNG, JPEG, GIF (first frame), WebP, BMP, TIFF.
//!
//! ## Design
//!
//! Images whose longer side exceeds the configured maximum are downscaled
//! with nearest-neighbour sampling before conversion, so every remaining
//! pixel is a pixel of the original image.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::error::{PaletteError, Result};
use crate::extraction::PixelBuffer;

/// Decode encoded image bytes, capping the longer side at `max_dimension`
///
/// # Errors
///
/// Returns [`PaletteError::ImageDecodeFailure`] if the format is unknown or
/// decoding fails.
pub fn decode_image(bytes: &[u8], max_dimension: u32) -> Result<PixelBuffer> {
    if bytes.is_empty() {
        return Err(PaletteError::ImageDecodeFailure {
            message: "no image data".into(),
            source: None,
        });
    }

    let format = image::guess_format(bytes)
        .map_err(|e| PaletteError::image_decode("Unrecognized image format", e))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PaletteError::image_decode(format!("Failed to decode {format:?} image"), e))?;

    let (width, height) = img.dimensions();
    let img = cap_resolution(img, max_dimension);
    tracing::debug!(
        ?format,
        width,
        height,
        scaled_width = img.width(),
        scaled_height = img.height(),
        "decoded image"
    );
    to_pixel_buffer(&img)
}

fn cap_resolution(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width.max(height) <= max_dimension {
        return img;
    }
    // resize keeps the aspect ratio within the bounds
    img.resize(max_dimension, max_dimension, FilterType::Nearest)
}

fn to_pixel_buffer(img: &DynamicImage) -> Result<PixelBuffer> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width, height, rgba.into_raw())
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

/// Check a path's extension against [`supported_extensions`]
///
/// # Errors
///
/// Returns [`PaletteError::InvalidParameter`] naming the path when it has no
/// extension or an unsupported one.
pub fn check_extension(path: &Path) -> Result<()> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_supported_extension);
    if supported {
        Ok(())
    } else {
        Err(PaletteError::invalid_parameter("image path", path.display()))
    }
}
