//! Dominant palette extraction
//!
//! Given decoded RGBA pixel data, computes a small set of representative
//! colors. Sampling is bounded by the configured quality step and by the
//! resolution cap applied when decoding, so running time stays bounded for
//! very large images.

pub mod quantize;

use std::time::Duration;

use crate::config::ExtractionConfig;
use crate::error::{PaletteError, Result};
use crate::image_loader;

/// An 8-bit RGB triplet produced by quantization
pub type Rgb = [u8; 3];

/// Images with fewer sampled pixels than this are read in full
const MIN_SAMPLE_PIXELS: usize = 1024;

/// Decoded RGBA8 pixel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap row-major RGBA8 data
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidParameter`] if either dimension is zero
    /// or `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PaletteError::invalid_parameter(
                "dimensions",
                format!("{width}x{height}"),
            ));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(PaletteError::invalid_parameter(
                "data length",
                format!("{} (expected {expected})", data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer where every pixel has the same RGBA value
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let count = width as usize * height as usize;
        Self::new(width, height, rgba.repeat(count))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA8 bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate pixels as `[r, g, b, a]`
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Sampling step for a buffer: the configured quality, relaxed so small
/// images are not reduced to a handful of samples
fn sampling_step(pixel_count: usize, quality: usize) -> usize {
    let budget = (pixel_count / MIN_SAMPLE_PIXELS).max(1);
    quality.clamp(1, budget)
}

/// Extract up to `config.color_count` dominant colors from pixel data
///
/// Colors are ordered by how many sampled pixels they represent, most
/// common first. A monochrome image yields exactly one color.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidParameter`] for an invalid config and
/// [`PaletteError::ExtractionFailed`] if no pixel is opaque enough to sample.
pub fn extract_palette(pixels: &PixelBuffer, config: &ExtractionConfig) -> Result<Vec<Rgb>> {
    config.validate()?;

    let step = sampling_step(pixels.pixel_count(), config.quality);
    let samples = pixels
        .pixels()
        .step_by(step)
        .filter(|p| p[3] >= config.min_alpha)
        .map(|[r, g, b, _]| [r, g, b]);
    let hist = quantize::histogram(samples);

    if hist.total() == 0 {
        return Err(PaletteError::ExtractionFailed {
            reason: "image has no opaque pixels".into(),
        });
    }

    let palette = quantize::quantize(&hist, config.color_count);
    tracing::debug!(
        width = pixels.width(),
        height = pixels.height(),
        step,
        sampled = hist.total(),
        occupied_cells = hist.occupied(),
        colors = palette.len(),
        "quantized palette"
    );
    Ok(palette)
}

/// Decode encoded image bytes and extract their palette
///
/// # Errors
///
/// Returns [`PaletteError::ImageDecodeFailure`] for undecodable bytes, plus
/// the errors of [`extract_palette`].
pub fn extract_from_bytes(bytes: &[u8], config: &ExtractionConfig) -> Result<Vec<Rgb>> {
    config.validate()?;
    let pixels = image_loader::decode_image(bytes, config.max_dimension)?;
    extract_palette(&pixels, config)
}

/// Decode and extract on Tokio's blocking pool
///
/// Decoding completes before quantization starts; the whole chain is one
/// task. When `config.timeout_ms` is set the task is abandoned after that
/// long and an extraction failure is reported.
///
/// # Errors
///
/// Returns the errors of [`extract_from_bytes`], or
/// [`PaletteError::ExtractionFailed`] if the task panicked or timed out.
pub async fn extract_palette_async(bytes: Vec<u8>, config: ExtractionConfig) -> Result<Vec<Rgb>> {
    let timeout = config.timeout_ms.map(Duration::from_millis);
    let task = tokio::task::spawn_blocking(move || extract_from_bytes(&bytes, &config));

    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
            PaletteError::ExtractionFailed {
                reason: format!("timed out after {} ms", limit.as_millis()),
            }
        })?,
        None => task.await,
    };

    joined.map_err(|e| PaletteError::ExtractionFailed {
        reason: format!("extraction task failed: {e}"),
    })?
}
