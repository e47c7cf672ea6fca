//! Tuning constants and reference values for parsing, extraction and export
//!
//! This module contains compile-time defaults. Runtime overrides live in
//! [`crate::config::ExtractionConfig`].

/// Palette extraction defaults
pub mod extraction {
    /// Number of colors requested from an image when the caller does not say
    pub const DEFAULT_COLOR_COUNT: usize = 8;

    /// Sampling step: every n-th pixel is considered (1 = every pixel)
    pub const DEFAULT_QUALITY: usize = 10;

    /// Longer image side above which decoded images are downscaled
    pub const DEFAULT_MAX_DIMENSION: u32 = 512;

    /// Pixels with alpha below this value are ignored
    pub const DEFAULT_MIN_ALPHA: u8 = 125;

    /// Significant bits kept per channel in the quantization histogram
    pub const SIGNIFICANT_BITS: u32 = 5;

    /// Fraction of the target count split by population before switching
    /// to population x volume
    pub const POPULATION_SPLIT_FRACTION: f64 = 0.75;
}

/// Similarity thresholds
pub mod dedup {
    /// Euclidean RGB distance below which two colors are considered the same
    pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 30.0;

    /// Largest possible Euclidean distance in 8-bit RGB space (black to white)
    pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;
}

/// Decimal places used when rendering textual notations
pub mod formatting {
    /// Alpha in rgba()/hsla()/oklch()
    pub const ALPHA_DECIMALS: i32 = 3;

    /// Hue, saturation and lightness in hsl()
    pub const HSL_DECIMALS: i32 = 1;

    /// Hue, saturation and value in the hsv tuple
    pub const HSV_DECIMALS: i32 = 1;

    /// Lightness and chroma in oklch()
    pub const OKLCH_LC_DECIMALS: i32 = 4;

    /// Hue in oklch()
    pub const OKLCH_HUE_DECIMALS: i32 = 2;

    /// Chroma below which an OkLCh color is treated as achromatic
    pub const ACHROMATIC_CHROMA: f64 = 1e-4;

    /// Chroma that `100%` maps to in oklch()
    pub const OKLCH_CHROMA_PERCENT_REFERENCE: f64 = 0.4;
}
