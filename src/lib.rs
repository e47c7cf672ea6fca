//! # Scan Palette
//!
//! A Rust crate for collecting colors from free-form text and images and
//! exporting them as design tokens.
//!
//! This library provides:
//! - Lenient parsing of hex, rgb, hsl, hsv, oklch and named color notations
//! - Conversion of every color into hex, RGB, HSL, HSV and OKLCH strings
//! - Dominant palette extraction from images by median-cut quantization
//! - Duplicate detection, both exact and perceptual
//! - CSS custom-property and Tailwind theme exports
//!
//! ## Example
//!
//! ```rust
//! use scan_palette::{ExportKind, Session};
//!
//! let mut session = Session::new();
//! session.add_color("255, 0, 0")?;
//! session.add_color("#3366cc")?;
//!
//! let css = session.export(ExportKind::CssHex);
//! assert!(css.contains("--color-2: #3366cc;"));
//! # Ok::<(), scan_palette::PaletteError>(())
//! ```

pub mod collection;
pub mod color;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod error;
pub mod export;
pub mod extraction;
pub mod image_loader;
pub mod session;

pub use collection::{ColorCollection, ColorEntry, EntryId};
pub use color::parser::{normalize, parse};
pub use color::{ColorValue, InputKind, ParsedColor};
pub use config::{DedupPolicy, ExtractionConfig};
pub use dedup::Deduplicator;
pub use error::{PaletteError, Result};
pub use export::{export_token_config, export_variables, ColorFormats, ExportKind, VariableFormat};
pub use extraction::{extract_from_bytes, extract_palette, extract_palette_async, PixelBuffer};
pub use session::{ExtractionPhase, ImportOutcome, Notice, Session};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_formats_serialization() {
        let formats = ColorFormats::of(&ColorValue::new(0x33, 0x66, 0xcc));

        let json = serde_json::to_string(&formats).unwrap();
        let deserialized: ColorFormats = serde_json::from_str(&json).unwrap();

        assert_eq!(formats, deserialized);
        assert_eq!(deserialized.hex, "#3366cc");
    }

    #[test]
    fn test_color_value_serialization() {
        let value = ColorValue::rgba(10, 20, 30, 0.5);

        let json = serde_json::to_string(&value).unwrap();
        let deserialized: ColorValue = serde_json::from_str(&json).unwrap();

        assert_eq!(value, deserialized);
    }
}
