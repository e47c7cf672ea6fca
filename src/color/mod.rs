//! Color representation, parsing and conversion module
//!
//! This module holds the canonical [`ColorValue`], the closed-form color
//! space math it derives every notation from, and the free-form input parser.

pub mod conversion;
pub mod named;
pub mod parser;
pub mod value;

pub use conversion::{Hsl, Hsv, Oklab, Oklch};
pub use parser::{InputKind, ParsedColor};
pub use value::ColorValue;
