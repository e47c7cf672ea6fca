//! Rendering of colors into display tables and export artifacts
//!
//! All functions are pure and deterministic: the same colors and format
//! always produce byte-identical output.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::ColorValue;
use crate::error::PaletteError;

/// Every notation of one color, for a per-color format table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorFormats {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub hsv: String,
    pub oklch: String,
}

impl ColorFormats {
    pub fn of(value: &ColorValue) -> Self {
        Self {
            hex: value.to_hex(),
            rgb: value.to_rgb_string(),
            hsl: value.to_hsl_string(),
            hsv: value.to_hsv_string(),
            oklch: value.to_oklch_string(),
        }
    }
}

/// Value format used in a CSS custom-property block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableFormat {
    Hex,
    Rgb,
    Hsl,
    Oklch,
}

impl VariableFormat {
    fn render(self, value: &ColorValue) -> String {
        match self {
            VariableFormat::Hex => value.to_hex(),
            VariableFormat::Rgb => value.to_rgb_string(),
            VariableFormat::Hsl => value.to_hsl_string(),
            VariableFormat::Oklch => value.to_oklch_string(),
        }
    }
}

/// Export artifacts offered for clipboard copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportKind {
    #[serde(rename = "css-hex")]
    CssHex,
    #[serde(rename = "css-rgb")]
    CssRgb,
    #[serde(rename = "css-hsl")]
    CssHsl,
    #[serde(rename = "css-oklch")]
    CssOklch,
    #[serde(rename = "tailwind")]
    Tailwind,
}

impl ExportKind {
    pub const ALL: [ExportKind; 5] = [
        ExportKind::CssHex,
        ExportKind::CssRgb,
        ExportKind::CssHsl,
        ExportKind::CssOklch,
        ExportKind::Tailwind,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ExportKind::CssHex => "css-hex",
            ExportKind::CssRgb => "css-rgb",
            ExportKind::CssHsl => "css-hsl",
            ExportKind::CssOklch => "css-oklch",
            ExportKind::Tailwind => "tailwind",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExportKind {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExportKind::ALL
            .into_iter()
            .find(|kind| kind.key() == wanted)
            .ok_or_else(|| PaletteError::invalid_parameter("export kind", s))
    }
}

/// CSS custom-property block, one `--color-N` per color in order
///
/// Returns an empty string when there are no colors.
pub fn export_variables<'a, I>(colors: I, format: VariableFormat) -> String
where
    I: IntoIterator<Item = &'a ColorValue>,
{
    let mut body = String::new();
    for (index, color) in colors.into_iter().enumerate() {
        // Writing into a String cannot fail
        let _ = writeln!(body, "  --color-{}: {};", index + 1, format.render(color));
    }
    if body.is_empty() {
        return body;
    }
    format!(":root {{\n{body}}}")
}

/// Tailwind-style theme config with one `colorN` hex token per color
///
/// Returns an empty string when there are no colors.
pub fn export_token_config<'a, I>(colors: I) -> String
where
    I: IntoIterator<Item = &'a ColorValue>,
{
    let mut tokens = String::new();
    for (index, color) in colors.into_iter().enumerate() {
        let _ = writeln!(tokens, "        color{}: \"{}\",", index + 1, color.to_hex());
    }
    if tokens.is_empty() {
        return tokens;
    }

    let mut config = String::from("module.exports = {\n");
    config.push_str("  theme: {\n");
    config.push_str("    extend: {\n");
    config.push_str("      colors: {\n");
    config.push_str(&tokens);
    config.push_str("      },\n");
    config.push_str("    },\n");
    config.push_str("  },\n");
    config.push('}');
    config
}

/// Render the export artifact for a kind
pub fn export<'a, I>(kind: ExportKind, colors: I) -> String
where
    I: IntoIterator<Item = &'a ColorValue>,
{
    match kind {
        ExportKind::CssHex => export_variables(colors, VariableFormat::Hex),
        ExportKind::CssRgb => export_variables(colors, VariableFormat::Rgb),
        ExportKind::CssHsl => export_variables(colors, VariableFormat::Hsl),
        ExportKind::CssOklch => export_variables(colors, VariableFormat::Oklch),
        ExportKind::Tailwind => export_token_config(colors),
    }
}
