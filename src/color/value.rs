//! Canonical color representation
//!
//! [`ColorValue`] stores 8-bit sRGB channels plus a floating point alpha.
//! Every textual notation is derived from it on demand; the value itself is
//! never mutated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::conversion::{self, format_number, Hsl, Hsv, Oklch};
use crate::color::parser;
use crate::constants::formatting::{
    ALPHA_DECIMALS, HSL_DECIMALS, HSV_DECIMALS, OKLCH_HUE_DECIMALS, OKLCH_LC_DECIMALS,
};
use crate::error::{PaletteError, Result};

/// An 8-bit sRGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    r: u8,
    g: u8,
    b: u8,
    alpha: f32,
}

/// Clamp an alpha value into [0, 1], treating NaN as opaque
fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        1.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

impl Default for ColorValue {
    /// Opaque black
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl ColorValue {
    /// Create an opaque color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Create a color with alpha; alpha is clamped into [0, 1]
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            alpha: clamp_alpha(alpha),
        }
    }

    /// Create a color from an `[r, g, b]` triplet
    pub const fn from_rgb(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    /// Create a color from HSL components
    pub fn from_hsl(hsl: Hsl, alpha: f32) -> Self {
        let [r, g, b] = conversion::hsl_to_rgb(hsl);
        Self::rgba(r, g, b, alpha)
    }

    /// Create a color from HSV components
    pub fn from_hsv(hsv: Hsv, alpha: f32) -> Self {
        let [r, g, b] = conversion::hsv_to_rgb(hsv);
        Self::rgba(r, g, b, alpha)
    }

    /// Create a color from OkLCh components, clipping to the sRGB gamut
    pub fn from_oklch(oklch: Oklch, alpha: f32) -> Self {
        let [r, g, b] = conversion::oklch_to_rgb(oklch);
        Self::rgba(r, g, b, alpha)
    }

    /// Return a copy of this color with a different alpha
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, alpha)
    }

    pub const fn r(&self) -> u8 {
        self.r
    }

    pub const fn g(&self) -> u8 {
        self.g
    }

    pub const fn b(&self) -> u8 {
        self.b
    }

    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    /// RGB channels as an array, alpha dropped
    pub const fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// True when alpha is exactly 1
    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }

    fn alpha_string(&self) -> String {
        format_number(f64::from(self.alpha), ALPHA_DECIMALS)
    }

    pub fn to_hsl(&self) -> Hsl {
        conversion::rgb_to_hsl(self.rgb())
    }

    pub fn to_hsv(&self) -> Hsv {
        conversion::rgb_to_hsv(self.rgb())
    }

    pub fn to_oklch(&self) -> Oklch {
        conversion::rgb_to_oklch(self.rgb())
    }

    /// Lowercase hex notation: `#rrggbb`, or `#rrggbbaa` when the alpha byte
    /// is below 255
    pub fn to_hex(&self) -> String {
        let a = (self.alpha * 255.0).round() as u8;
        if a == u8::MAX {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a)
        }
    }

    /// `rgb(r, g, b)` or `rgba(r, g, b, a)`
    pub fn to_rgb_string(&self) -> String {
        if self.is_opaque() {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                self.alpha_string()
            )
        }
    }

    /// `hsl(h, s%, l%)` or `hsla(h, s%, l%, a)`
    pub fn to_hsl_string(&self) -> String {
        let hsl = self.to_hsl();
        let h = format_number(
            conversion::normalize_hue(round_to(hsl.h, HSL_DECIMALS)),
            HSL_DECIMALS,
        );
        let s = format_number(hsl.s, HSL_DECIMALS);
        let l = format_number(hsl.l, HSL_DECIMALS);
        if self.is_opaque() {
            format!("hsl({h}, {s}%, {l}%)")
        } else {
            format!("hsla({h}, {s}%, {l}%, {})", self.alpha_string())
        }
    }

    /// HSV tuple serialized as JSON: `{"h":0.0,"s":100.0,"v":100.0,"a":1.0}`
    pub fn to_hsv_string(&self) -> String {
        let hsv = self.to_hsv();
        serde_json::json!({
            "h": round_to(conversion::normalize_hue(round_to(hsv.h, HSV_DECIMALS)), HSV_DECIMALS),
            "s": round_to(hsv.s, HSV_DECIMALS),
            "v": round_to(hsv.v, HSV_DECIMALS),
            "a": round_to(f64::from(self.alpha), ALPHA_DECIMALS),
        })
        .to_string()
    }

    /// `oklch(L C H)` or `oklch(L C H / a)`
    pub fn to_oklch_string(&self) -> String {
        let lch = self.to_oklch();
        let l = format_number(lch.l, OKLCH_LC_DECIMALS);
        let c = format_number(lch.c, OKLCH_LC_DECIMALS);
        let h = format_number(
            conversion::normalize_hue(round_to(lch.h, OKLCH_HUE_DECIMALS)),
            OKLCH_HUE_DECIMALS,
        );
        if self.is_opaque() {
            format!("oklch({l} {c} {h})")
        } else {
            format!("oklch({l} {c} {h} / {})", self.alpha_string())
        }
    }

    /// Euclidean RGB distance to another color, alpha ignored
    pub fn distance(&self, other: &ColorValue) -> f64 {
        conversion::rgb_distance(self.rgb(), other.rgb())
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ColorValue {
    type Err = PaletteError;

    /// Parse a fully formed notation (hex, functional or named)
    fn from_str(s: &str) -> Result<Self> {
        parser::parse_notation(s).ok_or_else(|| PaletteError::invalid_color(s.trim()))
    }
}

impl From<[u8; 3]> for ColorValue {
    fn from(rgb: [u8; 3]) -> Self {
        Self::from_rgb(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(ColorValue::rgba(1, 2, 3, 1.5).alpha(), 1.0);
        assert_eq!(ColorValue::rgba(1, 2, 3, -0.5).alpha(), 0.0);
        assert_eq!(ColorValue::rgba(1, 2, 3, f32::NAN).alpha(), 1.0);
    }

    #[test]
    fn test_with_alpha_returns_new_value() {
        let red = ColorValue::new(255, 0, 0);
        let faded = red.with_alpha(0.5);
        assert!(red.is_opaque());
        assert!(!faded.is_opaque());
        assert_eq!(red.rgb(), faded.rgb());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(ColorValue::new(255, 0, 0).to_hex(), "#ff0000");
        assert_eq!(ColorValue::new(10, 171, 205).to_hex(), "#0aabcd");
        assert_eq!(ColorValue::rgba(255, 0, 0, 0.5).to_hex(), "#ff000080");
    }

    #[test]
    fn test_hex_alpha_follows_alpha_byte() {
        // Rounds to a full 0xff byte, so no alpha digits are written
        let nearly_opaque = ColorValue::rgba(10, 20, 30, 0.999);
        assert_eq!(nearly_opaque.to_hex(), "#0a141e");
        let back: ColorValue = nearly_opaque.to_hex().parse().unwrap();
        assert!(back.is_opaque());

        assert_eq!(ColorValue::rgba(10, 20, 30, 0.998).to_hex(), "#0a141efe");
        assert_eq!(ColorValue::rgba(10, 20, 30, 0.0).to_hex(), "#0a141e00");
    }

    #[test]
    fn test_to_rgb_string() {
        assert_eq!(ColorValue::new(255, 0, 0).to_rgb_string(), "rgb(255, 0, 0)");
        assert_eq!(
            ColorValue::rgba(10, 20, 30, 0.25).to_rgb_string(),
            "rgba(10, 20, 30, 0.25)"
        );
    }

    #[test]
    fn test_to_hsl_string() {
        assert_eq!(ColorValue::new(255, 0, 0).to_hsl_string(), "hsl(0, 100%, 50%)");
        assert_eq!(ColorValue::new(0, 0, 255).to_hsl_string(), "hsl(240, 100%, 50%)");
        assert_eq!(ColorValue::new(255, 255, 255).to_hsl_string(), "hsl(0, 0%, 100%)");
        assert_eq!(
            ColorValue::rgba(0, 255, 0, 0.5).to_hsl_string(),
            "hsla(120, 100%, 50%, 0.5)"
        );
    }

    #[test]
    fn test_to_hsv_string_is_json() {
        let json = ColorValue::new(255, 0, 0).to_hsv_string();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["h"], 0.0);
        assert_eq!(parsed["s"], 100.0);
        assert_eq!(parsed["v"], 100.0);
        assert_eq!(parsed["a"], 1.0);
    }

    #[test]
    fn test_to_oklch_string() {
        assert_eq!(ColorValue::new(255, 255, 255).to_oklch_string(), "oklch(1 0 0)");
        assert_eq!(ColorValue::new(0, 0, 0).to_oklch_string(), "oklch(0 0 0)");

        let red = ColorValue::new(255, 0, 0).to_oklch_string();
        assert!(red.starts_with("oklch(0.628 0.25"), "{red}");

        let translucent = ColorValue::rgba(0, 0, 0, 0.5).to_oklch_string();
        assert_eq!(translucent, "oklch(0 0 0 / 0.5)");
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(ColorValue::new(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_from_str() {
        let value: ColorValue = "#00ff00".parse().unwrap();
        assert_eq!(value.rgb(), [0, 255, 0]);
        assert!("not a color".parse::<ColorValue>().is_err());
    }

    #[test]
    fn test_distance_ignores_alpha() {
        let a = ColorValue::rgba(0, 0, 0, 0.1);
        let b = ColorValue::new(0, 3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
    }
}
