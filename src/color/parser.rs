//! Free-form color input parsing
//!
//! Parsing happens in two steps:
//! 1. [`normalize`] decides which notation a trimmed string denotes and
//!    wraps bare triplets into functional syntax (first matching rule wins):
//!    - three unsigned reals, at least one fractional, no units → `oklch(L C H)`
//!    - `H S L` with angle / percent units, at least one unit → `hsl(H S L)`
//!    - three unsigned integers split by commas or whitespace → `rgb(r g b)`
//!    - 3, 4, 6 or 8 hex digits, `#` optional → `#digits`
//!    - anything else is passed through unchanged
//! 2. Canonical construction turns the normalized notation into a
//!    [`ColorValue`], or rejects it.
//!
//! Normalization is idempotent: already wrapped notations never match the
//! bare-triplet rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::color::conversion::{unit_to_channel, Hsl, Hsv, Oklch};
use crate::color::named;
use crate::color::ColorValue;
use crate::constants::formatting::OKLCH_CHROMA_PERCENT_REFERENCE;
use crate::error::{PaletteError, Result};

static RAW_OKLCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([0-9]*\.?[0-9]+)",
        r"\s+([0-9]*\.?[0-9]+)",
        r"\s+([0-9]*\.?[0-9]+)$",
    ))
    .expect("valid oklch pattern")
});

static RAW_HSL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[0-9]+(?:\.[0-9]+)?(deg|turn|rad|grad)?",
        r"\s+[0-9]+(?:\.[0-9]+)?(%)?",
        r"\s+[0-9]+(?:\.[0-9]+)?(%)?$",
    ))
    .expect("valid hsl pattern")
});

static RAW_RGB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\s*[,\s]\s*[0-9]+\s*[,\s]\s*[0-9]+$").expect("valid rgb pattern")
});

static RAW_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9a-fA-F]{3,8})$").expect("valid hex pattern"));

/// Which notation a piece of free-form input was recognized as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputKind {
    RawOklch,
    RawHsl,
    RawRgb,
    Hex,
    /// Assumed to be a complete notation already, or invalid
    Passthrough,
}

/// Outcome of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedColor {
    /// Input as given, trimmed
    pub original: String,
    /// Disambiguated, function-wrapped form; this is what collections store
    pub normalized: String,
    pub kind: InputKind,
    pub value: ColorValue,
}

/// Classify trimmed input by the disambiguation rules
pub fn classify(input: &str) -> InputKind {
    let input = input.trim();

    if let Some(caps) = RAW_OKLCH.captures(input) {
        let fractional = (1..=3).any(|i| caps.get(i).is_some_and(|m| m.as_str().contains('.')));
        if fractional {
            return InputKind::RawOklch;
        }
    }

    if let Some(caps) = RAW_HSL.captures(input) {
        if (1..=3).any(|i| caps.get(i).is_some()) {
            return InputKind::RawHsl;
        }
    }

    if RAW_RGB.is_match(input) {
        return InputKind::RawRgb;
    }

    if let Some(caps) = RAW_HEX.captures(input) {
        if matches!(caps[1].len(), 3 | 4 | 6 | 8) {
            return InputKind::Hex;
        }
    }

    InputKind::Passthrough
}

/// Normalize free-form input into a notation canonical construction accepts
pub fn normalize(input: &str) -> String {
    let input = input.trim();
    match classify(input) {
        InputKind::RawOklch => format!("oklch({})", collapse_whitespace(input)),
        InputKind::RawHsl => format!("hsl({})", collapse_whitespace(input)),
        InputKind::RawRgb => format!("rgb({})", collapse_whitespace(&input.replace(',', " "))),
        InputKind::Hex => format!("#{}", input.trim_start_matches('#')),
        InputKind::Passthrough => input.to_string(),
    }
}

/// Normalize and construct a color
///
/// # Errors
///
/// Returns [`PaletteError::InvalidColorInput`] naming the original input
/// when the normalized form is not a valid color.
pub fn parse(input: &str) -> Result<ParsedColor> {
    let original = input.trim();
    let kind = classify(original);
    let normalized = normalize(original);
    tracing::debug!(input = original, ?kind, normalized = %normalized, "normalized color input");

    let value = parse_notation(&normalized).ok_or_else(|| PaletteError::invalid_color(original))?;
    Ok(ParsedColor {
        original: original.to_string(),
        normalized,
        kind,
        value,
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical construction from hex, named or functional notation
pub(crate) fn parse_notation(input: &str) -> Option<ColorValue> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return None;
    }

    if let Some(digits) = s.strip_prefix('#') {
        return parse_hex(digits);
    }
    if s == "transparent" {
        return Some(ColorValue::rgba(0, 0, 0, 0.0));
    }
    if let Some(rgb) = named::lookup(&s) {
        return Some(ColorValue::from_rgb(rgb));
    }

    let (name, body) = split_function(&s)?;
    let args = Arguments::split(body)?;
    let alpha = match args.alpha {
        Some(token) => parse_alpha(token)?,
        None => 1.0,
    };
    let [a, b, c] = args.components;

    match name {
        "rgb" | "rgba" => {
            let r = parse_rgb_channel(a)?;
            let g = parse_rgb_channel(b)?;
            let b = parse_rgb_channel(c)?;
            Some(ColorValue::rgba(r, g, b, alpha))
        }
        "hsl" | "hsla" => {
            let hsl = Hsl {
                h: parse_angle(a)?,
                s: parse_percentage(b)?,
                l: parse_percentage(c)?,
            };
            Some(ColorValue::from_hsl(hsl, alpha))
        }
        "hsv" | "hsva" => {
            let hsv = Hsv {
                h: parse_angle(a)?,
                s: parse_percentage(b)?,
                v: parse_percentage(c)?,
            };
            Some(ColorValue::from_hsv(hsv, alpha))
        }
        "oklch" => {
            let l = match parse_component(a)? {
                Component::Number(n) => n,
                Component::Percent(p) => p / 100.0,
            };
            let chroma = match parse_component(b)? {
                Component::Number(n) => n,
                Component::Percent(p) => p / 100.0 * OKLCH_CHROMA_PERCENT_REFERENCE,
            };
            let lch = Oklch {
                l: l.clamp(0.0, 1.0),
                c: chroma.max(0.0),
                h: parse_angle(c)?,
            };
            Some(ColorValue::from_oklch(lch, alpha))
        }
        _ => None,
    }
}

fn parse_hex(digits: &str) -> Option<ColorValue> {
    if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    match digits.len() {
        3 => Some(ColorValue::new(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(ColorValue::rgba(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            f32::from(nibble(3)?) / 255.0,
        )),
        6 => Some(ColorValue::new(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(ColorValue::rgba(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            f32::from(byte(6)?) / 255.0,
        )),
        _ => None,
    }
}

/// Split `name(body)` into its parts
fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let name = s[..open].trim();
    let body = s[open + 1..].strip_suffix(')')?;
    if name.is_empty() || body.contains(['(', ')']) {
        return None;
    }
    Some((name, body))
}

/// Three color components plus optional alpha
struct Arguments<'a> {
    components: [&'a str; 3],
    alpha: Option<&'a str>,
}

impl<'a> Arguments<'a> {
    /// Accept both legacy comma syntax and modern space / slash syntax
    fn split(body: &'a str) -> Option<Self> {
        let (tokens, alpha): (Vec<&str>, Option<&str>) = if body.contains(',') {
            if body.contains('/') {
                return None;
            }
            let mut tokens: Vec<&str> = body.split(',').map(str::trim).collect();
            let alpha = match tokens.len() {
                3 => None,
                4 => tokens.pop(),
                _ => return None,
            };
            (tokens, alpha)
        } else {
            let mut parts = body.split('/');
            let head = parts.next()?;
            let alpha = match parts.next() {
                Some(tail) => {
                    let mut words = tail.split_whitespace();
                    let alpha = words.next()?;
                    if words.next().is_some() {
                        return None;
                    }
                    Some(alpha)
                }
                None => None,
            };
            if parts.next().is_some() {
                return None;
            }
            (head.split_whitespace().collect(), alpha)
        };

        if tokens.iter().any(|t| t.is_empty()) {
            return None;
        }
        let components: [&str; 3] = tokens.try_into().ok()?;
        Some(Self { components, alpha })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Component {
    Number(f64),
    Percent(f64),
}

fn parse_number(token: &str) -> Option<f64> {
    if token.is_empty()
        || token
            .chars()
            .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
    {
        return None;
    }
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_component(token: &str) -> Option<Component> {
    match token.strip_suffix('%') {
        Some(number) => parse_number(number).map(Component::Percent),
        None => parse_number(token).map(Component::Number),
    }
}

/// Channel in 0..=255 or a percentage, clamped
fn parse_rgb_channel(token: &str) -> Option<u8> {
    let unit = match parse_component(token)? {
        Component::Number(n) => n / 255.0,
        Component::Percent(p) => p / 100.0,
    };
    Some(unit_to_channel(unit))
}

/// Saturation / lightness / value; bare numbers are read as percentages
fn parse_percentage(token: &str) -> Option<f64> {
    match parse_component(token)? {
        Component::Number(n) | Component::Percent(n) => Some(n.clamp(0.0, 100.0)),
    }
}

fn parse_alpha(token: &str) -> Option<f32> {
    let alpha = match parse_component(token)? {
        Component::Number(n) => n,
        Component::Percent(p) => p / 100.0,
    };
    Some(alpha.clamp(0.0, 1.0) as f32)
}

/// Hue in degrees; accepts `deg`, `grad`, `rad`, `turn` or a bare number
fn parse_angle(token: &str) -> Option<f64> {
    if let Some(n) = token.strip_suffix("deg") {
        parse_number(n)
    } else if let Some(n) = token.strip_suffix("grad") {
        parse_number(n).map(|g| g * 0.9)
    } else if let Some(n) = token.strip_suffix("rad") {
        parse_number(n).map(f64::to_degrees)
    } else if let Some(n) = token.strip_suffix("turn") {
        parse_number(n).map(|t| t * 360.0)
    } else {
        parse_number(token)
    }
}
