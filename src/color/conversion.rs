//! Color space conversion utilities
//!
//! Closed-form conversions between 8-bit sRGB and:
//! - HSL and HSV (hexcone models)
//! - Oklab and its polar form OkLCh (Björn Ottosson, 2020)
//!
//! All functions are pure. Conversions back to 8-bit RGB clip out-of-gamut
//! results per channel.

use crate::constants::formatting::ACHROMATIC_CHROMA;

/// HSL color: hue in degrees [0, 360), saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// HSV color: hue in degrees [0, 360), saturation and value in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Oklab color (lightness in [0, 1], a/b roughly in [-0.4, 0.4])
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// OkLCh color: lightness in [0, 1], chroma >= 0, hue in degrees [0, 360)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_hue(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert a unit-range channel to 8 bits, clamping out-of-range input
pub fn unit_to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn channel_to_unit(value: u8) -> f64 {
    f64::from(value) / 255.0
}

/// Hue in degrees from unit RGB, given the max component and chroma
fn hue_of(r: f64, g: f64, b: f64, max: f64, chroma: f64) -> f64 {
    if chroma == 0.0 {
        return 0.0;
    }
    let sector = if max == r {
        ((g - b) / chroma).rem_euclid(6.0)
    } else if max == g {
        (b - r) / chroma + 2.0
    } else {
        (r - g) / chroma + 4.0
    };
    normalize_hue(sector * 60.0)
}

/// Unit RGB from hue, chroma and the offset added to every channel
fn rgb_from_hue(h: f64, chroma: f64, offset: f64) -> [u8; 3] {
    let h = normalize_hue(h) / 60.0;
    let x = chroma * (1.0 - ((h % 2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    [
        unit_to_channel(r + offset),
        unit_to_channel(g + offset),
        unit_to_channel(b + offset),
    ]
}

/// Convert 8-bit RGB to HSL
pub fn rgb_to_hsl(rgb: [u8; 3]) -> Hsl {
    let [r, g, b] = rgb.map(channel_to_unit);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;
    let l = (max + min) / 2.0;
    let s = if chroma == 0.0 {
        0.0
    } else {
        chroma / (1.0 - (2.0 * l - 1.0).abs())
    };
    Hsl {
        h: hue_of(r, g, b, max, chroma),
        s: s * 100.0,
        l: l * 100.0,
    }
}

/// Convert HSL to 8-bit RGB
///
/// Saturation and lightness are clamped to [0, 100]; hue is wrapped.
pub fn hsl_to_rgb(hsl: Hsl) -> [u8; 3] {
    let s = hsl.s.clamp(0.0, 100.0) / 100.0;
    let l = hsl.l.clamp(0.0, 100.0) / 100.0;
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    rgb_from_hue(hsl.h, chroma, l - chroma / 2.0)
}

/// Convert 8-bit RGB to HSV
pub fn rgb_to_hsv(rgb: [u8; 3]) -> Hsv {
    let [r, g, b] = rgb.map(channel_to_unit);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;
    let s = if max == 0.0 { 0.0 } else { chroma / max };
    Hsv {
        h: hue_of(r, g, b, max, chroma),
        s: s * 100.0,
        v: max * 100.0,
    }
}

/// Convert HSV to 8-bit RGB
pub fn hsv_to_rgb(hsv: Hsv) -> [u8; 3] {
    let s = hsv.s.clamp(0.0, 100.0) / 100.0;
    let v = hsv.v.clamp(0.0, 100.0) / 100.0;
    let chroma = v * s;
    rgb_from_hue(hsv.h, chroma, v - chroma)
}

/// sRGB transfer function, encoded to linear light
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse sRGB transfer function, linear light to encoded
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert 8-bit sRGB to Oklab
pub fn rgb_to_oklab(rgb: [u8; 3]) -> Oklab {
    let [r, g, b] = rgb.map(|c| srgb_to_linear(channel_to_unit(c)));

    let l = (0.412_221_470_8 * r + 0.536_332_536_3 * g + 0.051_445_992_9 * b).cbrt();
    let m = (0.211_903_498_2 * r + 0.680_699_545_1 * g + 0.107_396_956_6 * b).cbrt();
    let s = (0.088_302_461_9 * r + 0.281_718_837_6 * g + 0.629_978_700_5 * b).cbrt();

    Oklab {
        l: 0.210_454_255_3 * l + 0.793_617_785_0 * m - 0.004_072_046_8 * s,
        a: 1.977_998_495_1 * l - 2.428_592_205_0 * m + 0.450_593_709_9 * s,
        b: 0.025_904_037_1 * l + 0.782_771_766_2 * m - 0.808_675_766_0 * s,
    }
}

/// Convert Oklab to 8-bit sRGB, clipping out-of-gamut channels
pub fn oklab_to_rgb(lab: Oklab) -> [u8; 3] {
    let l_ = lab.l + 0.396_337_777_4 * lab.a + 0.215_803_757_3 * lab.b;
    let m_ = lab.l - 0.105_561_345_8 * lab.a - 0.063_854_172_8 * lab.b;
    let s_ = lab.l - 0.089_484_177_5 * lab.a - 1.291_485_548_0 * lab.b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    let linear = [
        4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s,
        -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s,
        -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s,
    ];
    linear.map(|c| unit_to_channel(linear_to_srgb(c.clamp(0.0, 1.0))))
}

/// Polar form of an Oklab color
pub fn oklab_to_oklch(lab: Oklab) -> Oklch {
    let c = (lab.a * lab.a + lab.b * lab.b).sqrt();
    let h = if c < ACHROMATIC_CHROMA {
        0.0
    } else {
        normalize_hue(lab.b.atan2(lab.a).to_degrees())
    };
    Oklch { l: lab.l, c, h }
}

/// Cartesian form of an OkLCh color
pub fn oklch_to_oklab(lch: Oklch) -> Oklab {
    let (sin, cos) = lch.h.to_radians().sin_cos();
    Oklab {
        l: lch.l,
        a: lch.c * cos,
        b: lch.c * sin,
    }
}

/// Convert 8-bit sRGB to OkLCh
pub fn rgb_to_oklch(rgb: [u8; 3]) -> Oklch {
    oklab_to_oklch(rgb_to_oklab(rgb))
}

/// Convert OkLCh to 8-bit sRGB, clipping out-of-gamut channels
pub fn oklch_to_rgb(lch: Oklch) -> [u8; 3] {
    oklab_to_rgb(oklch_to_oklab(lch))
}

/// Euclidean distance between two colors in 8-bit RGB space
pub fn rgb_distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Round to a number of decimals and render without trailing zeros
///
/// `format_number(50.0, 1) == "50"`, `format_number(7.84, 1) == "7.8"`.
pub fn format_number(value: f64, decimals: i32) -> String {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    // Avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}
