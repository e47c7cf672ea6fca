//! Integration tests for the session workflow
//!
//! These tests exercise the public API end to end:
//! - Free-form color input and disambiguation
//! - Round-trip stability of every output notation
//! - Exact and perceptual deduplication
//! - Palette extraction from encoded images
//! - CSS and Tailwind exports

use image::{ImageFormat, Rgba, RgbaImage};
use regex::Regex;
use scan_palette::{
    export_variables, normalize, parse, ColorValue, DedupPolicy, ExportKind, ExtractionConfig,
    ExtractionPhase, ImportOutcome, InputKind, Notice, PaletteError, Session, VariableFormat,
};
use std::io::Cursor;

fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Left half `left`, right half `right`
fn split_png(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let [r, g, b] = if x < width / 2 { left } else { right };
        Rgba([r, g, b, 255])
    });
    encode_png(&img)
}

/// Stratified sample of the RGB cube including both extremes
fn sample_colors() -> Vec<ColorValue> {
    let steps = [0u8, 1, 37, 64, 99, 128, 170, 201, 254, 255];
    let mut colors = Vec::new();
    for r in steps {
        for g in steps {
            for b in steps {
                colors.push(ColorValue::new(r, g, b));
            }
        }
    }
    colors
}

fn assert_within_one(actual: [u8; 3], expected: [u8; 3], context: &str) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(
            (i16::from(*a) - i16::from(*e)).abs() <= 1,
            "{context}: {actual:?} vs {expected:?}"
        );
    }
}

// ============================================================================
// Parser Disambiguation
// ============================================================================

#[test]
fn test_raw_hsl_triple() {
    let parsed = parse("120 50% 50%").unwrap();
    assert_eq!(parsed.kind, InputKind::RawHsl);
    assert!(parsed.normalized.starts_with("hsl("));
}

#[test]
fn test_raw_oklch_triple() {
    let parsed = parse("0.7 0.1 180").unwrap();
    assert_eq!(parsed.kind, InputKind::RawOklch);
    assert!(parsed.normalized.starts_with("oklch("));
}

#[test]
fn test_integer_triple_is_rgb() {
    let parsed = parse("255 0 0").unwrap();
    assert_eq!(parsed.kind, InputKind::RawRgb);
    assert_eq!(parsed.value.rgb(), [255, 0, 0]);
}

#[test]
fn test_comma_triple_is_rgb() {
    assert_eq!(parse("255,0,0").unwrap().value.rgb(), [255, 0, 0]);
    assert_eq!(parse("255, 0, 0").unwrap().value.rgb(), [255, 0, 0]);
}

#[test]
fn test_bare_hex_and_names() {
    assert_eq!(parse("3366cc").unwrap().value.rgb(), [0x33, 0x66, 0xcc]);
    assert_eq!(parse("rebeccapurple").unwrap().value.rgb(), [102, 51, 153]);
    assert!(matches!(
        parse("not a color"),
        Err(PaletteError::InvalidColorInput { .. })
    ));
}

#[test]
fn test_normalization_is_idempotent() {
    let inputs = [
        "120 50% 50%",
        "0.7 0.1 180",
        "255 0 0",
        "255,0,0",
        "ff0000",
        "#abc",
        "coral",
        "rgb(1, 2, 3)",
        "hsl(200deg 40% 30%)",
        "oklch(0.5 0.2 90 / 0.5)",
    ];
    for input in inputs {
        let once = parse(input).unwrap().normalized;
        assert_eq!(normalize(&once), once, "input {input:?}");
        assert_eq!(parse(&once).unwrap().normalized, once, "input {input:?}");
    }
}

// ============================================================================
// Output Notations
// ============================================================================

#[test]
fn test_hex_round_trip() {
    for color in sample_colors() {
        let back = parse(&color.to_hex()).unwrap().value;
        assert_within_one(back.rgb(), color.rgb(), "hex");
    }
}

#[test]
fn test_hsl_string_round_trip() {
    for color in sample_colors() {
        let back = parse(&color.to_hsl_string()).unwrap().value;
        assert_within_one(back.rgb(), color.rgb(), &color.to_hsl_string());
    }
}

#[test]
fn test_oklch_string_round_trip() {
    for color in sample_colors() {
        let back = parse(&color.to_oklch_string()).unwrap().value;
        assert_within_one(back.rgb(), color.rgb(), &color.to_oklch_string());
    }
}

#[test]
fn test_output_strings_are_well_formed() {
    let number = r"-?\d+(\.\d+)?";
    let hex = Regex::new(r"^#[0-9a-f]{6}$").unwrap();
    let rgb = Regex::new(r"^rgb\(\d{1,3}, \d{1,3}, \d{1,3}\)$").unwrap();
    let hsl = Regex::new(&format!(r"^hsl\({number}, {number}%, {number}%\)$")).unwrap();
    let oklch = Regex::new(&format!(r"^oklch\({number} {number} {number}\)$")).unwrap();

    for color in sample_colors() {
        assert!(hex.is_match(&color.to_hex()), "{}", color.to_hex());
        assert!(rgb.is_match(&color.to_rgb_string()), "{}", color.to_rgb_string());
        assert!(hsl.is_match(&color.to_hsl_string()), "{}", color.to_hsl_string());
        assert!(oklch.is_match(&color.to_oklch_string()), "{}", color.to_oklch_string());
        let hsv: serde_json::Value = serde_json::from_str(&color.to_hsv_string()).unwrap();
        assert!(hsv["h"].is_number() && hsv["s"].is_number() && hsv["v"].is_number());
    }
}

// ============================================================================
// Session and Deduplication
// ============================================================================

#[test]
fn test_same_input_twice_keeps_one() {
    let mut session = Session::new();
    session.add_color("coral").unwrap();
    let err = session.add_color("coral").unwrap_err();
    assert_eq!(
        err.notice(),
        Some(Notice::DuplicateColor {
            color: "coral".into()
        })
    );
    assert_eq!(session.colors().len(), 1);
}

#[test]
fn test_remove_first_of_three() {
    let mut session = Session::new();
    for color in ["#ff0000", "#00ff00", "#0000ff"] {
        session.add_color(color).unwrap();
    }
    session.remove_color(0).unwrap();
    let remaining: Vec<&str> = session.colors().normalized().collect();
    assert_eq!(remaining, ["#00ff00", "#0000ff"]);
}

#[test]
fn test_names_survive_removal() {
    let mut session = Session::new();
    for color in ["#ff0000", "#00ff00"] {
        session.add_color(color).unwrap();
    }
    session.rename_color(1, "Leaf").unwrap();
    session.remove_color(0).unwrap();
    assert_eq!(session.name_of(0), Some("Leaf"));
}

#[test]
fn test_clear_all() {
    let mut session = Session::new();
    session.add_color("#ff0000").unwrap();
    session.clear_all();
    assert!(session.colors().is_empty());
    assert_eq!(session.export(ExportKind::Tailwind), "");
}

// ============================================================================
// Palette Extraction
// ============================================================================

#[tokio::test]
async fn test_single_color_image() {
    let img = RgbaImage::from_pixel(10, 10, Rgba([40, 120, 200, 255]));
    let mut session = Session::new();
    let outcome = session.import_image(Some(encode_png(&img))).await.unwrap();

    assert!(matches!(outcome, ImportOutcome::Extracted { candidates: 1, .. }));
    assert_eq!(session.colors().len(), 1);
    let value = session.colors().get(0).unwrap().value;
    assert_within_one(value.rgb(), [40, 120, 200], "single color");
    assert_eq!(session.phase(), ExtractionPhase::Succeeded { added: 1 });
    assert!(session.has_image());
}

#[tokio::test]
async fn test_two_block_image() {
    let mut session = Session::new();
    let png = split_png(10, 10, [255, 0, 0], [0, 0, 255]);
    session.import_image(Some(png)).await.unwrap();

    let rgbs: Vec<[u8; 3]> = session.colors().values().map(ColorValue::rgb).collect();
    assert!(rgbs.contains(&[255, 0, 0]));
    assert!(rgbs.contains(&[0, 0, 255]));
}

#[tokio::test]
async fn test_extracted_colors_close_to_collection_are_dropped() {
    let mut session = Session::new();
    session.add_color("#ff0000").unwrap();

    let png = split_png(10, 10, [250, 4, 4], [0, 0, 255]);
    let outcome = session.import_image(Some(png)).await.unwrap();

    let ImportOutcome::Extracted { added, .. } = outcome else {
        panic!("expected an extraction");
    };
    assert_eq!(added.len(), 1);
    let remaining: Vec<&str> = session.colors().normalized().collect();
    assert_eq!(remaining, ["#ff0000", "#0000ff"]);
}

#[tokio::test]
async fn test_close_extracted_colors_keep_only_the_first() {
    // Three quarters pure blue, one quarter a blue 17 units away
    let img = RgbaImage::from_fn(20, 20, |x, _| {
        if x < 15 {
            Rgba([0, 0, 255, 255])
        } else {
            Rgba([10, 10, 245, 255])
        }
    });
    let mut session = Session::new();
    session.import_image(Some(encode_png(&img))).await.unwrap();

    assert_eq!(session.colors().len(), 1);
    let kept = session.colors().get(0).unwrap().value;
    assert!(kept.distance(&ColorValue::new(0, 0, 255)) < 30.0);
}

#[tokio::test]
async fn test_snapshot_policy_keeps_close_extracted_colors() {
    let config = ExtractionConfig {
        dedup_policy: DedupPolicy::Snapshot,
        ..ExtractionConfig::default()
    };
    let mut session = Session::with_config(config).unwrap();
    let png = split_png(10, 10, [0, 0, 255], [10, 10, 245]);
    let outcome = session.import_image(Some(png)).await.unwrap();

    let ImportOutcome::Extracted { candidates, added } = outcome else {
        panic!("expected an extraction");
    };
    assert_eq!(added.len(), candidates);
}

#[tokio::test]
async fn test_undecodable_upload_leaves_session_intact() {
    let mut session = Session::new();
    session.add_color("#ff0000").unwrap();

    let err = session
        .import_image(Some(b"not an image".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, PaletteError::ImageDecodeFailure { .. }));
    assert_eq!(session.colors().len(), 1);
    assert!(matches!(session.phase(), ExtractionPhase::Failed { .. }));

    // A later import still works
    let png = split_png(10, 10, [0, 0, 255], [0, 0, 255]);
    session.import_image(Some(png)).await.unwrap();
    assert_eq!(session.colors().len(), 2);
}

#[tokio::test]
async fn test_replace_image_clears_previous_colors() {
    let mut session = Session::new();
    session.add_color("#ff0000").unwrap();
    let png = split_png(10, 10, [0, 200, 0], [0, 200, 0]);
    session.replace_image(png).await.unwrap();

    let remaining: Vec<&str> = session.colors().normalized().collect();
    assert_eq!(remaining, ["#00c800"]);
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn test_export_variables_empty_and_single() {
    assert_eq!(export_variables(std::iter::empty(), VariableFormat::Hex), "");

    let red = parse("#ff0000").unwrap().value;
    let css = export_variables([&red], VariableFormat::Hex);
    assert_eq!(css, ":root {\n  --color-1: #ff0000;\n}");
    assert_eq!(css.matches("--color-").count(), 1);
}

#[test]
fn test_session_exports_every_kind() {
    let mut session = Session::new();
    session.add_color("255 0 0").unwrap();
    session.add_color("0.7 0.1 180").unwrap();

    for kind in ExportKind::ALL {
        let artifact = session.export(kind);
        assert!(!artifact.is_empty(), "{kind}");
    }
    let tailwind = session.export(ExportKind::Tailwind);
    assert!(tailwind.starts_with("module.exports = {"));
    assert!(tailwind.contains("color1: \"#ff0000\""));
    assert!(tailwind.contains("color2: \"#"));
}
