//! Command-line interface for scan_palette
//!
//! Basic CLI tool for collecting colors and exporting them

use scan_palette::image_loader::{check_extension, supported_extensions};
use scan_palette::{ExportKind, ExtractionConfig, ImportOutcome, PaletteError, Session};
use std::{env, path::PathBuf, process};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut colors = Vec::new();
    let mut image_path = None;
    let mut config_path = None;
    let mut export_kind = None;
    let mut json_output = false;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--image" | "-i" => {
                i += 1;
                match args.get(i) {
                    Some(path) => image_path = Some(PathBuf::from(path)),
                    None => fail("--image requires a path"),
                }
            }
            "--config" | "-c" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(PathBuf::from(path)),
                    None => fail("--config requires a path"),
                }
            }
            "--export" | "-e" => {
                i += 1;
                let Some(key) = args.get(i) else {
                    fail("--export requires a kind");
                };
                match key.parse::<ExportKind>() {
                    Ok(kind) => export_kind = Some(kind),
                    Err(e) => fail(&e.to_string()),
                }
            }
            "--json" => json_output = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => colors.push(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    if colors.is_empty() && image_path.is_none() {
        print_help(&args[0]);
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => {
            ExtractionConfig::from_json_file(&path).unwrap_or_else(|e| fail(&e.to_string()))
        }
        None => ExtractionConfig::default(),
    };
    let mut session = Session::with_config(config).unwrap_or_else(|e| fail(&e.to_string()));

    for color in &colors {
        if let Err(e) = session.add_color(color) {
            report(&e);
        }
    }

    if let Some(path) = image_path {
        if check_extension(&path).is_err() {
            fail(&format!(
                "Unsupported image '{}' (expected one of: {})",
                path.display(),
                supported_extensions().join(", ")
            ));
        }
        let bytes = std::fs::read(&path).unwrap_or_else(|e| {
            fail(&format!("Cannot read '{}': {e}", path.display()));
        });

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap_or_else(|e| fail(&format!("Cannot start runtime: {e}")));

        match runtime.block_on(session.import_image(Some(bytes))) {
            Ok(ImportOutcome::Extracted { candidates, added }) => {
                eprintln!(
                    "Extracted {} colors from image ({} after deduplication)",
                    candidates,
                    added.len()
                );
            }
            Ok(ImportOutcome::NoSelection) => {}
            Err(e) => report(&e),
        }
    }

    if let Some(kind) = export_kind {
        println!("{}", session.export(kind));
        return;
    }

    if json_output {
        let table: Vec<_> = (0..session.colors().len())
            .filter_map(|index| session.formats(index).ok())
            .collect();
        match serde_json::to_string_pretty(&table) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(&format!("Failed to serialize: {e}")),
        }
        return;
    }

    print_table(&session);
}

fn print_table(session: &Session) {
    println!("\n=== Colors ===");
    for (index, entry) in session.colors().entries().iter().enumerate() {
        let Ok(formats) = session.formats(index) else {
            continue;
        };
        println!();
        println!("{}. {}", index + 1, entry.normalized);
        println!("   Hex:   {}", formats.hex);
        println!("   RGB:   {}", formats.rgb);
        println!("   HSL:   {}", formats.hsl);
        println!("   HSV:   {}", formats.hsv);
        println!("   OKLCH: {}", formats.oklch);
    }
}

fn report(err: &PaletteError) {
    eprintln!("{}", err.user_message());
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}

fn print_help(program: &str) {
    println!("Usage: {} [OPTIONS] [COLOR...]", program);
    println!();
    println!("Collect colors and print their formats or an export");
    println!();
    println!("Arguments:");
    println!("  COLOR                  Any color notation, e.g. \"255 0 0\", ff0000, coral");
    println!();
    println!("Options:");
    println!("  -i, --image <PATH>     Extract a palette from an image");
    println!("  -c, --config <PATH>    Load extraction settings from a JSON file");
    println!("  -e, --export <KIND>    Print an export, one of:");
    println!("                         css-hex, css-rgb, css-hsl, css-oklch, tailwind");
    println!("      --json             Print the format table as JSON");
    println!("  -h, --help             Show this help message");
    println!();
    println!("Environment:");
    println!("  RUST_LOG               Log filter, e.g. scan_palette=debug");
}
