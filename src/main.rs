use std::path::PathBuf;

use annotator::{export, AnnotatorApp, Rasterizer};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

/// Draw ellipses, arrows, guidelines, rectangles and text over an image.
///
/// Ctrl+Z undoes the last shape, Ctrl+S saves the annotated image, Ctrl+C copies it.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Image to annotate (png, jpg, bmp, ...)
    image: PathBuf,
}

fn main() -> Result<()> {
    // RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("annotator=info")),
        )
        .init();

    let cli = Cli::parse();
    let base = export::load_image(&cli.image)
        .with_context(|| format!("cannot open {}", cli.image.display()))?;
    let rasterizer = Rasterizer::new().context("cannot load the export font")?;

    let title = format!(
        "annotator - {}",
        cli.image
            .file_name()
            .unwrap_or_default()
            .to_str()
            .unwrap_or("")
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    let image_path = cli.image;
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotatorApp::new(image_path, base, rasterizer)))),
    )
    .map_err(|e| anyhow!("failed to run eframe: {e}"))
}
