use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixmap_art::codec::{self, EncodeOptions};
use pixmap_art::models::{PipelineConfig, Step};
use pixmap_art::services::PipelineRunner;

#[derive(Parser)]
#[command(name = "pixmap-art")]
#[command(about = "Pixmap Art - RGB raster transforms for PNG images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dimensions of PNG files
    Info {
        /// Emit one JSON object per file
        #[arg(long)]
        json: bool,

        /// PNG files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Apply single-image operations to a PNG file
    Apply {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Reverse row order when loading and saving
        #[arg(long)]
        flip: bool,

        /// Re-compress the output with oxipng
        #[arg(long)]
        optimize: bool,

        /// Operations in order, e.g. "grayscale sobel-edge invert" or "glow=200"
        #[arg(required = true)]
        ops: Vec<Step>,
    },
    /// Execute a pipeline file
    Run {
        /// Pipeline YAML (defaults to $PIXMAP_PIPELINE)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixmap_art=info,rgb_pixmap=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Info { json, files }) => run_info_command(&files, json),
        Some(Commands::Apply {
            input,
            output,
            flip,
            optimize,
            ops,
        }) => run_apply_command(&input, &output, flip, optimize, &ops),
        Some(Commands::Run { config }) => run_pipeline_command(config),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Print `name (W x H)` for each file
fn run_info_command(files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    for file in files {
        let image = codec::decode(file, false)
            .with_context(|| format!("Failed to load {}", file.display()))?;
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());

        if json {
            let line = serde_json::json!({
                "file": name,
                "width": image.width(),
                "height": image.height(),
            });
            println!("{line}");
        } else {
            println!("{name} ({} x {})", image.width(), image.height());
        }
    }
    Ok(())
}

/// Load one file, run the operations, save the result
fn run_apply_command(
    input: &Path,
    output: &Path,
    flip: bool,
    optimize: bool,
    ops: &[Step],
) -> anyhow::Result<()> {
    let mut image = codec::decode(input, flip)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let no_operands = HashMap::new();
    for step in ops {
        image = step
            .apply(&image, &no_operands)
            .with_context(|| format!("Operation {} failed", step.name()))?;
    }

    codec::encode(output, &image, EncodeOptions { flip, optimize })
        .with_context(|| format!("Failed to save {}", output.display()))?;
    println!(
        "Wrote {} ({} x {})",
        output.display(),
        image.width(),
        image.height()
    );
    Ok(())
}

/// Load and execute a pipeline file
fn run_pipeline_command(config: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config
        .or_else(|| std::env::var("PIXMAP_PIPELINE").ok().map(PathBuf::from))
        .context("No pipeline given: pass --config or set PIXMAP_PIPELINE")?;

    let config = PipelineConfig::load(&path)
        .with_context(|| format!("Failed to load pipeline {}", path.display()))?;
    let report = PipelineRunner::new(config)
        .run()
        .with_context(|| format!("Pipeline {} failed", path.display()))?;

    for (name, width, height) in &report.loaded {
        println!("{name} ({width} x {height})");
    }
    for written in &report.written {
        println!("Wrote {}", written.display());
    }
    Ok(())
}

/// Show version and configuration when run without a command
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let pipeline = std::env::var("PIXMAP_PIPELINE").ok();
    let filter = std::env::var("RUST_LOG").ok();

    println!("Pixmap Art v{VERSION}");
    println!("RGB raster transforms for PNG images\n");

    println!("Environment Variables:");
    println!(
        "  PIXMAP_PIPELINE = {}",
        pipeline.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG        = {}",
        filter.as_deref().unwrap_or("pixmap_art=info,rgb_pixmap=warn (default)")
    );

    println!("\nCommands:");
    println!("  pixmap-art info <FILE>...              Print image dimensions");
    println!("  pixmap-art apply -i IN -o OUT OP...    Apply operations to one image");
    println!("  pixmap-art run [--config FILE]         Execute a pipeline file");
}
