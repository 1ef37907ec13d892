//! `fal-image`: generate one to four still images from a prompt.
//!
//! Exit code 0 on success (and for `--help`), 1 on any validation or
//! generation failure.

use anyhow::{Context, Result};
use carousel_forge::{generate_still, FalClient, StillImageRequest};
use clap::error::ErrorKind;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  fal-image "A minimalist workspace with warm light"
  fal-image "Logo concept, flat vector" -o logo.png --aspect-ratio 1:1 --num-images 4
  fal-image "Hero banner" --aspect-ratio 16:9 --resolution 2K --format webp -o hero.webp

ASPECT RATIOS:
  21:9, 16:9, 3:2, 4:3, 5:4, 1:1, 4:5, 3:4, 2:3, 9:16

ENVIRONMENT VARIABLES:
  FAL_KEY    fal.ai API key (FALAI_KEY is accepted as a fallback)
"#;

/// Generate still images with fal.ai Nano Banana Pro.
#[derive(Parser, Debug)]
#[command(name = "fal-image", version, after_long_help = AFTER_HELP)]
struct Cli {
    /// Text prompt describing the image.
    prompt: Option<String>,

    /// Output path; `_1`, `_2`, … are inserted for multiple images.
    #[arg(short, long, default_value = "generated_image.png")]
    output: PathBuf,

    /// Aspect ratio, e.g. 1:1, 16:9, 3:4.
    #[arg(short, long, default_value = "1:1")]
    aspect_ratio: String,

    /// Resolution: 1K, 2K or 4K.
    #[arg(short, long, default_value = "1K")]
    resolution: String,

    /// Output format: png, jpeg or webp.
    #[arg(short, long, default_value = "png")]
    format: String,

    /// Number of images (1-4).
    #[arg(short, long, default_value_t = 1)]
    num_images: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" })),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(prompt) = cli.prompt.filter(|p| !p.trim().is_empty()) else {
        anyhow::bail!("a prompt is required\n\nUsage: fal-image <PROMPT> [OPTIONS]   (see --help)");
    };

    let request = StillImageRequest {
        prompt,
        output: cli.output,
        aspect_ratio: cli.aspect_ratio,
        resolution: cli.resolution,
        output_format: cli.format,
        num_images: cli.num_images,
    };
    // Reject bad flags before looking for credentials.
    request.validate()?;

    let client = FalClient::from_env().context("Image service not configured")?;
    eprintln!("Generating image…");
    let outcome = generate_still(&client, &request)
        .await
        .context("Image generation failed")?;

    println!("Generated {} image(s):", outcome.images.len());
    for path in &outcome.images {
        println!("  {}", path.display());
    }
    if let Some(description) = outcome.description {
        println!("\nDescription: {description}");
    }
    Ok(())
}
