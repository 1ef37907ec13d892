//! # carousel-forge
//!
//! Generate on-brand LinkedIn/Instagram carousels with an image-generation
//! model, one slide at a time.
//!
//! ## Why sequential?
//!
//! Generating every slide independently gives a carousel where each slide
//! picks its own fonts, margins and accent shapes. Instead, slide *i+1* is
//! generated through the model's edit endpoint with slide *i* as a visual
//! reference, and its prompt carries an explicit "match the reference"
//! directive. The price is that slides cannot be generated in parallel and a
//! failed slide stops the run.
//!
//! ## Pipeline Overview
//!
//! ```text
//! topic + thoughts
//!  │
//!  ├─ 1. Plan      hook → template-specific slides → CTA   (plan)
//!  ├─ 2. Snapshot  content.json in the run directory       (output)
//!  ├─ 3. Prompt    brand guide + layout + consistency       (prompts)
//!  ├─ 4. Generate  text-to-image, then edit with reference  (generate, pipeline::fal)
//!  ├─ 5. Save      01-hook.png, 02-content.png, …           (pipeline::image)
//!  └─ 6. Bundle    carousel.pdf, one page per slide         (pipeline::pdf)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carousel_forge::{generate_carousel, CarouselConfig, FalClient, TemplateKind};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Key from FAL_KEY (or FALAI_KEY)
//!     let client = FalClient::from_env()?;
//!     let config = CarouselConfig::builder()
//!         .topic("5 Preisfehler im Mittelstand")
//!         .template(TemplateKind::Listicle)
//!         .slide_count(7)
//!         .build()?;
//!     let result = generate_carousel(&client, &config, Path::new("output/preisfehler")).await?;
//!     eprintln!("{} slides, ${:.2}", result.slides.len(), result.total_cost());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `carousel` and `fal-image` binaries (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Pricing
//!
//! | Resolution | Per image |
//! |------------|-----------|
//! | `1K` | $0.15 |
//! | `2K` | $0.30 (default) |
//! | `4K` | $0.60 |
//!
//! A 7-slide carousel at 2K costs **$2.10**. Prices live in
//! [`PricingTable`] and can be overridden per run.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod progress;
pub mod prompts;
pub mod still;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{load_prompts, run_batch, BatchPrompt, BatchReport, ImagesManifest};
pub use config::{
    format_cents, AspectRatio, BrandProfile, CarouselConfig, CarouselConfigBuilder, ColorMode, FalConfig,
    OutputFormat, Platform, PricingTable, Resolution, RunOptions, TemplateKind,
};
pub use error::CarouselError;
pub use generate::{
    estimate_cost, generate_carousel, generate_from_content, previous_slide_path, regenerate_slide, RunStatus,
    SequenceState,
};
pub use output::{CarouselContent, CarouselResult, GeneratedSlide};
pub use pipeline::fal::{FalClient, GenerationRequest, GenerationResponse, ImageBackend};
pub use pipeline::pdf::{bundle_directory, bundle_to_pdf, page_sizes};
pub use plan::{build_plan, SlideColor, SlideContent, SlideSpec, SlideType};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
pub use prompts::{build_edit_prompt, build_slide_prompt, with_feedback};
pub use still::{generate_still, StillImageOutcome, StillImageRequest};
