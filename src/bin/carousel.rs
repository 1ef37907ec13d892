//! CLI binary for carousel-forge.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `CarouselConfig`, renders progress and prints results.

use anyhow::{bail, Context, Result};
use carousel_forge::output::{CONTENT_FILE, PDF_FILE};
use carousel_forge::pipeline::image::create_output_dir;
use carousel_forge::{
    bundle_directory, estimate_cost, format_cents, generate_carousel, generate_from_content,
    load_prompts, page_sizes, previous_slide_path, regenerate_slide, run_batch, CarouselConfig,
    CarouselContent, ColorMode, FalClient, GenerationProgressCallback, Platform, PricingTable, ProgressCallback,
    Resolution, RunOptions, TemplateKind,
};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Live progress bar plus one log line per slide.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the slide currently in flight.
    started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Planning slides…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.started
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_slides: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>2}/{len} slides  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_slides as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Generating");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {total_slides} slides sequentially…"))
        ));
    }

    fn on_slide_start(&self, index: usize, _total: usize, slide_type: &str) {
        if let Ok(mut t) = self.started.lock() {
            *t = Some(Instant::now());
        }
        self.bar.set_message(format!("slide {} ({slide_type})", index + 1));
    }

    fn on_slide_complete(&self, index: usize, total: usize, filename: &str) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} Slide {:>2}/{:<2}  {:<26}  {}",
            green("✓"),
            index + 1,
            total,
            filename,
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_slide_error(&self, index: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs();
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Slide {:>2}/{:<2}  {}  {}",
            red("✗"),
            index + 1,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.abandon();
    }

    fn on_bundle_complete(&self, pdf_path: &Path) {
        self.bar.println(format!("  {} {}", green("✓"), dim(&pdf_path.display().to_string())));
    }

    fn on_run_complete(&self, total_slides: usize, total_cost_cents: u64) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} slides generated  {}",
            green("✔"),
            bold(&total_slides.to_string()),
            dim(&format_cents(total_cost_cents)),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Plan only (no API key needed)
  carousel plan --topic "5 Preisfehler im Mittelstand" --template listicle --slides 7

  # Generate a LinkedIn carousel
  carousel generate --topic "Preise erhöhen ohne Kunden zu verlieren" \
      --thoughts "Die meisten KMU verschenken Marge." --slides 7

  # Instagram, mixed colours, no confirmation prompt
  carousel generate --topic "Pricing-Framework" --template story-framework \
      --platform instagram --color-mode mixed --yes

  # Generate from hand-written content
  carousel generate --content content.json --yes

  # Redo slide 3 with feedback, keeping the style of slide 2
  carousel regenerate --dir output/2026-01-12_pricing-framework --index 3 \
      --feedback "Mehr Kontrast, kürzere Headline"

  # Rebuild the PDF after regenerating
  carousel bundle output/2026-01-12_pricing-framework

  # Still images from a prompt list
  carousel batch prompts.json --output-dir output/images

PRICING (per image):
  1K  $0.15
  2K  $0.30  (default)
  4K  $0.60

ENVIRONMENT VARIABLES:
  FAL_KEY            fal.ai API key (FALAI_KEY is accepted as a fallback)
  FAL_BASE_URL       Override https://fal.run
  PDFIUM_LIB_PATH    Path to libpdfium (file or directory) for PDF bundling
  RUST_LOG           Log filter, e.g. carousel_forge=debug
"#;

/// Generate on-brand social media carousels with AI image generation.
#[derive(Parser, Debug)]
#[command(
    name = "carousel",
    version,
    about = "Generate on-brand LinkedIn/Instagram carousels with AI image generation",
    long_about = "Plan a carousel from a topic, generate every slide with fal.ai Nano Banana Pro \
(each slide using the previous one as a style reference) and bundle the result into a PDF.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CAROUSEL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "CAROUSEL_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan and generate a carousel.
    Generate(GenerateArgs),
    /// Regenerate a single slide of an existing carousel.
    Regenerate(RegenerateArgs),
    /// Bundle the slide images of a directory into a PDF.
    Bundle(BundleArgs),
    /// Print the slide plan and estimated cost without generating anything.
    Plan(PlanCmdArgs),
    /// Generate still images from a JSON prompt list.
    Batch(BatchArgs),
}

#[derive(Args, Debug, Clone)]
struct PlanArgs {
    /// Carousel topic (max 200 chars).
    #[arg(long, env = "CAROUSEL_TOPIC")]
    topic: Option<String>,

    /// Free-form thoughts; the first sentence feeds the hook.
    #[arg(long, env = "CAROUSEL_THOUGHTS", default_value = "")]
    thoughts: String,

    /// Target platform.
    #[arg(long, env = "CAROUSEL_PLATFORM", value_enum, default_value = "linkedin")]
    platform: PlatformArg,

    /// Slide structure.
    #[arg(long, env = "CAROUSEL_TEMPLATE", value_enum, default_value = "hook-content-cta")]
    template: TemplateArg,

    /// Number of slides including hook and CTA.
    #[arg(long, env = "CAROUSEL_SLIDES", default_value_t = 7)]
    slides: usize,

    /// Background colour scheme.
    #[arg(long, env = "CAROUSEL_COLOR_MODE", value_enum, default_value = "dark")]
    color_mode: ColorModeArg,

    /// Image resolution (1K, 2K, 4K).
    #[arg(long, env = "CAROUSEL_RESOLUTION", value_enum, ignore_case = true)]
    resolution: Option<ResolutionArg>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    plan: PlanArgs,

    /// Generate from a content.json instead of planning from a topic.
    #[arg(long, conflicts_with = "topic")]
    content: Option<PathBuf>,

    /// Base directory for run directories.
    #[arg(long, env = "CAROUSEL_OUTPUT_BASE", default_value = "output")]
    output_base: PathBuf,

    /// Skip bundling carousel.pdf.
    #[arg(long)]
    no_pdf: bool,

    /// Do not ask for confirmation of the estimated cost.
    #[arg(short, long)]
    yes: bool,
}

#[derive(Args, Debug)]
struct RegenerateArgs {
    /// Run directory containing content.json.
    #[arg(long)]
    dir: PathBuf,

    /// Slide number, 1-based.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    index: u32,

    /// Extra instructions appended to the prompt.
    #[arg(long)]
    feedback: Option<String>,

    /// Generate from scratch instead of matching the previous slide.
    #[arg(long)]
    no_reference: bool,
}

#[derive(Args, Debug)]
struct BundleArgs {
    /// Directory with slide images.
    dir: PathBuf,

    /// PDF file name inside the directory.
    #[arg(short, long, default_value = PDF_FILE)]
    output: String,
}

#[derive(Args, Debug)]
struct PlanCmdArgs {
    #[command(flatten)]
    plan: PlanArgs,

    /// Print the plan as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON file: [{"name": "...", "prompt": "..."}, …]
    prompts: PathBuf,

    /// Where images and images-manifest.json are written.
    #[arg(long, default_value = "output/images")]
    output_dir: PathBuf,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PlatformArg {
    Linkedin,
    Instagram,
}

impl From<PlatformArg> for Platform {
    fn from(v: PlatformArg) -> Self {
        match v {
            PlatformArg::Linkedin => Platform::LinkedIn,
            PlatformArg::Instagram => Platform::Instagram,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TemplateArg {
    HookContentCta,
    Listicle,
    StoryFramework,
}

impl From<TemplateArg> for TemplateKind {
    fn from(v: TemplateArg) -> Self {
        match v {
            TemplateArg::HookContentCta => TemplateKind::HookContentCta,
            TemplateArg::Listicle => TemplateKind::Listicle,
            TemplateArg::StoryFramework => TemplateKind::StoryFramework,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ColorModeArg {
    Dark,
    Light,
    Mixed,
}

impl From<ColorModeArg> for ColorMode {
    fn from(v: ColorModeArg) -> Self {
        match v {
            ColorModeArg::Dark => ColorMode::Dark,
            ColorModeArg::Light => ColorMode::Light,
            ColorModeArg::Mixed => ColorMode::Mixed,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ResolutionArg {
    #[value(name = "1K")]
    OneK,
    #[value(name = "2K")]
    TwoK,
    #[value(name = "4K")]
    FourK,
}

impl From<ResolutionArg> for Resolution {
    fn from(v: ResolutionArg) -> Self {
        match v {
            ResolutionArg::OneK => Resolution::OneK,
            ResolutionArg::TwoK => Resolution::TwoK,
            ResolutionArg::FourK => Resolution::FourK,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs are suppressed while the progress bar is active.
    let show_progress = !cli.quiet && matches!(cli.command, Command::Generate(_)) && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Generate(args) => run_generate(args, cli.quiet, show_progress).await,
        Command::Regenerate(args) => run_regenerate(args, cli.quiet).await,
        Command::Bundle(args) => run_bundle(args, cli.quiet).await,
        Command::Plan(args) => run_plan(args),
        Command::Batch(args) => run_batch_cmd(args, cli.quiet).await,
    }
}

/// Map plan flags to a validated `CarouselConfig`.
fn build_config(args: &PlanArgs, progress: Option<ProgressCallback>, bundle_pdf: bool) -> Result<CarouselConfig> {
    let mut builder = CarouselConfig::builder()
        .topic(args.topic.clone().unwrap_or_default())
        .thoughts(args.thoughts.clone())
        .platform(args.platform.into())
        .template(args.template.into())
        .slide_count(args.slides)
        .color_mode(args.color_mode.into())
        .resolution(args.resolution.map(Into::into).unwrap_or_default())
        .bundle_pdf(bundle_pdf);
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

/// Ask before spending money. Non-interactive stdin counts as consent.
fn confirm_cost(slides: usize, resolution: Resolution) -> Result<bool> {
    let cost = estimate_cost(slides, resolution, &PricingTable::default());
    eprintln!(
        "{} {} slides at {} ≈ {}",
        cyan("◆"),
        slides,
        resolution,
        bold(&format_cents(cost))
    );
    if !io::stdin().is_terminal() {
        return Ok(true);
    }
    eprint!("Continue? [y/N] ");
    io::stderr().flush().ok();
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "j" | "ja"))
}

async fn run_generate(args: GenerateArgs, quiet: bool, show_progress: bool) -> Result<()> {
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn GenerationProgressCallback>)
    } else {
        None
    };

    let result = if let Some(ref content_path) = args.content {
        let content = CarouselContent::load(content_path)
            .await
            .with_context(|| format!("Failed to load {}", content_path.display()))?;
        let resolution = args.plan.resolution.map(Into::into).unwrap_or(content.resolution);
        if !args.yes && !confirm_cost(content.slides.len(), resolution)? {
            bail!("Aborted");
        }
        let client = FalClient::from_env().context("Image service not configured")?;
        let dir = create_output_dir(&args.output_base, &content.topic).await?;
        let options = RunOptions {
            resolution,
            pricing: PricingTable::default(),
            bundle_pdf: !args.no_pdf,
            progress_callback: progress,
        };
        generate_from_content(&client, &content, &options, &dir)
            .await
            .context("Carousel generation failed")?
    } else {
        let config = build_config(&args.plan, progress, !args.no_pdf)?;
        if !args.yes && !confirm_cost(config.slide_count, config.resolution)? {
            bail!("Aborted");
        }
        let client = FalClient::from_env().context("Image service not configured")?;
        let dir = create_output_dir(&args.output_base, &config.topic).await?;
        generate_carousel(&client, &config, &dir)
            .await
            .context("Carousel generation failed")?
    };

    if !quiet {
        eprintln!(
            "{}  {} slides  {}  →  {}",
            green("✔"),
            result.slides.len(),
            format_cents(result.total_cost_cents),
            bold(&result.output_dir.display().to_string()),
        );
        for slide in &result.slides {
            eprintln!("   {}", dim(&slide.filename));
        }
        if let Some(ref pdf) = result.pdf_path {
            eprintln!("   {}", pdf.display());
        }
    }
    Ok(())
}

async fn run_regenerate(args: RegenerateArgs, quiet: bool) -> Result<()> {
    let content_path = args.dir.join(CONTENT_FILE);
    let content = CarouselContent::load(&content_path)
        .await
        .with_context(|| format!("Failed to load {}", content_path.display()))?;

    let index = args.index as usize - 1;
    if index >= content.slides.len() {
        bail!(
            "Slide {} does not exist (carousel has {} slides)",
            args.index,
            content.slides.len()
        );
    }
    let reference = if args.no_reference {
        None
    } else {
        previous_slide_path(&content, index, &args.dir)
    };
    if index > 0 && reference.is_none() && !args.no_reference {
        tracing::warn!("Previous slide image not found; generating without reference");
    }

    let client = FalClient::from_env().context("Image service not configured")?;
    let options = RunOptions {
        resolution: content.resolution,
        ..RunOptions::default()
    };
    let slide = regenerate_slide(
        &client,
        &content,
        &options,
        index,
        reference.as_deref(),
        args.feedback.as_deref(),
        &args.dir,
    )
    .await
    .context("Regeneration failed")?;

    if !quiet {
        eprintln!(
            "{} Slide {} regenerated  →  {}",
            green("✔"),
            args.index,
            bold(&slide.path.display().to_string())
        );
        eprintln!("   {}", dim("Run `carousel bundle` to rebuild the PDF."));
    }
    Ok(())
}

async fn run_bundle(args: BundleArgs, quiet: bool) -> Result<()> {
    let pdf = bundle_directory(&args.dir, &args.output)
        .await
        .context("PDF bundling failed")?;
    if !quiet {
        let pages = page_sizes(&pdf).await.map(|p| p.len()).unwrap_or(0);
        eprintln!(
            "{} {} pages  →  {}",
            green("✔"),
            pages,
            bold(&pdf.display().to_string())
        );
    }
    Ok(())
}

fn run_plan(args: PlanCmdArgs) -> Result<()> {
    let config = build_config(&args.plan, None, false)?;
    let content = CarouselContent::from_config(&config);
    let cost = estimate_cost(content.slides.len(), config.resolution, &config.pricing);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&content).context("Failed to serialize plan")?
        );
        return Ok(());
    }

    println!("Topic:        {}", config.topic);
    println!("Platform:     {}", config.platform.label());
    println!("Template:     {}", config.template.description());
    println!("Resolution:   {}", config.resolution);
    println!();
    for s in &content.slides {
        println!(
            "  {:>2}. {:<16} {:<6} {}",
            s.index + 1,
            s.slide_type().as_str(),
            format!("{:?}", s.color).to_lowercase(),
            s.title()
        );
    }
    println!();
    println!("Estimated cost: {}", format_cents(cost));
    Ok(())
}

async fn run_batch_cmd(args: BatchArgs, quiet: bool) -> Result<()> {
    let prompts = load_prompts(&args.prompts)
        .await
        .with_context(|| format!("Failed to load {}", args.prompts.display()))?;
    if prompts.is_empty() {
        bail!("No prompts in {}", args.prompts.display());
    }
    let client = FalClient::from_env().context("Image service not configured")?;
    if !quiet {
        eprintln!("{} {} prompts  →  {}", cyan("◆"), prompts.len(), args.output_dir.display());
    }

    let report = run_batch(&client, &prompts, &args.output_dir)
        .await
        .context("Batch generation failed")?;

    if !quiet {
        let m = &report.manifest;
        eprintln!(
            "{} {} new, {} skipped, {} failed  →  {}",
            if report.is_complete() { green("✔") } else { cyan("⚠") },
            m.newly_generated,
            m.skipped_images,
            report.failures.len(),
            bold(&report.manifest_path.display().to_string()),
        );
        for f in &report.failures {
            eprintln!("  {} {}  {}", red("✗"), f.name, dim(&f.error));
        }
    }
    Ok(())
}
