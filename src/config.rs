//! Configuration types for carousel generation.
//!
//! A carousel run is controlled through [`CarouselConfig`], built via its
//! [`CarouselConfigBuilder`]. The per-run knobs that the generator itself
//! needs (resolution, pricing, PDF bundling, progress) are split out into
//! [`RunOptions`] so that the content-driven variant and single-slide
//! regeneration can run without a template or slide-count.
//!
//! The image-service connection lives in [`FalConfig`], read from the
//! environment by default.

use crate::error::CarouselError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest topic accepted by the builder, in characters.
pub const MAX_TOPIC_CHARS: usize = 200;

/// Configuration for one carousel generation run.
///
/// # Example
/// ```rust
/// use carousel_forge::{CarouselConfig, ColorMode, Platform, TemplateKind};
///
/// let config = CarouselConfig::builder()
///     .topic("Preise richtig kalkulieren")
///     .platform(Platform::Instagram)
///     .template(TemplateKind::Listicle)
///     .slide_count(6)
///     .color_mode(ColorMode::Mixed)
///     .build()
///     .unwrap();
/// assert_eq!(config.slide_count, 6);
/// ```
#[derive(Clone)]
pub struct CarouselConfig {
    /// Carousel topic; becomes the hook slide's headline. 1–200 chars.
    pub topic: String,

    /// Freeform context. Its first sentence feeds hook subtitles and every
    /// non-CTA prompt gets it as additional context.
    pub thoughts: String,

    /// Target platform. Default: LinkedIn (1080×1080, 1:1).
    pub platform: Platform,

    /// Slide structure. Default: hook → content → CTA.
    pub template: TemplateKind,

    /// Number of slides including hook and CTA. Must lie within the
    /// template's `[min_slides, max_slides]`. Default: 7.
    pub slide_count: usize,

    /// Background colour scheme across the carousel. Default: dark.
    pub color_mode: ColorMode,

    /// CTA copy.
    pub brand: BrandProfile,

    /// Resolution tier requested from the image service. Default: 2K.
    pub resolution: Resolution,

    /// Unit prices per resolution tier.
    pub pricing: PricingTable,

    /// Bundle the slides into `carousel.pdf` after generation. Default: true.
    pub bundle_pdf: bool,

    /// Optional per-slide progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            thoughts: String::new(),
            platform: Platform::default(),
            template: TemplateKind::default(),
            slide_count: 7,
            color_mode: ColorMode::default(),
            brand: BrandProfile::default(),
            resolution: Resolution::default(),
            pricing: PricingTable::default(),
            bundle_pdf: true,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CarouselConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselConfig")
            .field("topic", &self.topic)
            .field("thoughts", &self.thoughts)
            .field("platform", &self.platform)
            .field("template", &self.template)
            .field("slide_count", &self.slide_count)
            .field("color_mode", &self.color_mode)
            .field("brand", &self.brand)
            .field("resolution", &self.resolution)
            .field("pricing", &self.pricing)
            .field("bundle_pdf", &self.bundle_pdf)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl CarouselConfig {
    /// Create a new builder for `CarouselConfig`.
    pub fn builder() -> CarouselConfigBuilder {
        CarouselConfigBuilder {
            config: Self::default(),
        }
    }

    /// The generator-facing subset of this configuration.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            resolution: self.resolution,
            pricing: self.pricing.clone(),
            bundle_pdf: self.bundle_pdf,
            progress_callback: self.progress_callback.clone(),
        }
    }
}

/// Builder for [`CarouselConfig`].
#[derive(Debug)]
pub struct CarouselConfigBuilder {
    config: CarouselConfig,
}

impl CarouselConfigBuilder {
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.config.topic = topic.into();
        self
    }

    pub fn thoughts(mut self, thoughts: impl Into<String>) -> Self {
        self.config.thoughts = thoughts.into();
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.config.platform = platform;
        self
    }

    pub fn template(mut self, template: TemplateKind) -> Self {
        self.config.template = template;
        self
    }

    pub fn slide_count(mut self, n: usize) -> Self {
        self.config.slide_count = n;
        self
    }

    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.config.color_mode = mode;
        self
    }

    pub fn brand(mut self, brand: BrandProfile) -> Self {
        self.config.brand = brand;
        self
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.config.resolution = resolution;
        self
    }

    pub fn pricing(mut self, pricing: PricingTable) -> Self {
        self.config.pricing = pricing;
        self
    }

    pub fn bundle_pdf(mut self, v: bool) -> Self {
        self.config.bundle_pdf = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CarouselConfig, CarouselError> {
        let mut c = self.config;
        c.topic = c.topic.trim().to_string();
        let topic = c.topic.as_str();
        if topic.is_empty() {
            return Err(CarouselError::InvalidConfig("Topic is required".into()));
        }
        let chars = topic.chars().count();
        if chars > MAX_TOPIC_CHARS {
            return Err(CarouselError::InvalidConfig(format!(
                "Topic too long (max {MAX_TOPIC_CHARS} chars, got {chars})"
            )));
        }
        let (min, max) = (c.template.min_slides(), c.template.max_slides());
        if c.slide_count < min || c.slide_count > max {
            return Err(CarouselError::InvalidConfig(format!(
                "Template '{}' needs {}–{} slides, got {}",
                c.template, min, max, c.slide_count
            )));
        }
        Ok(c)
    }
}

/// The generator-facing settings shared by every run variant.
#[derive(Clone, Default)]
pub struct RunOptions {
    pub resolution: Resolution,
    pub pricing: PricingTable,
    pub bundle_pdf: bool,
    pub progress_callback: Option<ProgressCallback>,
}

impl RunOptions {
    /// Price of one generated image at the configured resolution, in cents.
    pub fn unit_cost_cents(&self) -> u64 {
        self.pricing.unit_cents(self.resolution)
    }
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("resolution", &self.resolution)
            .field("pricing", &self.pricing)
            .field("bundle_pdf", &self.bundle_pdf)
            .finish()
    }
}

// ── Image service connection ─────────────────────────────────────────────

/// Connection settings for the fal.ai image service.
#[derive(Clone)]
pub struct FalConfig {
    /// Value sent as `Authorization: Key <api_key>`.
    pub api_key: String,
    /// Default: `https://fal.run`.
    pub base_url: String,
    /// Model path for text-to-image requests.
    pub text_to_image_model: String,
    /// Model path for image-to-image (edit) requests.
    pub edit_model: String,
    /// Per-request timeout in seconds. Default: 120. Requests are never retried.
    pub timeout_secs: u64,
}

impl FalConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://fal.run";
    pub const TEXT_TO_IMAGE_MODEL: &'static str = "fal-ai/nano-banana-pro";
    pub const EDIT_MODEL: &'static str = "fal-ai/nano-banana-pro/edit";

    /// Config with the given key and all other settings at their defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            text_to_image_model: Self::TEXT_TO_IMAGE_MODEL.to_string(),
            edit_model: Self::EDIT_MODEL.to_string(),
            timeout_secs: 120,
        }
    }

    /// Read the key from `FAL_KEY` (falling back to `FALAI_KEY`) and an
    /// optional `FAL_BASE_URL` override.
    ///
    /// Fails with [`CarouselError::MissingApiKey`] before anything touches
    /// the network.
    pub fn from_env() -> Result<Self, CarouselError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// [`FalConfig::from_env`] over an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, CarouselError> {
        let key = ["FAL_KEY", "FALAI_KEY"]
            .iter()
            .filter_map(|var| get(*var))
            .find(|v| !v.trim().is_empty())
            .ok_or(CarouselError::MissingApiKey)?;

        let mut config = Self::new(key.trim());
        if let Some(url) = get("FAL_BASE_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        Ok(config)
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl fmt::Debug for FalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FalConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("text_to_image_model", &self.text_to_image_model)
            .field("edit_model", &self.edit_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Social platform the carousel is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// 1080×1080 square.
    #[default]
    LinkedIn,
    /// 1080×1350 portrait (4:5).
    Instagram,
}

impl Platform {
    pub fn width(self) -> u32 {
        1080
    }

    pub fn height(self) -> u32 {
        match self {
            Platform::LinkedIn => 1080,
            Platform::Instagram => 1350,
        }
    }

    pub fn aspect_ratio(self) -> AspectRatio {
        match self {
            Platform::LinkedIn => AspectRatio::Square,
            Platform::Instagram => AspectRatio::Portrait4x5,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn (1080x1080 square)",
            Platform::Instagram => "Instagram (1080x1350, 4:5)",
        }
    }
}

/// Colour scheme requested for a whole carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Navy background on every slide.
    #[default]
    Dark,
    /// White background on every slide.
    Light,
    /// Alternate by index parity; first and last slide stay dark.
    Mixed,
}

/// Slide structure template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    /// Hook, numbered content points, CTA.
    #[default]
    HookContentCta,
    /// "Top N" list with large numbered items.
    Listicle,
    /// Step-by-step framework with "step i/N" progression.
    StoryFramework,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::HookContentCta,
        TemplateKind::Listicle,
        TemplateKind::StoryFramework,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::HookContentCta => "hook-content-cta",
            TemplateKind::Listicle => "listicle",
            TemplateKind::StoryFramework => "story-framework",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateKind::HookContentCta => "Hook -> Content -> CTA (classic attention-grabbing)",
            TemplateKind::Listicle => "Listicle (Top 5/10 numbered lists)",
            TemplateKind::StoryFramework => "Story/Framework (step-by-step concept)",
        }
    }

    pub fn min_slides(self) -> usize {
        match self {
            TemplateKind::HookContentCta => 3,
            TemplateKind::Listicle | TemplateKind::StoryFramework => 4,
        }
    }

    pub fn max_slides(self) -> usize {
        match self {
            TemplateKind::HookContentCta | TemplateKind::StoryFramework => 10,
            TemplateKind::Listicle => 12,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution tier of a generated image. Also the key of the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1K")]
    OneK,
    #[default]
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::OneK, Resolution::TwoK, Resolution::FourK];

    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::OneK => "1K",
            Resolution::TwoK => "2K",
            Resolution::FourK => "4K",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| invalid_choice("resolution", s, &Resolution::ALL.map(Resolution::as_str)))
    }
}

/// Raster format requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Webp];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| invalid_choice("outputFormat", s, &OutputFormat::ALL.map(OutputFormat::as_str)))
    }
}

/// Aspect ratios accepted by the image service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "21:9")]
    Ultrawide21x9,
    #[serde(rename = "16:9")]
    Wide16x9,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "5:4")]
    Landscape5x4,
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:5")]
    Portrait4x5,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "2:3")]
    Portrait2x3,
    #[serde(rename = "9:16")]
    Tall9x16,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 10] = [
        AspectRatio::Ultrawide21x9,
        AspectRatio::Wide16x9,
        AspectRatio::Landscape3x2,
        AspectRatio::Landscape4x3,
        AspectRatio::Landscape5x4,
        AspectRatio::Square,
        AspectRatio::Portrait4x5,
        AspectRatio::Portrait3x4,
        AspectRatio::Portrait2x3,
        AspectRatio::Tall9x16,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Ultrawide21x9 => "21:9",
            AspectRatio::Wide16x9 => "16:9",
            AspectRatio::Landscape3x2 => "3:2",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Landscape5x4 => "5:4",
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait4x5 => "4:5",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Portrait2x3 => "2:3",
            AspectRatio::Tall9x16 => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| invalid_choice("aspectRatio", s, &AspectRatio::ALL.map(AspectRatio::as_str)))
    }
}

fn invalid_choice(field: &str, got: &str, valid: &[&str]) -> CarouselError {
    CarouselError::InvalidConfig(format!(
        "Invalid {field} '{got}'. Must be one of: {}",
        valid.join(", ")
    ))
}

// ── Pricing ──────────────────────────────────────────────────────────────

/// Fixed per-image prices by resolution tier, in US cents.
///
/// Integer cents keep the running total exact: N slides always cost
/// exactly `N × unit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTable {
    pub one_k_cents: u64,
    pub two_k_cents: u64,
    pub four_k_cents: u64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            one_k_cents: 15,
            two_k_cents: 30,
            four_k_cents: 60,
        }
    }
}

impl PricingTable {
    pub fn unit_cents(&self, resolution: Resolution) -> u64 {
        match resolution {
            Resolution::OneK => self.one_k_cents,
            Resolution::TwoK => self.two_k_cents,
            Resolution::FourK => self.four_k_cents,
        }
    }
}

/// Format a cent amount as `$1.23`.
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

// ── Brand ────────────────────────────────────────────────────────────────

/// Fixed copy on the closing CTA slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub name: String,
    pub tagline: String,
    pub handle: String,
    /// Extra line used by templates that close with a teaser.
    pub cta_body: String,
}

impl Default for BrandProfile {
    fn default() -> Self {
        Self {
            name: "WERNER STRAUCH.".into(),
            tagline: "Der Stille Stratege".into(),
            handle: "@wernerstrauch".into(),
            cta_body: "Mehr Frameworks und Strategien".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        let err = FalConfig::from_lookup(vars(&[])).unwrap_err();
        assert!(matches!(err, CarouselError::MissingApiKey));

        let err = FalConfig::from_lookup(vars(&[("FAL_KEY", "  "), ("FALAI_KEY", "")])).unwrap_err();
        assert!(matches!(err, CarouselError::MissingApiKey));
    }

    #[test]
    fn blank_fal_key_falls_back_to_falai_key() {
        let config = FalConfig::from_lookup(vars(&[("FAL_KEY", ""), ("FALAI_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.base_url, FalConfig::DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_override_drops_trailing_slashes() {
        let config =
            FalConfig::from_lookup(vars(&[("FAL_KEY", " abc "), ("FAL_BASE_URL", "http://localhost:8080//")])).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn builder_trims_topic() {
        let config = CarouselConfig::builder().topic("  Preisfehler  ").build().unwrap();
        assert_eq!(config.topic, "Preisfehler");
    }

    #[test]
    fn builder_rejects_empty_topic() {
        let err = CarouselConfig::builder().topic("   ").build().unwrap_err();
        assert!(err.to_string().contains("Topic is required"));
    }

    #[test]
    fn builder_rejects_long_topic() {
        let err = CarouselConfig::builder()
            .topic("x".repeat(201))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max 200"));
    }

    #[test]
    fn builder_enforces_template_range() {
        let err = CarouselConfig::builder()
            .topic("Pricing")
            .template(TemplateKind::Listicle)
            .slide_count(3)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("4–12"), "got: {err}");

        assert!(CarouselConfig::builder()
            .topic("Pricing")
            .template(TemplateKind::Listicle)
            .slide_count(12)
            .build()
            .is_ok());
    }

    #[test]
    fn aspect_ratio_lists_valid_set() {
        let err = "5:3".parse::<AspectRatio>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("5:3"));
        assert!(msg.contains("21:9, 16:9, 3:2, 4:3, 5:4, 1:1, 4:5, 3:4, 2:3, 9:16"), "got: {msg}");
    }

    #[test]
    fn resolution_and_format_parse() {
        assert_eq!("2k".parse::<Resolution>().unwrap(), Resolution::TwoK);
        assert_eq!("webp".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert!("8K".parse::<Resolution>().is_err());
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn serde_names_match_wire_format() {
        assert_eq!(serde_json::to_string(&Resolution::FourK).unwrap(), "\"4K\"");
        assert_eq!(serde_json::to_string(&AspectRatio::Portrait4x5).unwrap(), "\"4:5\"");
        assert_eq!(
            serde_json::to_string(&TemplateKind::HookContentCta).unwrap(),
            "\"hook-content-cta\""
        );
        assert_eq!(serde_json::to_string(&Platform::LinkedIn).unwrap(), "\"linkedin\"");
    }

    #[test]
    fn platform_dimensions() {
        assert_eq!(Platform::Instagram.height(), 1350);
        assert_eq!(Platform::Instagram.aspect_ratio().as_str(), "4:5");
        assert_eq!(Platform::LinkedIn.aspect_ratio().as_str(), "1:1");
    }

    #[test]
    fn default_pricing_and_formatting() {
        let p = PricingTable::default();
        assert_eq!(p.unit_cents(Resolution::TwoK), 30);
        assert_eq!(format_cents(7 * 30), "$2.10");
        assert_eq!(format_cents(5), "$0.05");
    }

    #[test]
    fn fal_config_debug_redacts_key() {
        let c = FalConfig::new("secret-key");
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret-key"));
        assert_eq!(c.timeout_secs, 120);
    }
}
