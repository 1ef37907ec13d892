//! Output types returned by the generator, plus the `content.json` snapshot.

use crate::config::{CarouselConfig, ColorMode, Platform, Resolution, TemplateKind};
use crate::error::CarouselError;
use crate::pipeline::image::write_atomic;
use crate::plan::{build_plan, SlideSpec, SlideType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the content snapshot inside a run directory.
pub const CONTENT_FILE: &str = "content.json";

/// Name of the bundled PDF inside a run directory.
pub const PDF_FILE: &str = "carousel.pdf";

/// One slide that was generated, downloaded and saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSlide {
    /// 0-based position in the carousel.
    pub index: usize,
    /// e.g. `03-listicle-item.png`
    pub filename: String,
    pub path: PathBuf,
    pub slide_type: SlideType,
}

/// Result of a completed carousel run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselResult {
    /// Slides in index order.
    pub slides: Vec<GeneratedSlide>,
    /// `None` when bundling was disabled.
    pub pdf_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Sum of the unit prices of every generated slide.
    pub total_cost_cents: u64,
}

impl CarouselResult {
    /// Total cost in US dollars.
    pub fn total_cost(&self) -> f64 {
        self.total_cost_cents as f64 / 100.0
    }

    pub fn slide_paths(&self) -> Vec<PathBuf> {
        self.slides.iter().map(|s| s.path.clone()).collect()
    }
}

/// Everything needed to (re)generate a carousel's slides.
///
/// Written as `content.json` before the first generation request, so that a
/// failed or unsatisfying run can be resumed slide by slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselContent {
    pub topic: String,
    #[serde(default)]
    pub thoughts: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<ColorMode>,
    #[serde(default)]
    pub resolution: Resolution,
    pub slides: Vec<SlideSpec>,
}

impl CarouselContent {
    /// Plan the slides for a validated configuration.
    pub fn from_config(config: &CarouselConfig) -> Self {
        let slides = build_plan(
            config.template,
            &config.topic,
            &config.thoughts,
            config.slide_count,
            config.color_mode,
            &config.brand,
        );
        Self {
            topic: config.topic.trim().to_string(),
            thoughts: config.thoughts.clone(),
            platform: config.platform,
            template: Some(config.template),
            color_mode: Some(config.color_mode),
            resolution: config.resolution,
            slides,
        }
    }

    /// `thoughts` as an optional prompt context.
    pub fn context(&self) -> Option<&str> {
        let t = self.thoughts.trim();
        (!t.is_empty()).then_some(t)
    }

    /// Parse a content file, checking that slide indices are `0..n` in order.
    pub async fn load(path: &Path) -> Result<Self, CarouselError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CarouselError::ContentReadFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        let content: CarouselContent =
            serde_json::from_str(&raw).map_err(|e| CarouselError::ContentReadFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        content.check_indices().map_err(|detail| CarouselError::ContentReadFailed {
            path: path.to_path_buf(),
            detail,
        })?;
        Ok(content)
    }

    /// Write pretty-printed JSON to `path` atomically.
    pub async fn save(&self, path: &Path) -> Result<(), CarouselError> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| CarouselError::Internal(format!("serialize content: {e}")))?;
        write_atomic(path, &json).await
    }

    /// Slides must be non-empty with indices `0..n` in order.
    pub(crate) fn check_indices(&self) -> Result<(), String> {
        if self.slides.is_empty() {
            return Err("content has no slides".into());
        }
        for (i, s) in self.slides.iter().enumerate() {
            if s.index != i {
                return Err(format!("slide at position {i} has index {}", s.index));
            }
        }
        Ok(())
    }
}
