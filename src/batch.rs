//! Batch still-image generation with a resumable manifest.
//!
//! Unlike the carousel, batch prompts are independent of each other: a
//! failed prompt is logged and the batch moves on. Images already present
//! on disk are skipped, which makes re-running a partially failed batch
//! cheap. Every run rewrites `images-manifest.json`.

use crate::config::{AspectRatio, OutputFormat, Resolution};
use crate::error::CarouselError;
use crate::pipeline::fal::{GenerationRequest, ImageBackend};
use crate::pipeline::image::{ensure_dir, write_atomic};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const MANIFEST_FILE: &str = "images-manifest.json";

/// `generatedAt` recorded for a skipped image with no earlier manifest entry.
pub const PREVIOUSLY_GENERATED: &str = "previously generated";

/// One named prompt. The image is saved as `{name}.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPrompt {
    pub name: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl BatchPrompt {
    pub fn filename(&self) -> String {
        format!("{}.png", self.name)
    }
}

/// Load a JSON array of [`BatchPrompt`]s.
pub async fn load_prompts(path: &Path) -> Result<Vec<BatchPrompt>, CarouselError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CarouselError::ContentReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    serde_json::from_str(&raw).map_err(|e| CarouselError::ContentReadFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Fixed generation parameters, recorded with every manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchParameters {
    pub model: String,
    pub aspect_ratio: AspectRatio,
    pub num_images: u8,
    pub output_format: OutputFormat,
    pub resolution: Resolution,
}

impl Default for BatchParameters {
    fn default() -> Self {
        Self {
            model: "fal-ai/nano-banana-pro".into(),
            aspect_ratio: AspectRatio::Portrait3x4,
            num_images: 1,
            output_format: OutputFormat::Png,
            resolution: Resolution::OneK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub name: String,
    pub filename: String,
    pub prompt: String,
    pub parameters: BatchParameters,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Contents of `images-manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesManifest {
    pub generated_at: String,
    pub output_dir: PathBuf,
    pub total_images: usize,
    pub skipped_images: usize,
    pub newly_generated: usize,
    pub images: Vec<ManifestEntry>,
}

impl ImagesManifest {
    /// Read an existing manifest; `None` if it is missing or unreadable.
    pub async fn load(path: &Path) -> Option<Self> {
        let raw = tokio::fs::read_to_string(path).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!("Ignoring unreadable manifest {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// A prompt that could not be turned into an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of [`run_batch`].
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub manifest: ImagesManifest,
    pub manifest_path: PathBuf,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generate every prompt into `output_dir`, skipping existing images.
///
/// Per-prompt failures are collected in the report, not returned. Only a
/// failure to create the directory or write the manifest is an error.
pub async fn run_batch(
    backend: &dyn ImageBackend,
    prompts: &[BatchPrompt],
    output_dir: &Path,
) -> Result<BatchReport, CarouselError> {
    ensure_dir(output_dir).await?;
    let manifest_path = output_dir.join(MANIFEST_FILE);
    let params = BatchParameters::default();

    let mut previous: HashMap<String, ManifestEntry> = HashMap::new();
    if let Some(existing) = ImagesManifest::load(&manifest_path).await {
        info!("Found existing manifest with {} images", existing.images.len());
        previous.extend(existing.images.into_iter().map(|e| (e.name.clone(), e)));
    }

    let mut entries = Vec::with_capacity(prompts.len());
    let mut failures = Vec::new();
    let (mut skipped, mut generated) = (0usize, 0usize);

    for prompt in prompts {
        if let Err(reason) = check_name(&prompt.name) {
            warn!("Failed: {:?} - {}", prompt.name, reason);
            failures.push(BatchFailure {
                name: prompt.name.clone(),
                error: reason,
            });
            continue;
        }

        let path = output_dir.join(prompt.filename());
        if path.exists() {
            info!("Skipped: {} (already exists)", prompt.filename());
            skipped += 1;
            entries.push(previous.remove(&prompt.name).unwrap_or_else(|| ManifestEntry {
                name: prompt.name.clone(),
                filename: prompt.filename(),
                prompt: prompt.prompt.clone(),
                parameters: params.clone(),
                generated_at: PREVIOUSLY_GENERATED.into(),
                source_url: None,
            }));
            continue;
        }

        info!("Generating: {}", prompt.name);
        match generate_entry(backend, prompt, &params, &path).await {
            Ok(entry) => {
                info!("Saved: {}", entry.filename);
                generated += 1;
                entries.push(entry);
            }
            Err(e) => {
                warn!("Failed: {} - {}", prompt.name, e);
                failures.push(BatchFailure {
                    name: prompt.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let manifest = ImagesManifest {
        generated_at: now_iso(),
        output_dir: output_dir.to_path_buf(),
        total_images: entries.len(),
        skipped_images: skipped,
        newly_generated: generated,
        images: entries,
    };
    let json = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| CarouselError::Internal(format!("serialize manifest: {e}")))?;
    write_atomic(&manifest_path, &json).await?;

    Ok(BatchReport {
        manifest,
        manifest_path,
        failures,
    })
}

async fn generate_entry(
    backend: &dyn ImageBackend,
    prompt: &BatchPrompt,
    params: &BatchParameters,
    path: &Path,
) -> Result<ManifestEntry, CarouselError> {
    let request = GenerationRequest::text_to_image(prompt.prompt.clone(), params.aspect_ratio, params.resolution)
        .output_format(params.output_format)
        .num_images(params.num_images);
    let response = backend.generate(&request).await?;
    let url = response
        .images
        .first()
        .map(|img| img.url.clone())
        .ok_or_else(|| CarouselError::InvalidResponse {
            detail: format!("No image generated for {}", prompt.name),
        })?;
    let bytes = backend.fetch(&url).await?;
    write_atomic(path, &bytes).await?;

    Ok(ManifestEntry {
        name: prompt.name.clone(),
        filename: prompt.filename(),
        prompt: prompt.prompt.clone(),
        parameters: params.clone(),
        generated_at: now_iso(),
        source_url: Some(url),
    })
}

fn check_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name is empty".into());
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err("name must be a plain file name".into());
    }
    Ok(())
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_match_manifest_format() {
        let json = serde_json::to_value(BatchParameters::default()).unwrap();
        assert_eq!(json["model"], "fal-ai/nano-banana-pro");
        assert_eq!(json["aspect_ratio"], "3:4");
        assert_eq!(json["resolution"], "1K");
        assert_eq!(json["output_format"], "png");
        assert_eq!(json["num_images"], 1);
    }

    #[test]
    fn manifest_uses_camel_case_keys() {
        let m = ImagesManifest {
            generated_at: "2026-01-01T00:00:00.000Z".into(),
            output_dir: PathBuf::from("out"),
            total_images: 0,
            skipped_images: 0,
            newly_generated: 0,
            images: vec![],
        };
        let json = serde_json::to_value(&m).unwrap();
        for key in ["generatedAt", "outputDir", "totalImages", "skippedImages", "newlyGenerated"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn names_must_be_plain() {
        assert!(check_name("ar-hero").is_ok());
        assert!(check_name("").is_err());
        assert!(check_name("../escape").is_err());
        assert!(check_name("a\\b").is_err());
    }

    #[test]
    fn prompts_parse_with_optional_style() {
        let p: Vec<BatchPrompt> =
            serde_json::from_str(r#"[{"name":"a","prompt":"x"},{"name":"b","prompt":"y","style":"z"}]"#).unwrap();
        assert_eq!(p[0].filename(), "a.png");
        assert_eq!(p[1].style.as_deref(), Some("z"));
    }
}
