//! Standalone still-image generation: one prompt, one to four images.
//!
//! Inputs arrive as raw strings (the same shape as the `fal-image` flags) and
//! are validated against the service's enumerated sets before anything is
//! sent.

use crate::config::{AspectRatio, OutputFormat, Resolution};
use crate::error::CarouselError;
use crate::pipeline::fal::{GenerationRequest, ImageBackend};
use crate::pipeline::image::write_atomic;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MAX_IMAGES: u32 = 4;

/// Unvalidated request for one or more still images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImageRequest {
    pub prompt: String,
    /// Target path. With more than one image, `_1`, `_2`, … are inserted
    /// before the extension.
    pub output: PathBuf,
    pub aspect_ratio: String,
    pub resolution: String,
    pub output_format: String,
    pub num_images: u32,
}

impl Default for StillImageRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            output: PathBuf::from("generated_image.png"),
            aspect_ratio: "1:1".into(),
            resolution: "1K".into(),
            output_format: "png".into(),
            num_images: 1,
        }
    }
}

/// A request whose enumerated fields have been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStill {
    pub prompt: String,
    pub output: PathBuf,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub output_format: OutputFormat,
    pub num_images: u8,
}

impl StillImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Check every field against its allowed set.
    pub fn validate(&self) -> Result<ValidatedStill, CarouselError> {
        if self.prompt.trim().is_empty() {
            return Err(CarouselError::InvalidConfig("prompt is required".into()));
        }
        let aspect_ratio: AspectRatio = self.aspect_ratio.parse()?;
        let resolution: Resolution = self.resolution.parse()?;
        let output_format: OutputFormat = self.output_format.parse()?;
        if !(1..=MAX_IMAGES).contains(&self.num_images) {
            return Err(CarouselError::InvalidConfig(format!(
                "numImages must be between 1 and {MAX_IMAGES}, got {}",
                self.num_images
            )));
        }
        Ok(ValidatedStill {
            prompt: self.prompt.clone(),
            output: self.output.clone(),
            aspect_ratio,
            resolution,
            output_format,
            num_images: self.num_images as u8,
        })
    }
}

/// What a still-image run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImageOutcome {
    pub images: Vec<PathBuf>,
    pub description: Option<String>,
}

/// Path of image `i` (0-based) out of `n` for the requested `output`.
pub fn numbered_output(output: &Path, i: usize, n: usize) -> PathBuf {
    if n <= 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!("{stem}_{}.{}", i + 1, ext.to_string_lossy()),
        None => format!("{stem}_{}", i + 1),
    };
    output.with_file_name(name)
}

/// Validate, generate and save the requested images.
///
/// Validation failures return before the backend is called.
pub async fn generate_still(
    backend: &dyn ImageBackend,
    request: &StillImageRequest,
) -> Result<StillImageOutcome, CarouselError> {
    let req = request.validate()?;
    info!(
        "Generating {} image(s) ({}, {}, {})",
        req.num_images, req.aspect_ratio, req.resolution, req.output_format
    );

    let generation = GenerationRequest::text_to_image(req.prompt.clone(), req.aspect_ratio, req.resolution)
        .output_format(req.output_format)
        .num_images(req.num_images);
    let response = backend.generate(&generation).await?;

    let n = req.num_images as usize;
    let mut images = Vec::with_capacity(response.images.len());
    for (i, image) in response.images.iter().enumerate() {
        if image.url.is_empty() {
            continue;
        }
        let bytes = backend.fetch(&image.url).await?;
        let path = numbered_output(&req.output, i, n);
        write_atomic(&path, &bytes).await?;
        debug!("Saved {}", path.display());
        images.push(path);
    }

    Ok(StillImageOutcome {
        images,
        description: response.description.filter(|d| !d.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let v = StillImageRequest::new("A sunset").validate().unwrap();
        assert_eq!(v.aspect_ratio, AspectRatio::Square);
        assert_eq!(v.resolution, Resolution::OneK);
        assert_eq!(v.output_format, OutputFormat::Png);
        assert_eq!(v.num_images, 1);
    }

    #[test]
    fn invalid_fields_list_valid_sets() {
        let mut r = StillImageRequest::new("x");
        r.aspect_ratio = "5:3".into();
        let msg = r.validate().unwrap_err().to_string();
        assert!(msg.contains("21:9, 16:9"), "got: {msg}");

        let mut r = StillImageRequest::new("x");
        r.resolution = "8K".into();
        assert!(r.validate().unwrap_err().to_string().contains("1K, 2K, 4K"));

        let mut r = StillImageRequest::new("x");
        r.output_format = "gif".into();
        assert!(r.validate().unwrap_err().to_string().contains("png, jpeg, webp"));
    }

    #[test]
    fn image_count_is_bounded() {
        for n in [0, 5] {
            let mut r = StillImageRequest::new("x");
            r.num_images = n;
            assert!(r.validate().is_err(), "n={n}");
        }
        let mut r = StillImageRequest::new("x");
        r.num_images = 4;
        assert!(r.validate().is_ok());
    }

    #[test]
    fn blank_prompt_rejected() {
        assert!(StillImageRequest::new("  ").validate().is_err());
    }

    #[test]
    fn numbered_paths() {
        let out = Path::new("out/art.png");
        assert_eq!(numbered_output(out, 0, 1), PathBuf::from("out/art.png"));
        assert_eq!(numbered_output(out, 0, 3), PathBuf::from("out/art_1.png"));
        assert_eq!(numbered_output(out, 2, 3), PathBuf::from("out/art_3.png"));
        assert_eq!(numbered_output(Path::new("art"), 1, 2), PathBuf::from("art_2"));
    }
}
