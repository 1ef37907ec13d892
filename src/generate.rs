//! Sequential carousel generation.
//!
//! Slides are generated strictly one after another. Every slide after the
//! first is sent to the edit endpoint with the previous slide's downloaded
//! bytes as its reference image, which is what keeps fonts, colours and
//! spacing consistent across the carousel. That data dependency is also why
//! there is no concurrency and no partial success here: if slide *i* fails,
//! slide *i+1* has nothing to match, so the run stops.
//!
//! ```text
//! content.json ──▶ slide 0 (text-to-image) ──▶ 01-hook.png ─┐
//!                                                            │ reference
//!                  slide 1 (edit) ◀─────────────────────────┘
//!                    └──▶ 02-content.png ──▶ … ──▶ carousel.pdf
//! ```

use crate::config::{CarouselConfig, PricingTable, Resolution, RunOptions};
use crate::error::CarouselError;
use crate::output::{CarouselContent, CarouselResult, GeneratedSlide, CONTENT_FILE, PDF_FILE};
use crate::pipeline::fal::{GenerationRequest, ImageBackend};
use crate::pipeline::image::{ensure_dir, slide_filename, write_atomic, ReferenceImage};
use crate::pipeline::pdf::bundle_to_pdf;
use crate::plan::SlideSpec;
use crate::prompts::{build_edit_prompt, build_slide_prompt, with_feedback};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ── Sequence state ───────────────────────────────────────────────────────

/// Where a run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The slide with this index is next.
    Pending(usize),
    /// Every slide has been saved.
    Done,
    /// The slide with this index failed; nothing after it was attempted.
    Failed(usize),
}

/// Accumulator threaded through the run loop.
#[derive(Debug)]
pub struct SequenceState {
    total: usize,
    next_index: usize,
    previous_image: Option<ReferenceImage>,
    slides: Vec<GeneratedSlide>,
    total_cost_cents: u64,
    failed_at: Option<usize>,
}

impl SequenceState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            next_index: 0,
            previous_image: None,
            slides: Vec::with_capacity(total),
            total_cost_cents: 0,
            failed_at: None,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self.failed_at {
            Some(i) => RunStatus::Failed(i),
            None if self.next_index < self.total => RunStatus::Pending(self.next_index),
            None => RunStatus::Done,
        }
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Reference for the next slide: the last saved slide's bytes.
    pub fn previous_image(&self) -> Option<&ReferenceImage> {
        self.previous_image.as_ref()
    }

    pub fn slides(&self) -> &[GeneratedSlide] {
        &self.slides
    }

    pub fn total_cost_cents(&self) -> u64 {
        self.total_cost_cents
    }

    /// Record a saved slide and make its bytes the next reference.
    pub fn advance(&mut self, slide: GeneratedSlide, image: ReferenceImage, cost_cents: u64) {
        debug_assert_eq!(slide.index, self.next_index);
        self.slides.push(slide);
        self.previous_image = Some(image);
        self.total_cost_cents += cost_cents;
        self.next_index += 1;
    }

    pub fn fail(&mut self) {
        self.failed_at = Some(self.next_index);
    }

    fn finish(self, output_dir: PathBuf, pdf_path: Option<PathBuf>) -> CarouselResult {
        CarouselResult {
            slides: self.slides,
            pdf_path,
            output_dir,
            total_cost_cents: self.total_cost_cents,
        }
    }
}

// ── Entry points ─────────────────────────────────────────────────────────

/// Plan and generate a carousel from a validated configuration.
///
/// `output_dir` is the run directory itself; see
/// [`crate::pipeline::image::create_output_dir`] for the dated naming scheme.
pub async fn generate_carousel(
    backend: &dyn ImageBackend,
    config: &CarouselConfig,
    output_dir: &Path,
) -> Result<CarouselResult, CarouselError> {
    let content = CarouselContent::from_config(config);
    info!(
        "Planned {} slides ({}, {}) for '{}'",
        content.slides.len(),
        config.template,
        config.platform.display_name(),
        content.topic
    );
    generate_from_content(backend, &content, &config.run_options(), output_dir).await
}

/// Generate every slide of pre-authored content, in order.
///
/// Writes `content.json` first, then one PNG per slide, then (optionally)
/// `carousel.pdf`. The first failing slide aborts the run; files already
/// written are left in place.
///
/// # Errors
/// * [`CarouselError::NoImagesReturned`] when the service returns no image
/// * [`CarouselError::SlideGenerationFailed`] wrapping any other failure
pub async fn generate_from_content(
    backend: &dyn ImageBackend,
    content: &CarouselContent,
    options: &RunOptions,
    output_dir: &Path,
) -> Result<CarouselResult, CarouselError> {
    content.check_indices().map_err(CarouselError::InvalidConfig)?;
    let total = content.slides.len();
    let unit_cost = options.unit_cost_cents();
    let cb = options.progress_callback.as_ref();

    ensure_dir(output_dir).await?;
    content.save(&output_dir.join(CONTENT_FILE)).await?;
    info!("Output directory: {}", output_dir.display());

    if let Some(cb) = cb {
        cb.on_run_start(total);
    }

    let mut state = SequenceState::new(total);
    for slide in &content.slides {
        let index = state.next_index();
        if let Some(cb) = cb {
            cb.on_slide_start(index, total, slide.slide_type().as_str());
        }
        info!("Slide {}/{}: {}", index + 1, total, slide.slide_type());

        let result = generate_one(
            backend,
            content,
            slide,
            state.previous_image(),
            options.resolution,
            None,
            output_dir,
        )
        .await;

        match result {
            Ok((generated, image)) => {
                if let Some(cb) = cb {
                    cb.on_slide_complete(index, total, &generated.filename);
                }
                state.advance(generated, image, unit_cost);
            }
            Err(e) => {
                let e = e.at_slide(index);
                state.fail();
                warn!("Aborting carousel: {}", e);
                if let Some(cb) = cb {
                    cb.on_slide_error(index, total, &e.to_string());
                }
                return Err(e);
            }
        }
    }
    debug_assert_eq!(state.status(), RunStatus::Done);

    let pdf_path = if options.bundle_pdf {
        let paths: Vec<PathBuf> = state.slides().iter().map(|s| s.path.clone()).collect();
        let pdf = bundle_to_pdf(&paths, &output_dir.join(PDF_FILE)).await?;
        if let Some(cb) = cb {
            cb.on_bundle_complete(&pdf);
        }
        Some(pdf)
    } else {
        None
    };

    if let Some(cb) = cb {
        cb.on_run_complete(total, state.total_cost_cents());
    }
    info!(
        "Generated {} slides, cost {}",
        total,
        crate::config::format_cents(state.total_cost_cents())
    );
    Ok(state.finish(output_dir.to_path_buf(), pdf_path))
}

/// Regenerate one slide, overwriting its file.
///
/// With `previous_image` the slide is generated through the edit endpoint
/// against that file; without it, as a fresh text-to-image slide. The PDF is
/// not rebuilt and no cost is accumulated.
pub async fn regenerate_slide(
    backend: &dyn ImageBackend,
    content: &CarouselContent,
    options: &RunOptions,
    index: usize,
    previous_image: Option<&Path>,
    feedback: Option<&str>,
    output_dir: &Path,
) -> Result<GeneratedSlide, CarouselError> {
    let total = content.slides.len();
    let slide = content
        .slides
        .get(index)
        .ok_or(CarouselError::SlideOutOfRange { index, total })?;

    let reference = match previous_image {
        Some(path) => Some(ReferenceImage::read(path).await?),
        None => None,
    };

    let cb = options.progress_callback.as_ref();
    if let Some(cb) = cb {
        cb.on_slide_start(index, total, slide.slide_type().as_str());
    }
    info!(
        "Regenerating slide {}/{} ({}){}",
        index + 1,
        total,
        slide.slide_type(),
        if reference.is_some() { " with reference" } else { "" }
    );

    match generate_one(
        backend,
        content,
        slide,
        reference.as_ref(),
        options.resolution,
        feedback,
        output_dir,
    )
    .await
    {
        Ok((generated, _)) => {
            if let Some(cb) = cb {
                cb.on_slide_complete(index, total, &generated.filename);
            }
            Ok(generated)
        }
        Err(e) => {
            let e = e.at_slide(index);
            if let Some(cb) = cb {
                cb.on_slide_error(index, total, &e.to_string());
            }
            Err(e)
        }
    }
}

/// The saved file of the slide before `index` in `dir`, if it exists.
pub fn previous_slide_path(content: &CarouselContent, index: usize, dir: &Path) -> Option<PathBuf> {
    let prev = content.slides.get(index.checked_sub(1)?)?;
    let path = dir.join(slide_filename(prev.index, prev.slide_type()));
    path.is_file().then_some(path)
}

/// Cost of generating `slide_count` images at `resolution`, in cents.
pub fn estimate_cost(slide_count: usize, resolution: Resolution, pricing: &PricingTable) -> u64 {
    slide_count as u64 * pricing.unit_cents(resolution)
}

// ── One slide ────────────────────────────────────────────────────────────

async fn generate_one(
    backend: &dyn ImageBackend,
    content: &CarouselContent,
    slide: &SlideSpec,
    previous: Option<&ReferenceImage>,
    resolution: Resolution,
    feedback: Option<&str>,
    output_dir: &Path,
) -> Result<(GeneratedSlide, ReferenceImage), CarouselError> {
    let aspect = content.platform.aspect_ratio();
    let request = match previous {
        None => {
            let prompt = build_slide_prompt(slide, content.platform, true, &content.topic, content.context());
            GenerationRequest::text_to_image(with_feedback(prompt, feedback), aspect, resolution)
                .limit_generations(true)
        }
        Some(reference) => {
            let prompt = build_edit_prompt(slide, content.platform, &content.topic, content.context());
            GenerationRequest::image_edit(
                with_feedback(prompt, feedback),
                reference.data_uri.clone(),
                aspect,
                resolution,
            )
        }
    };
    debug!("Slide {} via {:?}", slide.index + 1, request.endpoint());

    let response = backend.generate(&request).await?;
    let first = response
        .images
        .first()
        .ok_or(CarouselError::NoImagesReturned { index: slide.index })?;
    let bytes = backend.fetch(&first.url).await?;

    let filename = slide_filename(slide.index, slide.slide_type());
    let path = output_dir.join(&filename);
    write_atomic(&path, &bytes).await?;

    let generated = GeneratedSlide {
        index: slide.index,
        filename,
        path,
        slide_type: slide.slide_type(),
    };
    Ok((generated, ReferenceImage::from_bytes(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SlideType;

    fn saved(index: usize) -> GeneratedSlide {
        GeneratedSlide {
            index,
            filename: format!("{:02}-content.png", index + 1),
            path: PathBuf::from(format!("{:02}-content.png", index + 1)),
            slide_type: SlideType::Content,
        }
    }

    #[test]
    fn state_advances_and_accumulates_cost() {
        let mut state = SequenceState::new(3);
        assert_eq!(state.status(), RunStatus::Pending(0));
        assert!(state.previous_image().is_none());

        state.advance(saved(0), ReferenceImage::from_bytes(vec![1]), 30);
        assert_eq!(state.status(), RunStatus::Pending(1));
        assert_eq!(state.previous_image().unwrap().bytes, vec![1]);

        state.advance(saved(1), ReferenceImage::from_bytes(vec![2]), 30);
        state.advance(saved(2), ReferenceImage::from_bytes(vec![3]), 30);
        assert_eq!(state.status(), RunStatus::Done);
        assert_eq!(state.total_cost_cents(), 90);
        assert_eq!(state.slides().len(), 3);
    }

    #[test]
    fn failure_names_the_pending_index() {
        let mut state = SequenceState::new(5);
        state.advance(saved(0), ReferenceImage::from_bytes(vec![1]), 15);
        state.advance(saved(1), ReferenceImage::from_bytes(vec![2]), 15);
        state.fail();
        assert_eq!(state.status(), RunStatus::Failed(2));
    }

    #[test]
    fn cost_estimate_is_exact() {
        let pricing = PricingTable::default();
        assert_eq!(estimate_cost(7, Resolution::TwoK, &pricing), 210);
        assert_eq!(estimate_cost(12, Resolution::FourK, &pricing), 720);
        assert_eq!(estimate_cost(3, Resolution::OneK, &pricing), 45);
    }

    #[test]
    fn regenerate_rejects_out_of_range_index() {
        struct Unreachable;

        #[async_trait::async_trait]
        impl ImageBackend for Unreachable {
            async fn generate(
                &self,
                _request: &GenerationRequest,
            ) -> Result<crate::pipeline::fal::GenerationResponse, CarouselError> {
                panic!("backend must not be called");
            }
            async fn fetch(&self, _url: &str) -> Result<Vec<u8>, CarouselError> {
                panic!("backend must not be called");
            }
        }

        let config = CarouselConfig::builder().topic("T").slide_count(3).build().unwrap();
        let content = CarouselContent::from_config(&config);
        let dir = tempfile::tempdir().unwrap();
        let err = tokio_test::block_on(regenerate_slide(
            &Unreachable,
            &content,
            &RunOptions::default(),
            3,
            None,
            None,
            dir.path(),
        ))
        .unwrap_err();
        assert!(matches!(err, CarouselError::SlideOutOfRange { index: 3, total: 3 }));
    }

    #[test]
    fn previous_slide_path_requires_existing_file() {
        let config = CarouselConfig::builder().topic("T").slide_count(3).build().unwrap();
        let content = CarouselContent::from_config(&config);
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(previous_slide_path(&content, 0, dir.path()), None);
        assert_eq!(previous_slide_path(&content, 1, dir.path()), None);

        std::fs::write(dir.path().join("01-hook.png"), b"x").unwrap();
        assert_eq!(
            previous_slide_path(&content, 1, dir.path()),
            Some(dir.path().join("01-hook.png"))
        );
    }
}
