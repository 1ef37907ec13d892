//! Progress-callback trait for per-slide generation events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::CarouselConfigBuilder::progress_callback`] to receive
//! events as the sequential generator works through the carousel.
//!
//! # Example
//!
//! ```rust
//! use carousel_forge::{CarouselConfig, GenerationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl GenerationProgressCallback for CountingCallback {
//!     fn on_slide_complete(&self, index: usize, total: usize, filename: &str) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Slide {}/{} saved as {}", index + 1, total, filename);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = CarouselConfig::builder()
//!     .topic("Preisstrategie")
//!     .progress_callback(counter as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the generator as it processes each slide.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Slides are generated strictly in order, so events
/// for slide *i+1* never arrive before `on_slide_complete` for slide *i*.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called once before the first generation request.
    fn on_run_start(&self, total_slides: usize) {
        let _ = total_slides;
    }

    /// Called just before the generation request for a slide is sent.
    ///
    /// # Arguments
    /// * `index`      - 0-based slide index
    /// * `total`      - slides in the carousel
    /// * `slide_type` - kebab-case slide type, e.g. `"listicle-item"`
    fn on_slide_start(&self, index: usize, total: usize, slide_type: &str) {
        let _ = (index, total, slide_type);
    }

    /// Called after a slide's image has been downloaded and saved.
    fn on_slide_complete(&self, index: usize, total: usize, filename: &str) {
        let _ = (index, total, filename);
    }

    /// Called when a slide fails. The run aborts right after this event.
    fn on_slide_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called after `carousel.pdf` has been written.
    fn on_bundle_complete(&self, pdf_path: &Path) {
        let _ = pdf_path;
    }

    /// Called once when every slide has been generated.
    ///
    /// # Arguments
    /// * `total_slides`     - slides generated
    /// * `total_cost_cents` - accumulated cost of the run
    fn on_run_complete(&self, total_slides: usize, total_cost_cents: u64) {
        let _ = (total_slides, total_cost_cents);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CarouselConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;
