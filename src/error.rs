//! Error types for the carousel-forge library.
//!
//! Every failure is fatal for the run that hit it. The sequential carousel
//! pipeline has a genuine data dependency between slides (slide *i* is the
//! visual reference for slide *i+1*), so a failed slide cannot be skipped the
//! way a page of an independent batch could. The variants group into:
//!
//! * **Configuration**: missing API key, invalid enumerated parameter.
//!   Always detected before any network call.
//! * **Transport**: non-2xx status, timeout, connection failure. Never
//!   retried.
//! * **Semantic**: a successful response that contains no image.
//! * **Bundling / I/O**: undecodable images, pdfium problems, write failures.
//!
//! The batch still-image generator ([`crate::batch`]) is the one caller that
//! logs and continues past per-item errors; it still uses this type to report
//! them.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the carousel-forge library.
#[derive(Debug, Error)]
pub enum CarouselError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// Neither `FAL_KEY` nor `FALAI_KEY` is set.
    #[error("FAL_KEY environment variable is required.\nSet it with: export FAL_KEY=\"your-api-key\"\nGet a key at: https://fal.ai/dashboard/keys")]
    MissingApiKey,

    /// A parameter is outside its enumerated set or range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Transport errors ──────────────────────────────────────────────────
    /// The image service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The request did not complete within the transport timeout.
    #[error("Request timeout after {secs}s for '{url}'")]
    RequestTimeout { url: String, secs: u64 },

    /// Connection-level failure (DNS, TLS, reset).
    #[error("Request to '{url}' failed: {reason}")]
    Transport { url: String, reason: String },

    /// The service answered 2xx but the body is not the expected JSON.
    #[error("Invalid response from image service: {detail}")]
    InvalidResponse { detail: String },

    /// A generated image URL could not be downloaded.
    #[error("Failed to download image '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    // ── Semantic errors ───────────────────────────────────────────────────
    /// The service reported success but returned an empty image list.
    #[error("No images returned for slide index {index} (slide {})", index + 1)]
    NoImagesReturned { index: usize },

    /// Generating one slide failed; the whole run is aborted.
    #[error("Slide index {index} (slide {}) failed: {source}", index + 1)]
    SlideGenerationFailed {
        index: usize,
        #[source]
        source: Box<CarouselError>,
    },

    /// The requested slide does not exist in the carousel content.
    #[error("Slide index {index} is out of range (carousel has {total} slides)")]
    SlideOutOfRange { index: usize, total: usize },

    // ── Bundling errors ───────────────────────────────────────────────────
    /// A file handed to the PDF bundler is not a decodable image.
    #[error("Cannot decode image '{path}': {detail}")]
    ImageDecode { path: PathBuf, detail: String },

    /// Directory bundling found nothing to bundle.
    #[error("No PNG/JPEG files found in '{dir}'")]
    NoImagesFound { dir: PathBuf },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Bundling slides into a PDF needs the pdfium shared library.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory), or\n\
  • place libpdfium next to the working directory, or\n\
  • install it system-wide.\n\
Prebuilt binaries: https://github.com/bblanchon/pdfium-binaries\n"
    )]
    PdfiumBindingFailed(String),

    /// pdfium rejected a document operation.
    #[error("PDF bundling failed: {0}")]
    PdfFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file or directory.
    #[error("Failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content snapshot, manifest or prompt file could not be read/parsed.
    #[error("Failed to read '{path}': {detail}")]
    ContentReadFailed { path: PathBuf, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CarouselError {
    /// Wrap an error as the terminal failure of slide `index`.
    ///
    /// Errors that already name their slide are returned unchanged.
    pub fn at_slide(self, index: usize) -> Self {
        match self {
            e @ (CarouselError::NoImagesReturned { .. }
            | CarouselError::SlideGenerationFailed { .. }) => e,
            other => CarouselError::SlideGenerationFailed {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The 0-based slide index this error is attributed to, if any.
    pub fn slide_index(&self) -> Option<usize> {
        match self {
            CarouselError::NoImagesReturned { index }
            | CarouselError::SlideGenerationFailed { index, .. }
            | CarouselError::SlideOutOfRange { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// True for 401/403 responses, which a retry with the same key cannot fix.
    pub fn is_auth_error(&self) -> bool {
        match self {
            CarouselError::RequestFailed { status, .. } => *status == 401 || *status == 403,
            CarouselError::SlideGenerationFailed { source, .. } => source.is_auth_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_images_display_names_index() {
        let e = CarouselError::NoImagesReturned { index: 2 };
        let msg = e.to_string();
        assert!(msg.contains("index 2"), "got: {msg}");
        assert!(msg.contains("slide 3"), "got: {msg}");
    }

    #[test]
    fn at_slide_wraps_transport_errors() {
        let e = CarouselError::RequestFailed {
            status: 500,
            body: "boom".into(),
        }
        .at_slide(4);
        assert_eq!(e.slide_index(), Some(4));
        assert!(e.to_string().contains("HTTP 500"));
    }

    #[test]
    fn at_slide_keeps_existing_index() {
        let e = CarouselError::NoImagesReturned { index: 1 }.at_slide(7);
        assert_eq!(e.slide_index(), Some(1));
    }

    #[test]
    fn auth_error_detected_through_wrapper() {
        let e = CarouselError::RequestFailed {
            status: 401,
            body: "unauthorized".into(),
        }
        .at_slide(0);
        assert!(e.is_auth_error());
        assert!(!CarouselError::MissingApiKey.is_auth_error());
    }

    #[test]
    fn timeout_display() {
        let e = CarouselError::RequestTimeout {
            url: "https://fal.run/x".into(),
            secs: 120,
        };
        assert!(e.to_string().contains("120s"));
    }
}
