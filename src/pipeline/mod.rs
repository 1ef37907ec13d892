//! Pipeline stages used by the generators.
//!
//! ## Data Flow
//!
//! ```text
//! prompt ──▶ fal ──▶ image ──▶ (next slide's reference) … ──▶ pdf
//!           (POST)   (download, data URI, save)              (bundle)
//! ```
//!
//! 1. [`fal`]   - request/response types, the [`fal::ImageBackend`] seam and
//!    the reqwest client; the only stage with network I/O
//! 2. [`image`] - data URIs, reference images, slide file names, slugs and
//!    atomic writes
//! 3. [`pdf`]   - bundle saved slides into one PDF; runs in `spawn_blocking`
//!    because pdfium is not async-safe

pub mod fal;
pub mod image;
pub mod pdf;
