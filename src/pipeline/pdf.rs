//! PDF bundling: one page per slide image, via pdfium.
//!
//! ## Page geometry
//!
//! Each page is exactly as large in points as its image is in pixels, and
//! the image is drawn at the origin at that size. LinkedIn renders document
//! posts page by page, so a 1080×1080 slide becomes a 1080×1080 pt page.
//!
//! All pdfium work runs inside `spawn_blocking`; pdfium is a C++ library
//! with thread-local state and must not run on a Tokio worker.

use crate::error::CarouselError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extensions picked up by [`bundle_directory`].
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[cfg(target_os = "windows")]
const PDFIUM_LIB_NAME: &str = "pdfium.dll";
#[cfg(target_os = "macos")]
const PDFIUM_LIB_NAME: &str = "libpdfium.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const PDFIUM_LIB_NAME: &str = "libpdfium.so";

/// Bind to pdfium.
///
/// Search order: `PDFIUM_LIB_PATH` (a library file or a directory holding
/// one), then the current directory, then the system library path.
pub fn bind_pdfium() -> Result<Pdfium, CarouselError> {
    let mut attempts = Vec::new();

    if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
        let p = PathBuf::from(env_path);
        let lib = if p.is_dir() { p.join(PDFIUM_LIB_NAME) } else { p };
        match Pdfium::bind_to_library(&lib) {
            Ok(bindings) => return Ok(Pdfium::new(bindings)),
            Err(e) => attempts.push(format!("{}: {:?}", lib.display(), e)),
        }
    }

    let local = PathBuf::from(".").join(PDFIUM_LIB_NAME);
    if local.exists() {
        match Pdfium::bind_to_library(&local) {
            Ok(bindings) => return Ok(Pdfium::new(bindings)),
            Err(e) => attempts.push(format!("{}: {:?}", local.display(), e)),
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => Ok(Pdfium::new(bindings)),
        Err(e) => {
            attempts.push(format!("system library: {e:?}"));
            Err(CarouselError::PdfiumBindingFailed(attempts.join("; ")))
        }
    }
}

/// True when [`bind_pdfium`] would succeed.
pub fn pdfium_available() -> bool {
    bind_pdfium().is_ok()
}

/// Bundle `images` into a PDF at `output`, one page per image, in order.
///
/// Every image is decoded before pdfium is touched, so an undecodable input
/// fails with [`CarouselError::ImageDecode`] and leaves no PDF behind. The
/// file is written to a temp file next to `output` and renamed into place.
pub async fn bundle_to_pdf(images: &[PathBuf], output: &Path) -> Result<PathBuf, CarouselError> {
    if images.is_empty() {
        return Err(CarouselError::InvalidConfig("No images to bundle".into()));
    }
    let paths = images.to_vec();
    let out = output.to_path_buf();

    tokio::task::spawn_blocking(move || bundle_blocking(&paths, &out))
        .await
        .map_err(|e| CarouselError::Internal(format!("PDF task panicked: {e}")))?
}

fn bundle_blocking(paths: &[PathBuf], output: &Path) -> Result<PathBuf, CarouselError> {
    let decoded = paths
        .iter()
        .map(|p| decode_image(p))
        .collect::<Result<Vec<_>, _>>()?;

    let pdfium = bind_pdfium()?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| CarouselError::PdfFailed(format!("create document: {e:?}")))?;

    for (i, img) in decoded.iter().enumerate() {
        let (w, h) = (
            PdfPoints::new(img.width() as f32),
            PdfPoints::new(img.height() as f32),
        );
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(w, h))
            .map_err(|e| CarouselError::PdfFailed(format!("add page {}: {e:?}", i + 1)))?;
        page.objects_mut()
            .create_image_object(PdfPoints::ZERO, PdfPoints::ZERO, img, Some(w), Some(h))
            .map_err(|e| CarouselError::PdfFailed(format!("draw image on page {}: {e:?}", i + 1)))?;
        debug!("Page {}: {}x{} pt", i + 1, img.width(), img.height());
    }

    let bytes = document
        .save_to_bytes()
        .map_err(|e| CarouselError::PdfFailed(format!("serialize: {e:?}")))?;
    persist_atomic(output, &bytes)?;

    info!("Bundled {} page(s) into {}", decoded.len(), output.display());
    Ok(output.to_path_buf())
}

fn decode_image(path: &Path) -> Result<DynamicImage, CarouselError> {
    let bytes = std::fs::read(path).map_err(|e| CarouselError::ImageDecode {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    image::load_from_memory(&bytes).map_err(|e| CarouselError::ImageDecode {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

fn persist_atomic(output: &Path, bytes: &[u8]) -> Result<(), CarouselError> {
    let write_err = |e: std::io::Error| CarouselError::OutputWriteFailed {
        path: output.to_path_buf(),
        source: e,
    };
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.persist(output).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Image files in `dir`, sorted lexicographically by file name.
///
/// Slide files are zero-padded (`01-hook.png`), so lexicographic order is
/// slide order.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, CarouselError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CarouselError::ContentReadFailed {
        path: dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Bundle every image in `dir` into `dir/filename`.
pub async fn bundle_directory(dir: &Path, filename: &str) -> Result<PathBuf, CarouselError> {
    let images = discover_images(dir)?;
    if images.is_empty() {
        return Err(CarouselError::NoImagesFound {
            dir: dir.to_path_buf(),
        });
    }
    info!("Found {} image(s) in {}", images.len(), dir.display());
    bundle_to_pdf(&images, &dir.join(filename)).await
}

/// Width and height in points of every page of `pdf`.
pub async fn page_sizes(pdf: &Path) -> Result<Vec<(f32, f32)>, CarouselError> {
    let path = pdf.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let pdfium = bind_pdfium()?;
        let document = pdfium
            .load_pdf_from_file(&path, None)
            .map_err(|e| CarouselError::PdfFailed(format!("open {}: {e:?}", path.display())))?;
        Ok(document
            .pages()
            .iter()
            .map(|page| (page.width().value, page.height().value))
            .collect())
    })
    .await
    .map_err(|e| CarouselError::Internal(format!("PDF task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["03-cta.png", "01-hook.PNG", "02-content.jpeg", "content.json", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("04-dir.png")).unwrap();

        let found: Vec<String> = discover_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found, vec!["01-hook.PNG", "02-content.jpeg", "03-cta.png"]);
    }

    #[tokio::test]
    async fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = bundle_directory(dir.path(), "carousel.pdf").await.unwrap_err();
        assert!(matches!(err, CarouselError::NoImagesFound { .. }));
    }

    #[tokio::test]
    async fn undecodable_image_writes_no_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("01-hook.png");
        std::fs::write(&bad, b"not an image").unwrap();
        let out = dir.path().join("carousel.pdf");

        let err = bundle_to_pdf(&[bad.clone()], &out).await.unwrap_err();
        match err {
            CarouselError::ImageDecode { path, .. } => assert_eq!(path, bad),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!out.exists());
    }
}
