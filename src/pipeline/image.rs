//! Image plumbing: data URIs, reference images, file naming and atomic writes.
//!
//! The image service accepts a reference image as a base64 data URI inside
//! the JSON body, so the bytes downloaded for slide *i* are re-encoded here
//! and sent along with the request for slide *i+1*. Nothing is uploaded
//! separately.

use crate::error::CarouselError;
use crate::plan::SlideType;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static NON_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9-]").unwrap());

const MAX_SLUG_CHARS: usize = 30;

// ── Data URIs ────────────────────────────────────────────────────────────

/// Wrap raw image bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decode a base64 `data:` URI back into bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, CarouselError> {
    let fail = |reason: &str| CarouselError::DownloadFailed {
        url: truncate(uri, 48),
        reason: reason.to_string(),
    };
    let rest = uri.strip_prefix("data:").ok_or_else(|| fail("not a data URI"))?;
    let (meta, payload) = rest.split_once(',').ok_or_else(|| fail("missing ',' separator"))?;
    if !meta.ends_with(";base64") {
        return Err(fail("only base64 data URIs are supported"));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| fail(&format!("invalid base64: {e}")))
}

/// MIME type guessed from the leading bytes; PNG when unknown.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::WebP) => "image/webp",
        _ => "image/png",
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((i, _)) => format!("{}…", &s[..i]),
        None => s.to_string(),
    }
}

// ── Reference image ──────────────────────────────────────────────────────

/// The previous slide's bytes, ready to be sent as a visual reference.
#[derive(Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub bytes: Vec<u8>,
    pub data_uri: String,
}

impl ReferenceImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let data_uri = to_data_uri(&bytes, sniff_mime(&bytes));
        Self { bytes, data_uri }
    }

    /// Load a previously saved slide from disk.
    pub async fn read(path: &Path) -> Result<Self, CarouselError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CarouselError::ContentReadFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        debug!("Loaded reference image {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::from_bytes(bytes))
    }
}

impl std::fmt::Debug for ReferenceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceImage")
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

// ── Naming ───────────────────────────────────────────────────────────────

/// `{index+1:02}-{slide type}.png`, e.g. `03-listicle-item.png`.
pub fn slide_filename(index: usize, slide_type: SlideType) -> String {
    let ty = NON_TYPE.replace_all(slide_type.as_str(), "-");
    format!("{:02}-{}.png", index + 1, ty)
}

/// Filesystem-safe slug of a topic.
///
/// Lowercases, transliterates German umlauts and `ß`, collapses every run of
/// other characters into `-`, trims dashes from both ends and keeps at most
/// 30 characters.
pub fn slugify(topic: &str) -> String {
    let mut lowered = String::with_capacity(topic.len());
    for c in topic.to_lowercase().chars() {
        match c {
            'ä' => lowered.push_str("ae"),
            'ö' => lowered.push_str("oe"),
            'ü' => lowered.push_str("ue"),
            'ß' => lowered.push_str("ss"),
            other => lowered.push(other),
        }
    }
    let dashed = NON_SLUG.replace_all(&lowered, "-");
    dashed.trim_matches('-').chars().take(MAX_SLUG_CHARS).collect()
}

/// `{YYYY-MM-DD}_{slug}`.
pub fn output_dir_name(topic: &str, date: NaiveDate) -> String {
    format!("{}_{}", date.format("%Y-%m-%d"), slugify(topic))
}

/// Create `base/{today}_{slug}` (UTC date) and return its path.
pub async fn create_output_dir(base: &Path, topic: &str) -> Result<PathBuf, CarouselError> {
    let dir = base.join(output_dir_name(topic, chrono::Utc::now().date_naive()));
    ensure_dir(&dir).await?;
    Ok(dir)
}

// ── Writes ───────────────────────────────────────────────────────────────

pub async fn ensure_dir(dir: &Path) -> Result<(), CarouselError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| CarouselError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })
}

/// Write `bytes` to `path` via a sibling temp file and rename.
///
/// Parent directories are created as needed.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CarouselError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent).await?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let write_err = |e: std::io::Error| CarouselError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 25, 47, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn slug_transliterates_umlauts() {
        assert_eq!(slugify("Büro-Prozesse für KMU!!"), "buero-prozesse-fuer-kmu");
        assert_eq!(slugify("Straße & Maß"), "strasse-mass");
        assert_eq!(slugify("  --Hallo  Welt--  "), "hallo-welt");
    }

    #[test]
    fn slug_is_capped_at_thirty_chars() {
        let slug = slugify("Die zehn wichtigsten Preisfehler im Mittelstand");
        assert_eq!(slug.chars().count(), 30);
        assert!(slug.starts_with("die-zehn-wichtigsten"));
    }

    #[test]
    fn dir_name_is_date_prefixed() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            output_dir_name("Büro-Prozesse für KMU!!", date),
            "2025-03-07_buero-prozesse-fuer-kmu"
        );
    }

    #[test]
    fn slide_filenames_are_padded() {
        assert_eq!(slide_filename(0, SlideType::Hook), "01-hook.png");
        assert_eq!(slide_filename(9, SlideType::ListicleItem), "10-listicle-item.png");
    }

    #[test]
    fn data_uri_roundtrips_bytes() {
        let bytes = png_bytes();
        let reference = ReferenceImage::from_bytes(bytes.clone());
        assert!(reference.data_uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_uri(&reference.data_uri).unwrap(), bytes);
    }

    #[test]
    fn data_uri_rejects_non_base64() {
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("https://example.com/a.png").is_err());
    }

    #[tokio::test]
    async fn write_atomic_creates_parents_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/01-hook.png");
        write_atomic(&path, b"abc").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"abc");
        assert!(!dir.path().join("nested/01-hook.png.tmp").exists());
    }
}
