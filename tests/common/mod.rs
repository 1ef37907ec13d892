//! In-memory image backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use carousel_forge::pipeline::fal::ResultImage;
use carousel_forge::{CarouselError, GenerationRequest, GenerationResponse, ImageBackend};
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Mutex;

/// Encode a solid-colour PNG of `w`x`h`. The shade makes the bytes unique.
pub fn png(w: u32, h: u32, shade: u8) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([shade, 255 - shade, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// Serves a distinct PNG for every call and records every request.
///
/// Call `n` (0-based) yields image `mem://n`, whose bytes are `png(w, h, n)`.
pub struct FakeBackend {
    pub width: u32,
    pub height: u32,
    /// Calls that answer with `{"images": []}`.
    pub empty_at: HashSet<usize>,
    /// Calls that answer with HTTP 500.
    pub fail_at: HashSet<usize>,
    pub description: Option<String>,
    /// How many images each successful call returns.
    pub images_per_call: usize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            empty_at: HashSet::new(),
            fail_at: HashSet::new(),
            description: None,
            images_per_call: 1,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn empty_at(mut self, call: usize) -> Self {
        self.empty_at.insert(call);
        self
    }

    pub fn fail_at(mut self, call: usize) -> Self {
        self.fail_at.insert(call);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Bytes served for `mem://{call}`, image `k` of that call.
    pub fn bytes_for(&self, call: usize, k: usize) -> Vec<u8> {
        png(self.width, self.height, ((call * 4 + k) % 250) as u8)
    }
}

#[async_trait]
impl ImageBackend for FakeBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, CarouselError> {
        let call = {
            let mut reqs = self.requests.lock().unwrap();
            reqs.push(request.clone());
            reqs.len() - 1
        };
        if self.fail_at.contains(&call) {
            return Err(CarouselError::RequestFailed {
                status: 500,
                body: "upstream exploded".into(),
            });
        }
        if self.empty_at.contains(&call) {
            return Ok(GenerationResponse {
                images: vec![],
                description: None,
            });
        }
        let images = (0..self.images_per_call)
            .map(|k| ResultImage {
                url: format!("mem://{call}/{k}"),
                file_name: None,
                content_type: Some("image/png".into()),
            })
            .collect();
        Ok(GenerationResponse {
            images,
            description: self.description.clone(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CarouselError> {
        let rest = url
            .strip_prefix("mem://")
            .ok_or_else(|| CarouselError::DownloadFailed {
                url: url.into(),
                reason: "unknown scheme".into(),
            })?;
        let (call, k) = rest.split_once('/').unwrap();
        Ok(self.bytes_for(call.parse().unwrap(), k.parse().unwrap()))
    }
}
