//! Image service client: request/response types, the backend seam and the
//! fal.ai implementation.
//!
//! The generator only talks to an [`ImageBackend`]. [`FalClient`] is the
//! production implementation; tests substitute an in-memory backend so the
//! whole pipeline runs without network access.
//!
//! Calls are synchronous from the caller's point of view: one POST, one JSON
//! body back with image URLs. There is no queue/poll cycle and no retry.

use crate::config::{AspectRatio, FalConfig, OutputFormat, Resolution};
use crate::error::CarouselError;
use crate::pipeline::image::decode_data_uri;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Which route of the image service a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    TextToImage,
    /// Image-to-image; requires a reference image.
    Edit,
}

/// Payload sent to the image service.
///
/// `image_urls` is private so that a request carries a reference image
/// exactly when it is built with [`GenerationRequest::image_edit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_urls: Option<Vec<String>>,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub output_format: OutputFormat,
    pub num_images: u8,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub limit_generations: bool,
}

impl GenerationRequest {
    /// A text-to-image request for a single image.
    pub fn text_to_image(prompt: impl Into<String>, aspect_ratio: AspectRatio, resolution: Resolution) -> Self {
        Self {
            prompt: prompt.into(),
            image_urls: None,
            aspect_ratio,
            resolution,
            output_format: OutputFormat::Png,
            num_images: 1,
            limit_generations: false,
        }
    }

    /// An image-to-image request with exactly one reference image.
    pub fn image_edit(
        prompt: impl Into<String>,
        reference_uri: impl Into<String>,
        aspect_ratio: AspectRatio,
        resolution: Resolution,
    ) -> Self {
        Self {
            image_urls: Some(vec![reference_uri.into()]),
            ..Self::text_to_image(prompt, aspect_ratio, resolution)
        }
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn num_images(mut self, n: u8) -> Self {
        self.num_images = n;
        self
    }

    /// Ask the service to return exactly `num_images` and no extras.
    pub fn limit_generations(mut self, v: bool) -> Self {
        self.limit_generations = v;
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        if self.image_urls.is_some() {
            Endpoint::Edit
        } else {
            Endpoint::TextToImage
        }
    }

    /// The reference image's data URI, if any.
    pub fn reference(&self) -> Option<&str> {
        self.image_urls
            .as_ref()
            .and_then(|urls| urls.first())
            .map(String::as_str)
    }
}

/// Body returned by the image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// `null` and a missing field both read as no images.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<ResultImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ResultImage>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ResultImage>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Anything that can turn a [`GenerationRequest`] into image bytes.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Submit one request and wait for its result.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, CarouselError>;

    /// Download a result image. `data:` URIs must be decoded without I/O.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CarouselError>;
}

// ── fal.ai ───────────────────────────────────────────────────────────────

/// reqwest-based client for `fal.run`.
pub struct FalClient {
    http: reqwest::Client,
    config: FalConfig,
}

impl FalClient {
    pub fn new(config: FalConfig) -> Result<Self, CarouselError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CarouselError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Client configured from `FAL_KEY`/`FALAI_KEY`.
    pub fn from_env() -> Result<Self, CarouselError> {
        Self::new(FalConfig::from_env()?)
    }

    pub fn config(&self) -> &FalConfig {
        &self.config
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        let model = match endpoint {
            Endpoint::TextToImage => &self.config.text_to_image_model,
            Endpoint::Edit => &self.config.edit_model,
        };
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), model)
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> CarouselError {
        if e.is_timeout() {
            CarouselError::RequestTimeout {
                url: url.to_string(),
                secs: self.config.timeout_secs,
            }
        } else {
            CarouselError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ImageBackend for FalClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, CarouselError> {
        let url = self.endpoint_url(request.endpoint());
        info!(
            "POST {} ({}, {}, {} image(s))",
            url, request.aspect_ratio, request.resolution, request.num_images
        );
        debug!("Prompt: {} chars", request.prompt.len());

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Key {}", self.config.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        if !status.is_success() {
            return Err(CarouselError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerationResponse =
            serde_json::from_str(&body).map_err(|e| CarouselError::InvalidResponse {
                detail: e.to_string(),
            })?;
        debug!("Service returned {} image(s)", parsed.images.len());
        Ok(parsed)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CarouselError> {
        if url.starts_with("data:") {
            return decode_data_uri(url);
        }

        let download_err = |reason: String| CarouselError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CarouselError::RequestTimeout {
                    url: url.to_string(),
                    secs: self.config.timeout_secs,
                }
            } else {
                download_err(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(download_err(format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_err(e.to_string()))?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::image::to_data_uri;

    #[test]
    fn null_or_missing_images_parse_as_empty() {
        for body in [r#"{"images": null}"#, r#"{"description": "x"}"#, r#"{"images": []}"#] {
            let resp: GenerationResponse = serde_json::from_str(body).unwrap();
            assert!(resp.images.is_empty(), "body: {body}");
        }
        let resp: GenerationResponse =
            serde_json::from_str(r#"{"images": [{"url": "https://x/1.png"}], "description": null}"#).unwrap();
        assert_eq!(resp.images[0].url, "https://x/1.png");
        assert_eq!(resp.description, None);
    }

    #[test]
    fn text_to_image_has_no_reference() {
        let req = GenerationRequest::text_to_image("p", AspectRatio::Square, Resolution::TwoK)
            .limit_generations(true);
        assert_eq!(req.endpoint(), Endpoint::TextToImage);
        assert_eq!(req.reference(), None);

        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("image_urls").is_none());
        assert_eq!(json["aspect_ratio"], "1:1");
        assert_eq!(json["resolution"], "2K");
        assert_eq!(json["output_format"], "png");
        assert_eq!(json["num_images"], 1);
        assert_eq!(json["limit_generations"], true);
    }

    #[test]
    fn edit_request_carries_exactly_one_reference() {
        let req = GenerationRequest::image_edit("p", "data:image/png;base64,AAAA", AspectRatio::Portrait4x5, Resolution::OneK);
        assert_eq!(req.endpoint(), Endpoint::Edit);
        assert_eq!(req.reference(), Some("data:image/png;base64,AAAA"));

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["image_urls"].as_array().unwrap().len(), 1);
        assert!(json.get("limit_generations").is_none());
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let r: GenerationResponse = serde_json::from_str(r#"{"images":[{"url":"https://x/y.png"}]}"#).unwrap();
        assert_eq!(r.images.len(), 1);
        assert_eq!(r.description, None);

        let empty: GenerationResponse = serde_json::from_str(r#"{"images":[]}"#).unwrap();
        assert!(empty.images.is_empty());
    }

    #[test]
    fn endpoint_urls() {
        let client = FalClient::new(FalConfig::new("k")).unwrap();
        assert_eq!(
            client.endpoint_url(Endpoint::TextToImage),
            "https://fal.run/fal-ai/nano-banana-pro"
        );
        assert_eq!(
            client.endpoint_url(Endpoint::Edit),
            "https://fal.run/fal-ai/nano-banana-pro/edit"
        );
    }

    #[tokio::test]
    async fn fetch_decodes_data_uri_locally() {
        let client = FalClient::new(FalConfig::new("k")).unwrap();
        let bytes = client.fetch(&to_data_uri(b"hello", "image/png")).await.unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let mut config = FalConfig::new("k").timeout_secs(5);
        config.base_url = "http://127.0.0.1:9".into();
        let client = FalClient::new(config).unwrap();
        let req = GenerationRequest::text_to_image("p", AspectRatio::Square, Resolution::OneK);
        let err = client.generate(&req).await.unwrap_err();
        assert!(
            matches!(err, CarouselError::Transport { .. } | CarouselError::RequestTimeout { .. }),
            "got: {err:?}"
        );
    }
}
