//! HTTP implementation of [`ImageApi`] on top of `reqwest`

use super::error::{DETAILS_FAILED, GALLERY_FAILED, UPLOAD_FAILED};
use super::{
    ApiError, DetectionResult, GalleryPage, GalleryQuery, ImageApi, ImageDetails, ImageFile,
    Result,
};
use crate::config::AppConfig;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Error body returned by the service on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Flatten `detail` into a message
    ///
    /// Plain strings are used as-is; request-validation failures arrive as a
    /// list of `{ "msg": ... }` objects and are joined.
    fn into_message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Array(entries) => {
                let msgs: Vec<&str> = entries
                    .iter()
                    .filter_map(|e| e.get("msg").and_then(serde_json::Value::as_str))
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        }
    }
}

/// Stateless client for the detection service
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    /// Base URL including the API prefix, without trailing slash
    base: String,
}

impl HttpClient {
    /// Create a client for `base_url` + `api_prefix` with a transport timeout
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_prefix: &str,
        timeout: Duration,
    ) -> std::result::Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, api_prefix))
    }

    /// Create a client from the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> std::result::Result<Self, reqwest::Error> {
        Self::new(
            &config.base_url,
            &config.api_prefix,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Wrap an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str, api_prefix: &str) -> Self {
        Self {
            http,
            base: join_base(base_url, api_prefix),
        }
    }

    /// Base URL every endpoint is resolved against
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn images_url(&self) -> String {
        format!("{}/images", self.base)
    }
}

/// Join base URL and prefix with exactly one slash between them
fn join_base(base_url: &str, api_prefix: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{prefix}")
    }
}

/// Map a response into `T`, or into `RequestFailed` carrying the server's
/// `detail` when the status is not successful
async fn decode<T: DeserializeOwned>(response: reqwest::Response, fallback: &str) -> Result<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(&e, fallback))?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);
        warn!(status = status.as_u16(), ?detail, "request failed");
        return Err(ApiError::request_failed(Some(status.as_u16()), detail, fallback));
    }

    serde_json::from_slice(&body).map_err(|e| ApiError::RequestFailed {
        status: Some(status.as_u16()),
        detail: format!("Invalid response from server: {e}"),
    })
}

fn transport_error(error: &reqwest::Error, fallback: &str) -> ApiError {
    warn!(%error, "transport failure");
    ApiError::RequestFailed {
        status: error.status().map(|s| s.as_u16()),
        detail: format!("{fallback}: {error}"),
    }
}

impl ImageApi for HttpClient {
    async fn upload_image(&self, file: &ImageFile, confidence: f64) -> Result<DetectionResult> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.mime)
            .map_err(|e| ApiError::validation(format!("Invalid image type '{}': {e}", file.mime)))?;
        let form = Form::new().part("file", part);

        debug!(filename = %file.filename, bytes = file.len(), confidence, "uploading image");
        let response = self
            .http
            .post(self.images_url())
            .query(&[("conf", confidence.to_string())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(&e, UPLOAD_FAILED))?;

        decode(response, UPLOAD_FAILED).await
    }

    async fn list_images(&self, query: &GalleryQuery) -> Result<GalleryPage> {
        debug!(?query, "listing images");
        let response = self
            .http
            .get(self.images_url())
            .query(&query.params())
            .send()
            .await
            .map_err(|e| transport_error(&e, GALLERY_FAILED))?;

        decode(response, GALLERY_FAILED).await
    }

    async fn get_image(&self, id: i64) -> Result<ImageDetails> {
        debug!(id, "fetching image details");
        let response = self
            .http
            .get(format!("{}/{id}", self.images_url()))
            .send()
            .await
            .map_err(|e| transport_error(&e, DETAILS_FAILED))?;

        decode(response, DETAILS_FAILED).await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
