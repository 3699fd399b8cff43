//! Backend access for the detection service
//!
//! The controllers talk to the service exclusively through the [`ImageApi`]
//! trait, so the HTTP implementation ([`HttpClient`]) can be swapped for a
//! test double.
//!
//! # Endpoints
//!
//! | Operation      | Request                                   |
//! |----------------|-------------------------------------------|
//! | `upload_image` | `POST {prefix}/images?conf=X` (multipart) |
//! | `list_images`  | `GET {prefix}/images?tag=&min_conf=&limit=` |
//! | `get_image`    | `GET {prefix}/images/{id}`                |
//!
//! Every call is a single attempt. There is no retry and no caching; reads
//! are idempotent and may be re-issued by the caller.

pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use client::HttpClient;
pub use error::ApiError;
pub use query::GalleryQuery;
pub use types::{
    BoundingBox, Detection, DetectionResult, GalleryItem, GalleryPage, ImageDetails, ImageFile,
    UploadedImage,
};

/// Result of a backend operation
pub type Result<T> = std::result::Result<T, ApiError>;

/// The three backend operations the client consumes
///
/// Implementations normalize every transport or HTTP failure into
/// [`ApiError::RequestFailed`].
#[allow(async_fn_in_trait)]
pub trait ImageApi {
    /// Run detection on `file` with the given confidence threshold
    async fn upload_image(&self, file: &ImageFile, confidence: f64) -> Result<DetectionResult>;

    /// List analyzed images matching `query`
    async fn list_images(&self, query: &GalleryQuery) -> Result<GalleryPage>;

    /// Fetch tags and detections of one image
    async fn get_image(&self, id: i64) -> Result<ImageDetails>;
}
