//! Wire types for the detection service
//!
//! These mirror the JSON bodies exchanged with the backend. Everything here
//! is a read-only projection: the client never mutates what the service
//! returned, it only replaces it wholesale on the next response.
//!
//! Optional fields are tolerated when absent so that older or trimmed
//! backends still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Axis-aligned box in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Width of the box, never negative
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).max(0.0)
    }

    /// Height of the box, never negative
    #[must_use]
    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).max(0.0)
    }
}

/// One recognized object instance
///
/// Order inside a result is whatever the backend sent; the client never
/// re-sorts detections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// Score in `[0, 1]`
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl Detection {
    #[must_use]
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox: None,
        }
    }
}

/// Image record attached to an upload response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Result of running detection on one uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub image: UploadedImage,
    /// Unique labels present in `detections`
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl DetectionResult {
    /// Whether `tag` is one of the labels this result reported
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Entry of the analyzed-images gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: i64,
    pub filename: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `GET /images`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryPage {
    /// Missing `items` decodes as an empty page
    #[serde(default)]
    pub items: Vec<GalleryItem>,
}

/// Body of `GET /images/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<GalleryItem>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl ImageDetails {
    /// Two-line human summary: tag list (or a dash) and detection count
    #[must_use]
    pub fn summary(&self) -> String {
        let tags = if self.tags.is_empty() {
            "—".to_string()
        } else {
            self.tags.join(", ")
        };
        format!("Tags: {tags}\nDetections: {}", self.detections.len())
    }
}

/// Image selected for upload
///
/// Owned by the upload controller; bytes are read once when the file is
/// selected.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    pub filename: String,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Build an image file from in-memory bytes, deriving the MIME type from
    /// the filename extension
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime = mime_for(&filename).to_string();
        Self {
            filename,
            mime,
            bytes,
        }
    }

    /// Read an image from disk
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(filename, bytes))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("filename", &self.filename)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// MIME type for an image filename; unknown extensions fall back to JPEG,
/// which is also what the service assumes for extensionless uploads
#[must_use]
pub fn mime_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => "image/jpeg",
    }
}
