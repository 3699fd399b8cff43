//! Errors surfaced by backend operations
//!
//! Two kinds exist:
//!
//! - **`Validation`**: detected locally, before any network call (e.g. no
//!   file selected for upload)
//! - **`RequestFailed`**: transport failure, a non-2xx response, or a 2xx
//!   response whose body could not be decoded
//!
//! Controllers never propagate these; they store [`ApiError::message`] in
//! their error field and the presentation layer reads it from there.

use thiserror::Error;

/// Fallback detail for a failed upload without a server message
pub const UPLOAD_FAILED: &str = "Error uploading image";
/// Fallback detail for a failed gallery listing without a server message
pub const GALLERY_FAILED: &str = "Error loading gallery";
/// Fallback detail for a failed detail lookup without a server message
pub const DETAILS_FAILED: &str = "Error loading image details";

/// Backend operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Local validation failed; no request was issued
    #[error("{0}")]
    Validation(String),

    /// The request was issued and did not succeed
    ///
    /// `status` is `None` when no HTTP response was received.
    #[error("{detail}")]
    RequestFailed { status: Option<u16>, detail: String },
}

impl ApiError {
    /// Build a validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a request failure, preferring the server-provided detail
    #[must_use]
    pub fn request_failed(status: Option<u16>, detail: Option<String>, fallback: &str) -> Self {
        Self::RequestFailed {
            status,
            detail: detail
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Human-readable message stored by controllers
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) => msg,
            Self::RequestFailed { detail, .. } => detail,
        }
    }

    /// HTTP status of the failed response, if one was received
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Validation(_) => None,
            Self::RequestFailed { status, .. } => *status,
        }
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
