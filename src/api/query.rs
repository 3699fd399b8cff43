//! Gallery query construction
//!
//! Turns the sparse filter inputs of the gallery into a canonical
//! [`GalleryQuery`]. Default values are never sent: an empty tag, a zero
//! confidence floor and a zero limit are all dropped so the backend applies
//! its own defaults.
//!
//! No validation happens here beyond trimming the tag. Out-of-range values
//! pass through untouched; the backend is the authority on what it accepts.

use serde::{Deserialize, Serialize};

/// Canonical gallery filter
///
/// Every field is optional; `None` means "not sent".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryQuery {
    pub tag: Option<String>,
    pub min_conf: Option<f64>,
    pub limit: Option<u32>,
}

impl GalleryQuery {
    /// Build a query from raw filter inputs
    ///
    /// - `tag` is included only if its trimmed form is non-empty
    /// - `min_conf` is included only if strictly greater than zero
    /// - `limit` is included only if non-zero
    ///
    /// # Examples
    ///
    /// ```
    /// use visual_qa::api::GalleryQuery;
    ///
    /// assert!(GalleryQuery::build("", 0.0, 0).is_empty());
    ///
    /// let q = GalleryQuery::build(" person ", 0.5, 10);
    /// assert_eq!(q.tag.as_deref(), Some("person"));
    /// assert_eq!(q.min_conf, Some(0.5));
    /// assert_eq!(q.limit, Some(10));
    /// ```
    #[must_use]
    pub fn build(tag: &str, min_conf: f64, limit: u32) -> Self {
        let tag = tag.trim();
        Self {
            tag: (!tag.is_empty()).then(|| tag.to_string()),
            min_conf: (min_conf > 0.0).then_some(min_conf),
            limit: (limit != 0).then_some(limit),
        }
    }

    /// True when no parameter would be sent
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tag.is_none() && self.min_conf.is_none() && self.limit.is_none()
    }

    /// URL parameters in wire order (`tag`, `min_conf`, `limit`)
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(tag) = &self.tag {
            params.push(("tag", tag.clone()));
        }
        if let Some(min_conf) = self.min_conf {
            params.push(("min_conf", min_conf.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}
