//! Gallery mode: filter and browse previously analyzed images
//!
//! # States
//!
//! ```text
//! Idle ──search──▶ Loading ──ok──▶ Loaded
//!                     │
//!                     └──err──▶ Failed (last good items kept)
//! ```
//!
//! Filters are plain fields; every search rebuilds a [`GalleryQuery`] from
//! them. Searches are sequenced, so when two overlap only the one issued
//! last can change the item list.

use super::Handoff;
use super::sequence::{Seq, Sequencer};
use crate::api::{ApiError, GalleryItem, GalleryPage, GalleryQuery, ImageApi, ImageDetails};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Page size used when none is configured
pub const DEFAULT_LIMIT: u32 = 20;

/// Phase of the gallery state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Raw filter inputs as the user edits them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryFilters {
    pub tag: String,
    pub min_conf: f64,
    pub limit: u32,
}

impl GalleryFilters {
    /// Filters with no tag, no confidence floor and the given page size
    #[must_use]
    pub const fn with_limit(limit: u32) -> Self {
        Self {
            tag: String::new(),
            min_conf: 0.0,
            limit,
        }
    }

    /// Canonical query for these filters
    #[must_use]
    pub fn query(&self) -> GalleryQuery {
        GalleryQuery::build(&self.tag, self.min_conf, self.limit)
    }
}

impl Default for GalleryFilters {
    fn default() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }
}

/// Request produced by [`GalleryController::begin_search`]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub seq: Seq,
    pub query: GalleryQuery,
}

/// State owned by gallery mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryController {
    filters: GalleryFilters,
    default_limit: u32,
    items: Vec<GalleryItem>,
    error: Option<String>,
    status: GalleryStatus,
    #[serde(skip)]
    requests: Sequencer,
}

impl Default for GalleryController {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl GalleryController {
    /// Create an idle gallery whose reset restores `default_limit`
    #[must_use]
    pub const fn new(default_limit: u32) -> Self {
        Self {
            filters: GalleryFilters::with_limit(default_limit),
            default_limit,
            items: Vec::new(),
            error: None,
            status: GalleryStatus::Idle,
            requests: Sequencer::new(),
        }
    }

    #[must_use]
    pub const fn filters(&self) -> &GalleryFilters {
        &self.filters
    }

    #[must_use]
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn status(&self) -> GalleryStatus {
        self.status
    }

    /// True while the latest search is unresolved
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.requests.in_flight()
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.filters.tag = tag.into();
    }

    pub const fn set_min_conf(&mut self, min_conf: f64) {
        self.filters.min_conf = min_conf;
    }

    pub const fn set_limit(&mut self, limit: u32) {
        self.filters.limit = limit;
    }

    /// Apply a hand-off coming from upload mode
    pub fn apply(&mut self, handoff: Handoff) {
        match handoff {
            Handoff::FilterByTag(tag) => {
                debug!(%tag, "gallery tag seeded from upload");
                self.filters.tag = tag;
            }
        }
    }

    /// Start a search with the current filters
    ///
    /// Any earlier search still in flight becomes stale.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.error = None;
        let seq = self.requests.issue();
        self.status = GalleryStatus::Loading;
        let query = self.filters.query();
        debug!(seq = seq.get(), ?query, "search issued");
        SearchTicket { seq, query }
    }

    /// Apply the outcome of a search
    ///
    /// On failure the previous item list is kept. Returns `false` if the
    /// ticket is stale and the outcome was dropped.
    pub fn finish_search(&mut self, seq: Seq, outcome: Result<GalleryPage, ApiError>) -> bool {
        if !self.requests.resolve(seq) {
            debug!(seq = seq.get(), "dropping stale search response");
            return false;
        }

        match outcome {
            Ok(page) => {
                info!(items = page.items.len(), "gallery loaded");
                self.items = page.items;
                self.status = GalleryStatus::Loaded;
            }
            Err(error) => {
                info!(%error, "gallery search failed");
                self.error = Some(error.message().to_string());
                self.status = GalleryStatus::Failed;
            }
        }
        true
    }

    /// Search through `api` with the current filters
    pub async fn search<A: ImageApi>(&mut self, api: &A) {
        let ticket = self.begin_search();
        let outcome = api.list_images(&ticket.query).await;
        self.finish_search(ticket.seq, outcome);
    }

    /// Restore default filters
    pub fn reset_filters(&mut self) {
        self.filters = GalleryFilters::with_limit(self.default_limit);
    }

    /// Restore default filters and start a search with them
    ///
    /// The returned ticket supersedes any search issued before the reset.
    pub fn begin_reset(&mut self) -> SearchTicket {
        self.reset_filters();
        self.begin_search()
    }

    /// Restore default filters and search with them
    pub async fn reset<A: ImageApi>(&mut self, api: &A) {
        let ticket = self.begin_reset();
        let outcome = api.list_images(&ticket.query).await;
        self.finish_search(ticket.seq, outcome);
    }

    /// One-line description of what is shown, e.g.
    /// `Showing 3 images with tag person (min_conf 0.5).`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!("Showing {} images", self.items.len());
        let tag = self.filters.tag.trim();
        if !tag.is_empty() {
            line.push_str(&format!(" with tag {tag}"));
        }
        if self.filters.min_conf > 0.0 {
            line.push_str(&format!(" (min_conf {})", self.filters.min_conf));
        }
        line.push('.');
        line
    }
}

/// Fetch details of one image
///
/// Independent of the search state machine, so it takes no controller:
/// neither the item list nor the gallery error is touched, whatever the
/// outcome.
///
/// # Errors
///
/// Returns the `ApiError` of the lookup for the caller to report.
pub async fn view_details<A: ImageApi>(api: &A, id: i64) -> Result<ImageDetails, ApiError> {
    debug!(id, "fetching image details");
    api.get_image(id).await
}

#[cfg(test)]
#[path = "gallery_tests.rs"]
mod gallery_tests;
