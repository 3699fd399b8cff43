//! Testing utilities for visual-qa
//!
//! This module provides a scripted [`MockApi`] standing in for the detection
//! service, plus small fixture builders for wire types.
//!
//! Only available when compiled with `cfg(test)`.

use crate::api::{
    ApiError, Detection, DetectionResult, GalleryItem, GalleryPage, GalleryQuery, ImageApi,
    ImageDetails, ImageFile, UploadedImage,
};
use chrono::{TimeZone, Utc};
use std::cell::RefCell;
use std::collections::VecDeque;

type Scripted<T> = RefCell<VecDeque<Result<T, ApiError>>>;

/// Backend double that replays scripted responses in order and records
/// every call it receives
///
/// When a script runs dry, `list_images` answers with an empty page and the
/// other operations fail with a 404-style error.
///
/// # Examples
/// ```ignore
/// let api = MockApi::new().with_page(Ok(page(&[1, 2])));
/// gallery.search(&api).await;
/// assert_eq!(api.queries().len(), 1);
/// ```
#[derive(Default)]
pub struct MockApi {
    uploads: Scripted<DetectionResult>,
    pages: Scripted<GalleryPage>,
    details: Scripted<ImageDetails>,
    upload_log: RefCell<Vec<(String, f64)>>,
    query_log: RefCell<Vec<GalleryQuery>>,
    detail_log: RefCell<Vec<i64>>,
}

impl MockApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `upload_image`
    #[must_use]
    pub fn with_upload(self, response: Result<DetectionResult, ApiError>) -> Self {
        self.uploads.borrow_mut().push_back(response);
        self
    }

    /// Queue a response for the next `list_images`
    #[must_use]
    pub fn with_page(self, response: Result<GalleryPage, ApiError>) -> Self {
        self.pages.borrow_mut().push_back(response);
        self
    }

    /// Queue a response for the next `get_image`
    #[must_use]
    pub fn with_details(self, response: Result<ImageDetails, ApiError>) -> Self {
        self.details.borrow_mut().push_back(response);
        self
    }

    /// `(filename, confidence)` of every upload received
    #[must_use]
    pub fn uploads(&self) -> Vec<(String, f64)> {
        self.upload_log.borrow().clone()
    }

    #[must_use]
    pub fn upload_calls(&self) -> usize {
        self.upload_log.borrow().len()
    }

    /// Every gallery query received, oldest first
    #[must_use]
    pub fn queries(&self) -> Vec<GalleryQuery> {
        self.query_log.borrow().clone()
    }

    /// Every image id looked up, oldest first
    #[must_use]
    pub fn detail_ids(&self) -> Vec<i64> {
        self.detail_log.borrow().clone()
    }
}

fn not_found() -> ApiError {
    ApiError::request_failed(Some(404), Some("Not found".into()), "not found")
}

impl ImageApi for MockApi {
    async fn upload_image(
        &self,
        file: &ImageFile,
        confidence: f64,
    ) -> Result<DetectionResult, ApiError> {
        self.upload_log
            .borrow_mut()
            .push((file.filename.clone(), confidence));
        self.uploads.borrow_mut().pop_front().unwrap_or_else(|| Err(not_found()))
    }

    async fn list_images(&self, query: &GalleryQuery) -> Result<GalleryPage, ApiError> {
        self.query_log.borrow_mut().push(query.clone());
        self.pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(GalleryPage::default()))
    }

    async fn get_image(&self, id: i64) -> Result<ImageDetails, ApiError> {
        self.detail_log.borrow_mut().push(id);
        self.details.borrow_mut().pop_front().unwrap_or_else(|| Err(not_found()))
    }
}

/// Detection result whose tags are `tags`, one detection per tag
#[must_use]
pub fn detection_result(tags: &[&str]) -> DetectionResult {
    DetectionResult {
        image: UploadedImage {
            url: "http://localhost:8000/files/test.jpg".into(),
            id: Some(1),
            original_filename: Some("test.jpg".into()),
            created_at: None,
        },
        tags: tags.iter().map(ToString::to_string).collect(),
        detections: tags.iter().map(|t| Detection::new(*t, 0.9)).collect(),
    }
}

/// Gallery item with a deterministic filename and timestamp
#[must_use]
pub fn gallery_item(id: i64) -> GalleryItem {
    GalleryItem {
        id,
        filename: format!("image_{id}.jpg"),
        url: format!("http://localhost:8000/files/image_{id}.jpg"),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

/// Page with one item per id
#[must_use]
pub fn page(ids: &[i64]) -> GalleryPage {
    GalleryPage {
        items: ids.iter().copied().map(gallery_item).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let api = MockApi::new()
            .with_page(Ok(page(&[1])))
            .with_page(Err(not_found()));

        let query = GalleryQuery::build("cat", 0.0, 5);
        assert_eq!(api.list_images(&query).await.unwrap().items.len(), 1);
        assert!(api.list_images(&query).await.is_err());
        assert!(api.list_images(&query).await.unwrap().items.is_empty());
        assert_eq!(api.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_records_uploads_and_lookups() {
        let api = MockApi::new().with_details(Ok(ImageDetails::default()));
        let file = ImageFile::new("a.png", vec![0]);

        assert!(api.upload_image(&file, 0.2).await.is_err());
        assert!(api.get_image(9).await.is_ok());
        assert!(api.get_image(9).await.is_err());

        assert_eq!(api.uploads(), vec![("a.png".to_string(), 0.2)]);
        assert_eq!(api.detail_ids(), vec![9, 9]);
    }

    #[test]
    fn test_fixtures() {
        let result = detection_result(&["cat", "dog"]);
        assert_eq!(result.detections.len(), 2);
        assert_eq!(gallery_item(4).filename, "image_4.jpg");
        assert_eq!(page(&[1, 2, 3]).items.len(), 3);
    }
}
