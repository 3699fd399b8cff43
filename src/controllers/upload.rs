//! Upload mode: select an image, run detection, inspect the result
//!
//! # States
//!
//! ```text
//! Idle ──upload──▶ Submitting ──ok──▶ Succeeded
//!   ▲                  │
//!   │                  └──err──▶ Failed
//!   └──────── clear ◀────────────────┘
//! ```
//!
//! Uploading without a selected file goes straight to `Failed` with a
//! validation message; no request is issued.

use super::Handoff;
use super::sequence::{Seq, Sequencer};
use crate::api::{ApiError, DetectionResult, ImageApi, ImageFile};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Message shown when uploading with nothing selected
pub const NO_FILE_SELECTED: &str = "Select an image first.";

/// Confidence threshold used when none is configured
pub const DEFAULT_CONFIDENCE: f64 = 0.35;

/// Phase of the upload state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Request produced by [`UploadController::begin_upload`]
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub seq: Seq,
    pub file: ImageFile,
    pub confidence: f64,
}

/// State owned by upload mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadController {
    file: Option<ImageFile>,
    confidence: f64,
    result: Option<DetectionResult>,
    error: Option<String>,
    status: UploadStatus,
    #[serde(skip)]
    requests: Sequencer,
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE)
    }
}

impl UploadController {
    /// Create an idle controller with the given confidence threshold
    #[must_use]
    pub const fn new(confidence: f64) -> Self {
        Self {
            file: None,
            confidence,
            result: None,
            error: None,
            status: UploadStatus::Idle,
            requests: Sequencer::new(),
        }
    }

    #[must_use]
    pub const fn file(&self) -> Option<&ImageFile> {
        self.file.as_ref()
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub const fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn status(&self) -> UploadStatus {
        self.status
    }

    /// True while an upload is being submitted
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.requests.in_flight()
    }

    /// Select the image to upload next, or deselect with `None`
    pub fn select_file(&mut self, file: Option<ImageFile>) {
        self.file = file;
    }

    /// Set the confidence threshold sent with the next upload
    pub const fn set_confidence(&mut self, confidence: f64) {
        self.confidence = confidence;
    }

    /// Start an upload
    ///
    /// Clears the previous result and error. Returns `None` (and records a
    /// validation error) when no file is selected; otherwise moves to
    /// `Submitting` and returns the request to send.
    pub fn begin_upload(&mut self) -> Option<UploadTicket> {
        self.error = None;
        self.result = None;

        let Some(file) = self.file.clone() else {
            debug!("upload requested without a file");
            self.requests.invalidate();
            self.status = UploadStatus::Failed;
            self.error = Some(ApiError::validation(NO_FILE_SELECTED).message().to_string());
            return None;
        };

        let seq = self.requests.issue();
        self.status = UploadStatus::Submitting;
        debug!(seq = seq.get(), filename = %file.filename, "upload issued");

        Some(UploadTicket {
            seq,
            file,
            confidence: self.confidence,
        })
    }

    /// Apply the outcome of an upload
    ///
    /// Returns `false` if the ticket is stale (a newer upload was issued, or
    /// the controller was cleared) and the outcome was dropped.
    pub fn finish_upload(&mut self, seq: Seq, outcome: Result<DetectionResult, ApiError>) -> bool {
        if !self.requests.resolve(seq) {
            debug!(seq = seq.get(), "dropping stale upload response");
            return false;
        }

        match outcome {
            Ok(result) => {
                info!(
                    tags = result.tags.len(),
                    detections = result.detections.len(),
                    "upload succeeded"
                );
                self.result = Some(result);
                self.error = None;
                self.status = UploadStatus::Succeeded;
            }
            Err(error) => {
                info!(%error, "upload failed");
                self.result = None;
                self.error = Some(error.message().to_string());
                self.status = UploadStatus::Failed;
            }
        }
        true
    }

    /// Upload the selected file through `api`
    pub async fn upload<A: ImageApi>(&mut self, api: &A) {
        let Some(ticket) = self.begin_upload() else {
            return;
        };
        let outcome = api.upload_image(&ticket.file, ticket.confidence).await;
        self.finish_upload(ticket.seq, outcome);
    }

    /// Drop file, result and error and return to `Idle`
    ///
    /// Any upload still in flight becomes stale.
    pub fn clear(&mut self) {
        self.file = None;
        self.result = None;
        self.error = None;
        self.status = UploadStatus::Idle;
        self.requests.invalidate();
    }

    /// Tag clicked in the displayed result
    ///
    /// Does not touch upload state. Yields a hand-off for the gallery only
    /// when a result is displayed and it carries `tag`.
    #[must_use]
    pub fn select_tag(&self, tag: &str) -> Option<Handoff> {
        let result = self.result.as_ref()?;
        result.has_tag(tag).then(|| Handoff::FilterByTag(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, detection_result};

    fn with_file() -> UploadController {
        let mut upload = UploadController::default();
        upload.select_file(Some(ImageFile::new("street.jpg", vec![1, 2, 3])));
        upload
    }

    #[tokio::test]
    async fn test_upload_without_file_never_calls_api() {
        let api = MockApi::new();
        let mut upload = UploadController::default();

        upload.upload(&api).await;

        assert_eq!(api.upload_calls(), 0);
        assert_eq!(upload.status(), UploadStatus::Failed);
        assert_eq!(upload.error(), Some(NO_FILE_SELECTED));
        assert!(!upload.is_submitting());
    }

    #[tokio::test]
    async fn test_successful_upload_stores_result() {
        let api = MockApi::new().with_upload(Ok(detection_result(&["person", "car"])));
        let mut upload = with_file();
        upload.set_confidence(0.5);

        upload.upload(&api).await;

        assert_eq!(upload.status(), UploadStatus::Succeeded);
        assert_eq!(upload.result().unwrap().tags, vec!["person", "car"]);
        assert_eq!(upload.error(), None);
        assert_eq!(api.uploads(), vec![("street.jpg".to_string(), 0.5)]);
        assert!(!upload.is_submitting());
    }

    #[test]
    fn test_begin_upload_clears_previous_error_and_result() {
        let mut upload = with_file();
        let ticket = upload.begin_upload().unwrap();
        upload.finish_upload(ticket.seq, Ok(detection_result(&["dog"])));
        assert!(upload.result().is_some());

        let ticket = upload.begin_upload().unwrap();
        assert!(upload.result().is_none());
        assert!(upload.error().is_none());
        assert!(upload.is_submitting());
        assert_eq!(upload.status(), UploadStatus::Submitting);

        upload.finish_upload(ticket.seq, Err(ApiError::request_failed(Some(500), None, "boom")));
        assert_eq!(upload.error(), Some("boom"));

        upload.begin_upload().unwrap();
        assert!(upload.error().is_none());
    }

    #[tokio::test]
    async fn test_failed_upload_prefers_server_detail() {
        let api = MockApi::new().with_upload(Err(ApiError::request_failed(
            Some(400),
            Some("Invalid or corrupt image.".into()),
            "Error uploading image",
        )));
        let mut upload = with_file();

        upload.upload(&api).await;

        assert_eq!(upload.status(), UploadStatus::Failed);
        assert_eq!(upload.error(), Some("Invalid or corrupt image."));
        assert!(upload.result().is_none());
        assert!(!upload.is_submitting());
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let api = MockApi::new()
            .with_upload(Err(ApiError::request_failed(None, None, "offline")))
            .with_upload(Ok(detection_result(&["cat"])));
        let mut upload = with_file();

        upload.upload(&api).await;
        assert_eq!(upload.status(), UploadStatus::Failed);

        upload.upload(&api).await;
        assert_eq!(upload.status(), UploadStatus::Succeeded);
        assert_eq!(api.upload_calls(), 2);
    }

    #[test]
    fn test_later_upload_wins_over_slow_earlier_one() {
        let mut upload = with_file();
        let first = upload.begin_upload().unwrap();
        let second = upload.begin_upload().unwrap();

        assert!(upload.finish_upload(second.seq, Ok(detection_result(&["new"]))));
        assert!(!upload.finish_upload(first.seq, Ok(detection_result(&["old"]))));

        assert_eq!(upload.result().unwrap().tags, vec!["new"]);
        assert_eq!(upload.status(), UploadStatus::Succeeded);
    }

    #[test]
    fn test_clear_resets_and_invalidates_in_flight_upload() {
        let mut upload = with_file();
        let ticket = upload.begin_upload().unwrap();

        upload.clear();
        assert!(upload.file().is_none());
        assert!(!upload.is_submitting());
        assert_eq!(upload.status(), UploadStatus::Idle);

        assert!(!upload.finish_upload(ticket.seq, Ok(detection_result(&["late"]))));
        assert!(upload.result().is_none());
    }

    #[test]
    fn test_clear_from_failed() {
        let mut upload = UploadController::default();
        assert!(upload.begin_upload().is_none());
        assert_eq!(upload.status(), UploadStatus::Failed);

        upload.clear();
        assert_eq!(upload.status(), UploadStatus::Idle);
        assert!(upload.error().is_none());
    }

    #[test]
    fn test_select_tag_requires_displayed_result() {
        let mut upload = with_file();
        assert_eq!(upload.select_tag("person"), None);

        let ticket = upload.begin_upload().unwrap();
        upload.finish_upload(ticket.seq, Ok(detection_result(&["person"])));

        assert_eq!(
            upload.select_tag("person"),
            Some(Handoff::FilterByTag("person".into()))
        );
        assert_eq!(upload.select_tag("giraffe"), None);
        assert_eq!(upload.status(), UploadStatus::Succeeded);
    }

    #[test]
    fn test_state_serializes_without_bytes() {
        let upload = with_file();
        let json = serde_json::to_value(&upload).unwrap();
        assert_eq!(json["status"], "idle");
        assert_eq!(json["file"]["filename"], "street.jpg");
        assert!(json["file"].get("bytes").is_none());
    }
}
