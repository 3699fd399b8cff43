//! Top-level mode state machine
//!
//! The coordinator owns the current [`Mode`] together with both controllers
//! and routes user intents ([`Message`]) to them. Cross-controller traffic
//! only happens through [`Handoff`] values passed here; controllers never
//! reach into each other.
//!
//! # Workflow
//!
//! ```text
//! Upload mode
//!     │  tag clicked in result
//!     ▼
//! UploadController::select_tag ──Handoff──▶ GalleryController::apply
//!                                               │
//!                               switch_mode(Gallery) ──▶ one search
//! ```
//!
//! # Pending requests
//!
//! [`ModeCoordinator::dispatch`] never waits on the network. An intent that
//! needs the service yields a [`Request`]; the caller sends it whenever it
//! likes and feeds the completion message back through `dispatch`. Other
//! intents (switching modes, resetting the gallery) can be dispatched in
//! between, and a request is never cancelled by them: its completion is
//! applied if still current and dropped if superseded.
//!
//! ```text
//! dispatch(Upload) ──▶ Request::Upload ──send──▶ Message::UploadFinished
//!                                                        │
//!                                    dispatch(UploadFinished) ──▶ finish_upload
//! ```

use super::Handoff;
use super::gallery::{self, GalleryController, SearchTicket};
use super::sequence::Seq;
use super::upload::{UploadController, UploadTicket};
use crate::api::{ApiError, DetectionResult, GalleryPage, ImageApi, ImageDetails, ImageFile};
use crate::config::AppConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which controller is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Upload,
    Gallery,
}

/// User intents and request completions routed by the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SwitchMode(Mode),
    SelectFile(Option<ImageFile>),
    SetConfidence(f64),
    Upload,
    ClearUpload,
    /// Tag clicked in the displayed upload result
    TagClicked(String),
    SetTagFilter(String),
    SetMinConf(f64),
    SetLimit(u32),
    Search,
    ResetGallery,
    /// Outcome of a [`Request::Upload`]
    UploadFinished(Seq, Result<DetectionResult, ApiError>),
    /// Outcome of a [`Request::Search`]
    SearchFinished(Seq, Result<GalleryPage, ApiError>),
}

/// Service call issued by [`ModeCoordinator::dispatch`]
#[derive(Debug, Clone)]
pub enum Request {
    Upload(UploadTicket),
    Search(SearchTicket),
}

impl Request {
    /// Send the call through `api` and wrap its outcome as a completion
    /// message for [`ModeCoordinator::dispatch`]
    pub async fn send<A: ImageApi>(self, api: &A) -> Message {
        match self {
            Self::Upload(ticket) => {
                let outcome = api.upload_image(&ticket.file, ticket.confidence).await;
                Message::UploadFinished(ticket.seq, outcome)
            }
            Self::Search(ticket) => {
                let outcome = api.list_images(&ticket.query).await;
                Message::SearchFinished(ticket.seq, outcome)
            }
        }
    }
}

/// Serializable view of everything the presentation layer renders
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub mode: Mode,
    pub upload: &'a UploadController,
    pub gallery: &'a GalleryController,
}

/// Owner of the active mode and both controllers
pub struct ModeCoordinator<A> {
    api: A,
    mode: Mode,
    upload: UploadController,
    gallery: GalleryController,
}

impl<A: ImageApi> ModeCoordinator<A> {
    /// Start in upload mode with default controllers
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::with_controllers(api, UploadController::default(), GalleryController::default())
    }

    /// Start in upload mode with controllers seeded from configuration
    #[must_use]
    pub fn from_config(api: A, config: &AppConfig) -> Self {
        Self::with_controllers(
            api,
            UploadController::new(config.confidence),
            GalleryController::new(config.gallery_limit),
        )
    }

    #[must_use]
    pub fn with_controllers(api: A, upload: UploadController, gallery: GalleryController) -> Self {
        Self {
            api,
            mode: Mode::Upload,
            upload,
            gallery,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn upload(&self) -> &UploadController {
        &self.upload
    }

    #[must_use]
    pub const fn gallery(&self) -> &GalleryController {
        &self.gallery
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub const fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            mode: self.mode,
            upload: &self.upload,
            gallery: &self.gallery,
        }
    }

    /// Activate `mode` without waiting for the network
    ///
    /// Entering gallery mode returns the one search to run with the filters
    /// as they are at that moment. Entering upload mode, or selecting the
    /// mode that is already active, returns `None`. Requests in flight for
    /// the other mode are left alone.
    pub fn begin_switch_mode(&mut self, mode: Mode) -> Option<Request> {
        if mode == self.mode {
            debug!(?mode, "mode already active");
            return None;
        }

        info!(from = ?self.mode, to = ?mode, "switching mode");
        self.mode = mode;
        (mode == Mode::Gallery).then(|| Request::Search(self.gallery.begin_search()))
    }

    /// Follow a tag from the upload result into the gallery
    ///
    /// Returns the gallery search to run, or `None` when not in upload mode
    /// or when the tag is not part of a displayed result; nothing changes
    /// in that case.
    pub fn begin_select_tag(&mut self, tag: &str) -> Option<Request> {
        if self.mode != Mode::Upload {
            return None;
        }
        let handoff = self.upload.select_tag(tag)?;

        self.gallery.apply(handoff);
        self.begin_switch_mode(Mode::Gallery)
    }

    /// Route one intent or completion without waiting for the network
    ///
    /// Returns the request the intent issued, if any. Completion messages
    /// are applied when their ticket is still current and dropped
    /// otherwise.
    pub fn dispatch(&mut self, message: Message) -> Option<Request> {
        match message {
            Message::SwitchMode(mode) => return self.begin_switch_mode(mode),
            Message::SelectFile(file) => self.upload.select_file(file),
            Message::SetConfidence(confidence) => self.upload.set_confidence(confidence),
            Message::Upload => return self.upload.begin_upload().map(Request::Upload),
            Message::ClearUpload => self.upload.clear(),
            Message::TagClicked(tag) => return self.begin_select_tag(&tag),
            Message::SetTagFilter(tag) => self.gallery.set_tag(tag),
            Message::SetMinConf(min_conf) => self.gallery.set_min_conf(min_conf),
            Message::SetLimit(limit) => self.gallery.set_limit(limit),
            Message::Search => return Some(Request::Search(self.gallery.begin_search())),
            Message::ResetGallery => return Some(Request::Search(self.gallery.begin_reset())),
            Message::UploadFinished(seq, outcome) => {
                self.upload.finish_upload(seq, outcome);
            }
            Message::SearchFinished(seq, outcome) => {
                self.gallery.finish_search(seq, outcome);
            }
        }
        None
    }

    /// Send `request` and apply its completion
    async fn complete(&mut self, request: Option<Request>) {
        if let Some(request) = request {
            let done = request.send(&self.api).await;
            self.dispatch(done);
        }
    }

    /// Activate `mode`, waiting for the search gallery mode runs on entry
    pub async fn switch_mode(&mut self, mode: Mode) {
        let request = self.begin_switch_mode(mode);
        self.complete(request).await;
    }

    /// Follow a tag into the gallery and wait for the search
    ///
    /// Returns `false` when the tag click was ignored.
    pub async fn select_tag(&mut self, tag: &str) -> bool {
        let request = self.begin_select_tag(tag);
        let accepted = request.is_some();
        self.complete(request).await;
        accepted
    }

    /// Route one user intent and wait for the request it issues
    ///
    /// The coordinator stays borrowed until the response arrives. Dropping
    /// the future early leaves the request unanswered, so a caller that
    /// must keep accepting intents meanwhile uses [`Self::dispatch`].
    pub async fn update(&mut self, message: Message) {
        let request = self.dispatch(message);
        self.complete(request).await;
    }

    /// Look up one gallery image; gallery state is left as is
    ///
    /// # Errors
    ///
    /// Returns the `ApiError` of the lookup.
    pub async fn view_details(&self, id: i64) -> Result<ImageDetails, ApiError> {
        gallery::view_details(&self.api, id).await
    }
}
