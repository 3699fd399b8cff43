//! Interaction controllers
//!
//! Each operating mode owns an explicit, serializable state record with
//! transition methods; nothing is shared between them except through the
//! [`ModeCoordinator`].
//!
//! # Architecture
//!
//! - `upload`: pending file, confidence threshold, last result or error
//! - `gallery`: filter fields, item list, last error, detail lookups
//! - `coordinator`: active [`Mode`] and routing of [`Message`]s
//! - `sequence`: request numbering so the latest request always wins
//!
//! Every network operation comes in two shapes: a pair of synchronous
//! transitions (`begin_*` returning a ticket, `finish_*` applying an
//! outcome) and an `async` method that runs both around one [`ImageApi`]
//! call. The coordinator exposes the same split as `dispatch` plus
//! [`Request`], so a presentation layer can keep routing intents while a
//! request is pending. Errors never escape a controller; they land in its
//! `error` field.
//!
//! [`ImageApi`]: crate::api::ImageApi

pub mod coordinator;
pub mod gallery;
pub mod sequence;
pub mod upload;

pub use coordinator::{Message, Mode, ModeCoordinator, Request, Snapshot};
pub use gallery::{GalleryController, GalleryFilters, GalleryStatus, SearchTicket};
pub use sequence::{Seq, Sequencer};
pub use upload::{UploadController, UploadStatus, UploadTicket};

/// Event passed from one controller to another through the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Filter the gallery by a tag picked from an upload result
    FilterByTag(String),
}
