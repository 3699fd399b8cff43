//! Visual QA - client for an image object-detection service
//!
//! This library provides the client-side interaction core: submitting an
//! image for detection, following its tags into a filtered gallery of
//! previously analyzed images, and looking up details of one image.
//!
//! # Architecture
//!
//! - `api`: wire types, query building and the HTTP client behind the
//!   [`api::ImageApi`] trait
//! - `controllers`: upload and gallery state machines plus the
//!   [`controllers::ModeCoordinator`] that switches between them
//! - `config`: persisted settings (service URL, defaults)
//! - `output`, `commands`, `cli`: the `vqa` command-line front end

use thiserror::Error;

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controllers;
pub mod output;

#[cfg(test)]
pub mod testing;

pub use api::{ApiError, GalleryQuery, HttpClient, ImageApi};
pub use controllers::{GalleryController, Mode, ModeCoordinator, UploadController};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum VqaError {
    /// Backend operation failed
    #[error(transparent)]
    Api(#[from] api::ApiError),
    /// HTTP client could not be set up
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization of machine-readable output failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// An operation ended with an error recorded by a controller
    #[error("{0}")]
    Failed(String),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
