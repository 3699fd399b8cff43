//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for `vqa` using the `clap` crate.
//! The CLI is a thin presentation layer: each command drives the
//! controllers and prints their resulting state.
//!
//! # Commands
//!
//! - **upload**: run detection on an image, optionally following a tag
//!   into the gallery
//! - **gallery**: list analyzed images filtered by tag and confidence
//! - **show**: print tags and detections of one image
//! - **config**: inspect and edit persisted settings
//!
//! # Examples
//!
//! ```bash
//! vqa upload street.jpg --conf 0.5
//! vqa upload street.jpg --follow person
//! vqa gallery -t person --min-conf 0.6 -n 10
//! vqa show 42
//! vqa config set base_url http://localhost:8080
//! ```

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "vqa")]
#[command(
    about = "Upload images for object detection and browse analyzed images",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Print controller state as JSON instead of formatted text
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Service base URL (overrides config)
    #[arg(long = "url", global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Upload an image and show its detections
    #[command(visible_alias = "u")]
    Upload {
        /// Image file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Confidence threshold for detection (overrides config)
        #[arg(short = 'c', long = "conf", value_name = "CONF")]
        confidence: Option<f64>,

        /// After a successful upload, open the gallery filtered by this tag
        #[arg(short = 'f', long = "follow", value_name = "TAG")]
        follow: Option<String>,
    },

    /// List previously analyzed images
    #[command(visible_alias = "g")]
    Gallery {
        /// Only images with this tag
        #[arg(short = 't', long = "tag", value_name = "TAG")]
        tag: Option<String>,

        /// Only detections at or above this confidence
        #[arg(short = 'm', long = "min-conf", value_name = "CONF")]
        min_conf: Option<f64>,

        /// Maximum number of images (overrides config)
        #[arg(short = 'n', long = "limit", value_name = "N")]
        limit: Option<u32>,
    },

    /// Show tags and detections of one image
    #[command(visible_alias = "s")]
    Show {
        /// Image id as listed by `gallery`
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,

    /// Print the path of the configuration file
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. base_url, confidence, gallery_limit)
        #[arg(value_name = "KEY")]
        key: String,

        /// New value
        #[arg(value_name = "VALUE")]
        value: String,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log directive for the `-v` count
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
