//! Visual QA CLI application entry point
//!
//! This is the main executable for the detection-service client. It uploads
//! images for object detection and browses the gallery of analyzed images.
//!
//! # Usage
//!
//! ```bash
//! # Analyze an image with the configured confidence threshold
//! vqa upload photo.jpg
//!
//! # Analyze and jump to every stored image with the same tag
//! vqa upload photo.jpg --conf 0.5 --follow person
//!
//! # Browse the gallery
//! vqa gallery --tag dog --min-conf 0.6 --limit 10
//!
//! # Details of one image
//! vqa show 42
//!
//! # Verbose logging (or RUST_LOG=visual_qa=debug)
//! vqa -vv gallery
//! ```
//!
//! # Configuration
//!
//! Settings live in the user's config directory
//! (`~/.config/visual-qa/config.toml` on Linux) and are created with
//! defaults on first run.

use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use visual_qa::{
    HttpClient, ModeCoordinator, VqaError,
    cli::{Cli, Commands},
    commands::{self, OutputOptions},
    config::AppConfig,
};

type Result<T> = std::result::Result<T, VqaError>;

/// Install the stderr log subscriber; `RUST_LOG` wins over `-v`
fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = AppConfig::config_path()?;

    if let Commands::Config { command } = &cli.command {
        return commands::config(command, &config_path, cli.quiet);
    }

    let mut config = AppConfig::load_from(&config_path)?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    let opts = OutputOptions {
        quiet: cli.quiet || config.quiet,
        json: cli.json,
    };

    tracing::debug!(base_url = %config.base_url, prefix = %config.api_prefix, "using service");
    let api = HttpClient::from_config(&config)?;
    let mut app = ModeCoordinator::from_config(api, &config);

    match cli.command {
        Commands::Upload {
            file,
            confidence,
            follow,
        } => commands::upload(&mut app, &file, confidence, follow.as_deref(), opts).await,
        Commands::Gallery {
            tag,
            min_conf,
            limit,
        } => commands::gallery(&mut app, tag, min_conf, limit, opts).await,
        Commands::Show { id } => commands::show(&app, id, opts).await,
        Commands::Config { .. } => Ok(()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.log_level());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "❌".red());
            ExitCode::FAILURE
        }
    }
}
