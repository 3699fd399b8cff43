//! Gallery command - list analyzed images

use super::{OutputOptions, Result, print_json};
use crate::VqaError;
use crate::api::ImageApi;
use crate::controllers::{Message, Mode, ModeCoordinator};
use crate::output;
use colored::Colorize;

/// Execute the gallery command
///
/// Filters not given on the command line keep their defaults; switching
/// into gallery mode then runs the search.
///
/// # Errors
/// Returns an error if the search fails.
pub async fn execute<A: ImageApi>(
    app: &mut ModeCoordinator<A>,
    tag: Option<String>,
    min_conf: Option<f64>,
    limit: Option<u32>,
    opts: OutputOptions,
) -> Result<()> {
    if let Some(tag) = tag {
        app.update(Message::SetTagFilter(tag)).await;
    }
    if let Some(min_conf) = min_conf {
        app.update(Message::SetMinConf(min_conf)).await;
    }
    if let Some(limit) = limit {
        app.update(Message::SetLimit(limit)).await;
    }

    if app.mode() == Mode::Gallery {
        app.update(Message::Search).await;
    } else {
        app.update(Message::SwitchMode(Mode::Gallery)).await;
    }

    if opts.json {
        return print_json(&app.snapshot());
    }
    report(app, opts)
}

/// Print the gallery state, or its error
///
/// # Errors
/// Returns `VqaError::Failed` if the last search failed.
pub fn report<A: ImageApi>(app: &ModeCoordinator<A>, opts: OutputOptions) -> Result<()> {
    let gallery = app.gallery();
    if let Some(error) = gallery.error() {
        return Err(VqaError::Failed(error.to_string()));
    }

    if !opts.quiet {
        println!("{}", gallery.summary().bold());
    }
    for item in gallery.items() {
        println!("{}", output::gallery_item(item, opts.quiet));
    }
    if !opts.quiet && gallery.items().is_empty() {
        println!("{}", output::EMPTY_GALLERY_HINT.dimmed());
    }
    Ok(())
}
