//! Upload command - run detection on one image

use super::{OutputOptions, Result, gallery, print_json};
use crate::VqaError;
use crate::api::{ImageApi, ImageFile};
use crate::controllers::{Message, ModeCoordinator};
use crate::output;
use colored::Colorize;
use std::path::Path;

/// Execute the upload command
///
/// With `follow`, a successful upload hands the tag over to the gallery,
/// which is then searched and printed as well.
///
/// # Errors
/// Returns an error if the file cannot be read, the upload fails, or
/// `follow` names a tag the result does not carry.
pub async fn execute<A: ImageApi>(
    app: &mut ModeCoordinator<A>,
    file: &Path,
    confidence: Option<f64>,
    follow: Option<&str>,
    opts: OutputOptions,
) -> Result<()> {
    let image = ImageFile::from_path(file).await?;

    if let Some(confidence) = confidence {
        app.update(Message::SetConfidence(confidence)).await;
    }
    if !opts.quiet && !opts.json {
        println!(
            "Analyzing {} (conf {})...",
            image.filename.bold(),
            app.upload().confidence()
        );
    }

    app.update(Message::SelectFile(Some(image))).await;
    app.update(Message::Upload).await;

    if let Some(error) = app.upload().error() {
        return Err(VqaError::Failed(error.to_string()));
    }

    if let Some(tag) = follow {
        if !app.select_tag(tag).await {
            return Err(VqaError::InvalidInput(format!(
                "Tag '{tag}' was not detected in this image"
            )));
        }
        if opts.json {
            return print_json(&app.snapshot());
        }
        return gallery::report(app, opts);
    }

    if opts.json {
        return print_json(&app.snapshot());
    }
    if let Some(result) = app.upload().result() {
        println!("{}", output::detection_result(result, opts.quiet));
        if !opts.quiet && !result.tags.is_empty() {
            println!(
                "{}",
                "Tip: pass --follow <TAG> to open the gallery filtered by that tag.".dimmed()
            );
        }
    }
    Ok(())
}
