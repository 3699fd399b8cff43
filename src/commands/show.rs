//! Show command - details of one analyzed image

use super::{OutputOptions, Result, print_json};
use crate::api::ImageApi;
use crate::controllers::ModeCoordinator;
use crate::output;

/// Execute the show command
///
/// # Errors
/// Returns an error if the lookup fails (e.g. unknown id).
pub async fn execute<A: ImageApi>(
    app: &ModeCoordinator<A>,
    id: i64,
    opts: OutputOptions,
) -> Result<()> {
    let details = app.view_details(id).await?;

    if opts.json {
        return print_json(&details);
    }

    if let Some(image) = &details.image
        && !opts.quiet
    {
        println!("{}", output::gallery_item(image, false));
    }
    println!("{}", details.summary());
    for detection in &details.detections {
        println!("{}", output::detection_row(detection));
    }
    Ok(())
}
