//! Output formatting for CLI display
//!
//! This module turns controller state into terminal text: detection
//! tables, tag chips, gallery listings and detail summaries.

use crate::api::{Detection, DetectionResult, GalleryItem};
use chrono::Local;
use colored::Colorize;

/// Hint printed when an upload produced no detections
pub const NO_DETECTIONS_HINT: &str = "No detections (try lowering conf to 0.2)";

/// Hint printed when the gallery came back empty
pub const EMPTY_GALLERY_HINT: &str = "No results. Try without a tag or with a lower min_conf.";

/// Format a detection as a table row with a three-decimal confidence
#[must_use]
pub fn detection_row(detection: &Detection) -> String {
    format!("  {:<20} {:.3}", detection.label, detection.confidence)
}

/// Format the tags of a result on one line
#[must_use]
pub fn tag_line(tags: &[String]) -> String {
    if tags.is_empty() {
        "Nothing detected".dimmed().to_string()
    } else {
        tags.iter()
            .map(|t| format!("[{}]", t.cyan()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Full rendering of an upload result
#[must_use]
pub fn detection_result(result: &DetectionResult, quiet: bool) -> String {
    if quiet {
        return result.tags.join("\n");
    }

    let mut lines = vec![
        format!("Image: {}", result.image.url),
        format!("Tags: {}", tag_line(&result.tags)),
        format!("Detections ({})", result.detections.len()).bold().to_string(),
    ];

    if result.detections.is_empty() {
        lines.push(format!("  {}", NO_DETECTIONS_HINT.dimmed()));
    } else {
        lines.push(format!("  {:<20} {}", "Label".underline(), "Conf".underline()));
        lines.extend(result.detections.iter().map(detection_row));
    }
    lines.join("\n")
}

/// Format a gallery item, showing its creation time in local time
#[must_use]
pub fn gallery_item(item: &GalleryItem, quiet: bool) -> String {
    if quiet {
        return item.url.clone();
    }
    let created = item.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    format!(
        "  #{} {} {}\n     {}",
        item.id.to_string().bold(),
        item.filename,
        created.to_string().dimmed(),
        item.url
    )
}
