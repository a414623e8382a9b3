//! Formatting helpers for the end-of-run report

use crate::core::pipeline::{AssetDownloadSummary, ExportData};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::time::Duration;

/// Converts an identifier to space-separated capitalized words
///
/// `contentTypes` becomes `Content Types`, `editor_interfaces` becomes
/// `Editor Interfaces`.
pub fn start_case(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in key.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Relative, human-readable rendering of an elapsed time
///
/// Uses the customary thresholds: under 45 seconds is "a few seconds",
/// under 90 seconds "a minute", under 45 minutes "N minutes", and so on up
/// to years.
pub fn humanize_duration(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();
    let minutes = (seconds / 60.0).round();
    let hours = (seconds / 3600.0).round();
    let days = (seconds / 86_400.0).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if seconds < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if days < 45.0 {
        "a month".to_string()
    } else if days < 320.0 {
        format!("{} months", (days / 30.4).round())
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        format!("{} years", (days / 365.0).round())
    }
}

fn two_column_table(title: &str, rows: impl IntoIterator<Item = (String, usize)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new(title), Cell::new("")]);
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table
}

/// "Exported entities" table, one row per populated collection
pub fn entity_table(data: &ExportData) -> Table {
    two_column_table(
        "Exported entities",
        data.iter()
            .map(|(kind, records)| (start_case(kind), records.len())),
    )
}

/// "Asset file download results" table
pub fn downloads_table(summary: &AssetDownloadSummary) -> Table {
    two_column_table(
        "Asset file download results",
        [
            ("Successful".to_string(), summary.success_count),
            ("Warnings".to_string(), summary.warning_count),
            ("Errors".to_string(), summary.error_count),
        ],
    )
}
