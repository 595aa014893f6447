//! Service layer for the lottery updater.
//!
//! This module contains the business logic for:
//! - Period label parsing (`parse_label`)
//! - Winning number extraction (`extract_summary`)
//! - Feed retrieval (`FeedClient`)

mod feed;
mod label;
mod summary;

pub use feed::{FeedClient, FeedSource, ParsedFeed, parse_feed};
pub use label::{ERA_OFFSET, parse_label};
pub use summary::extract_summary;

use crate::error::{AppError, Result};
use crate::models::{Drawing, FeedEntry};

/// Turn one feed entry into a drawing record.
pub fn parse_entry(entry: &FeedEntry) -> Result<Drawing> {
    let numbers = extract_summary(&entry.summary)?;
    let range = parse_label(&entry.title)?;
    let drawing = Drawing::new(range, numbers);
    log::debug!("{} -> {} ({} tiers)", entry.title, drawing.range(), drawing.tiers().len());
    Ok(drawing)
}

/// Parse every entry in feed order, stopping at the first failure.
pub fn parse_entries(entries: &[FeedEntry]) -> Result<Vec<Drawing>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_entry(entry).map_err(|e| AppError::entry(index, entry.title.as_str(), e))
        })
        .collect()
}
