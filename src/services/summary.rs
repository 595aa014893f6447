// src/services/summary.rs

//! Drawing summary extraction.
//!
//! A summary is a markup snippet such as
//! `<p>特別獎：15719324</p><p>頭獎：64718986、49313179</p>`. Every text chunk
//! between tags is one `{tier}：{numbers}` segment.

use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{DrawingNumbers, Tier};

/// Separates the tier label from its numbers.
const TIER_SEPARATOR: char = '：';

/// Separates winning numbers within a tier.
const NUMBER_SEPARATOR: char = '、';

/// Extract winning numbers by tier from summary markup.
///
/// Returns a fresh map on every call. A tier listed twice keeps the last
/// occurrence. Unknown tier labels and chunks without a colon are errors.
pub fn extract_summary(markup: &str) -> Result<DrawingNumbers> {
    let fragment = Html::parse_fragment(markup);
    let mut numbers = DrawingNumbers::new();

    for chunk in fragment.root_element().text() {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let (tier, values) = parse_chunk(chunk)?;
        log::debug!("{} ({}): {} number(s)", tier.label(), tier, values.len());
        numbers.insert(tier, values);
    }

    Ok(numbers)
}

/// Parse one `{tier}：{numbers}` segment.
fn parse_chunk(chunk: &str) -> Result<(Tier, Vec<String>)> {
    let (label, blob) = chunk
        .split_once(TIER_SEPARATOR)
        .ok_or_else(|| AppError::MalformedSummary {
            chunk: chunk.to_string(),
        })?;

    let label = label.trim();
    let tier = Tier::from_label(label).ok_or_else(|| AppError::UnknownTier {
        label: label.to_string(),
    })?;

    let values = blob
        .split(NUMBER_SEPARATOR)
        .map(|n| n.trim().to_string())
        .collect();

    Ok((tier, values))
}
