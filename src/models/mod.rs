// src/models/mod.rs

//! Domain models for the lottery updater.

mod config;
mod drawing;

pub use config::{Config, FeedConfig, LoggingConfig, StorageConfig};
pub use drawing::{CacheDocument, DateRange, Drawing, DrawingNumbers, Tier};

/// One raw entry of the results feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeedEntry {
    /// Plain-text period label, e.g. `101年09月、10`
    pub title: String,
    /// Markup listing the tiers and winning numbers
    pub summary: String,
}

/// Result of one (possibly conditional) feed fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Modification token reported by the server or feed metadata
    pub modified: Option<String>,
    /// Entries in feed order (newest first)
    pub entries: Vec<FeedEntry>,
    /// Server answered 304 Not Modified
    pub not_modified: bool,
}

impl FeedSnapshot {
    /// Snapshot for a 304 response: the token is unchanged and there is no body.
    pub fn not_modified(token: Option<String>) -> Self {
        Self {
            modified: token,
            entries: Vec::new(),
            not_modified: true,
        }
    }
}
