// src/error.rs

//! Unified error handling for the lottery updater.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for lottery operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Cache file exists but is not valid JSON
    #[error("Cache file {path} is corrupt: {message}")]
    CacheCorrupt { path: String, message: String },

    /// Feed could not be retrieved or decoded
    #[error("Feed unavailable at {url}: {message}")]
    FeedUnavailable { url: String, message: String },

    /// Drawing title does not match `{year}年{month}月、{month}`
    #[error("Malformed drawing label '{label}': {reason}")]
    MalformedLabel { label: String, reason: String },

    /// Summary chunk without a full-width colon
    #[error("Malformed drawing summary chunk '{chunk}'")]
    MalformedSummary { chunk: String },

    /// Tier label outside the known set
    #[error("Unknown prize tier '{label}'")]
    UnknownTier { label: String },

    /// A single feed entry failed to parse
    #[error("Feed entry #{index} ('{title}'): {source}")]
    Entry {
        index: usize,
        title: String,
        #[source]
        source: Box<AppError>,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a cache corruption error for the given file.
    pub fn cache_corrupt(path: &Path, message: impl fmt::Display) -> Self {
        Self::CacheCorrupt {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a feed retrieval error.
    pub fn feed(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::FeedUnavailable {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a malformed label error.
    pub fn label(label: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::MalformedLabel {
            label: label.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap an error with the feed entry it came from.
    pub fn entry(index: usize, title: impl Into<String>, source: AppError) -> Self {
        Self::Entry {
            index,
            title: title.into(),
            source: Box::new(source),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Process exit status for this error.
    ///
    /// A corrupt cache exits with 1; everything else exits with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CacheCorrupt { .. } => 1,
            _ => 2,
        }
    }
}
