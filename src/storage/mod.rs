//! Storage abstractions for the drawing database.
//!
//! The database is a single JSON document:
//!
//! ```text
//! {
//!   "modified": "Sun, 25 Nov 2012 13:12:14 GMT",
//!   "drawings": [
//!     {"start": "2012-09-01", "end": "2012-11-01", "grand": ["11661657"]}
//!   ]
//! }
//! ```
//!
//! It is read at most once and written at most once per run. Writes replace
//! the whole document so readers see either the old or the new state.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CacheDocument;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for drawing database backends.
#[async_trait]
pub trait DrawingStore: Send + Sync {
    /// Load the database.
    ///
    /// A missing database is an empty document with no modification token.
    async fn load(&self) -> Result<CacheDocument>;

    /// Replace the database with `document`.
    async fn save(&self, document: &CacheDocument) -> Result<()>;
}
