// src/pipeline/update.rs

//! Database update pipeline: load → conditional fetch → parse → save.

use crate::error::Result;
use crate::models::{CacheDocument, FeedSnapshot};
use crate::services::{FeedSource, parse_entries};
use crate::storage::DrawingStore;

/// Switches for a single update run.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Ignore the cached modification token
    pub force: bool,
    /// Parse and report, but never write
    pub dry_run: bool,
}

/// What an update run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Feed unchanged; the database was not touched
    Unchanged { modified: Option<String> },
    /// Database replaced with `document`
    Updated { document: CacheDocument },
    /// Feed changed but writing was disabled
    DryRun { document: CacheDocument },
}

/// Run one update against `feed`, persisting into `store`.
///
/// Any entry that fails to parse aborts the run before anything is written.
pub async fn run_update(
    feed: &dyn FeedSource,
    store: &dyn DrawingStore,
    options: UpdateOptions,
) -> Result<UpdateOutcome> {
    let cached = store.load().await?;

    let since = if options.force {
        None
    } else {
        cached.modified.as_deref()
    };
    let snapshot = feed.fetch(since).await?;

    if !options.force && is_unchanged(&cached, &snapshot) {
        log::info!(
            "Using cached database. Last-Modified: {}",
            token(&cached.modified)
        );
        return Ok(UpdateOutcome::Unchanged {
            modified: cached.modified,
        });
    }

    let drawings = parse_entries(&snapshot.entries)?;
    let document = CacheDocument::new(snapshot.modified, drawings);

    log::info!(
        "Updating database. Last-Modified: {}",
        token(&document.modified)
    );
    match document.latest() {
        Some(latest) => log::info!("Last drawing: {}", serde_json::to_string_pretty(latest)?),
        None => log::warn!("Feed contains no drawings"),
    }

    if options.dry_run {
        log::info!("Dry run: {} drawings not written", document.drawings.len());
        return Ok(UpdateOutcome::DryRun { document });
    }

    store.save(&document).await?;
    Ok(UpdateOutcome::Updated { document })
}

/// A feed is unchanged on 304, or when it reports the token we already hold.
fn is_unchanged(cached: &CacheDocument, snapshot: &FeedSnapshot) -> bool {
    snapshot.not_modified || (snapshot.modified.is_some() && snapshot.modified == cached.modified)
}

fn token(modified: &Option<String>) -> &str {
    modified.as_deref().unwrap_or("(none)")
}
