//! Pipeline entry points.
//!
//! - `run_update`: Refresh the drawing database from the feed
//! - `run_validate`: Check configuration values

pub mod update;
pub mod validate;

pub use update::{UpdateOptions, UpdateOutcome, run_update};
pub use validate::run_validate;
