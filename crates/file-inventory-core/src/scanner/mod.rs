pub mod entry;
pub mod walk;

use crate::error::Error;
use crate::storage::models::{ObservedEntry, UpsertOutcome};

pub use walk::{TreeWalker, WalkStats};

/// Receives every entry the walker observes, in traversal order.
pub trait EntrySink {
    fn accept(&mut self, entry: &ObservedEntry) -> Result<UpsertOutcome, Error>;
}
