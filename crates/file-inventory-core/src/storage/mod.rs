pub mod models;
pub mod queries;
pub mod reconcile;
pub mod sqlite;

pub use models::{InventoryRecord, InventorySummary, ObservedEntry, RecordFilter, UpsertOutcome};
pub use reconcile::Reconciler;
pub use sqlite::Database;
