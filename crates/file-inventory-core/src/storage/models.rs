/// One row of the `files` table: the inventory entry for a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub extension: String,
    pub size: i64,
    pub is_directory: bool,
    pub created_time: Option<i64>,
    pub modified_time: Option<i64>,
    pub accessed_time: Option<i64>,
    pub attributes: String,
    pub is_deleted: bool,
    pub last_seen: i64,
}

/// A filesystem entry as observed by the walker during one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedEntry {
    pub name: String,
    pub path: String,
    pub extension: String,
    pub size: i64,
    pub is_directory: bool,
    pub created_time: Option<i64>,
    pub modified_time: Option<i64>,
    pub accessed_time: Option<i64>,
    pub attributes: String,
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Filter for listing records.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub extension: Option<String>,
    pub is_deleted: Option<bool>,
    pub offset: i64,
    pub limit: Option<i64>,
}

/// Aggregate counts over the whole inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySummary {
    pub total_records: i64,
    pub live_records: i64,
    pub deleted_records: i64,
    pub directories: i64,
    pub live_bytes: i64,
    pub last_scan: Option<i64>,
}
