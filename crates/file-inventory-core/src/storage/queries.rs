use super::models::*;
use super::sqlite::Database;
use rusqlite::{params, Result, Row};

const RECORD_COLUMNS: &str = "id, name, path, extension, size, is_directory, created_time, \
     modified_time, accessed_time, attributes, is_deleted, last_seen";

fn record_from_row(row: &Row<'_>) -> Result<InventoryRecord> {
    Ok(InventoryRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        path: row.get(2)?,
        extension: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        size: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
        is_directory: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
        created_time: row.get(6)?,
        modified_time: row.get(7)?,
        accessed_time: row.get(8)?,
        attributes: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        is_deleted: row.get::<_, Option<bool>>(10)?.unwrap_or(false),
        last_seen: row.get::<_, Option<i64>>(11)?.unwrap_or(0),
    })
}

impl Database {
    // ── Single records ───────────────────────────────────────────

    pub fn get_record(&self, path: &str) -> Result<Option<InventoryRecord>> {
        let sql = format!(
            "SELECT {} FROM files WHERE path = ?1 ORDER BY id LIMIT 1",
            RECORD_COLUMNS
        );
        match self
            .connection()
            .query_row(&sql, params![path], record_from_row)
        {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn count_records_with_path(&self, path: &str) -> Result<i64> {
        self.connection().query_row(
            "SELECT COUNT(*) FROM files WHERE path = ?1",
            params![path],
            |row| row.get(0),
        )
    }

    // ── Listings ─────────────────────────────────────────────────

    /// Records ordered by path. `extension` is compared against the stored,
    /// already lowercased value.
    pub fn list_records(&self, filter: &RecordFilter) -> Result<Vec<InventoryRecord>> {
        let sql = format!(
            "SELECT {} FROM files \
             WHERE (?1 IS NULL OR extension = ?1) \
               AND (?2 IS NULL OR is_deleted = ?2) \
             ORDER BY path LIMIT ?3 OFFSET ?4",
            RECORD_COLUMNS
        );
        let extension = filter.extension.as_ref().map(|e| e.to_ascii_lowercase());
        let mut stmt = self.connection().prepare(&sql)?;
        let records = stmt
            .query_map(
                params![
                    extension,
                    filter.is_deleted,
                    filter.limit.unwrap_or(-1),
                    filter.offset
                ],
                record_from_row,
            )?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn record_count(&self) -> Result<i64> {
        self.connection()
            .query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
    }

    /// Largest `last_seen` in the store, `None` when it is empty.
    pub fn latest_last_seen(&self) -> Result<Option<i64>> {
        self.connection()
            .query_row("SELECT MAX(last_seen) FROM files", [], |row| row.get(0))
    }

    pub fn inventory_summary(&self) -> Result<InventorySummary> {
        self.connection().query_row(
            "SELECT COUNT(*), \
                    COALESCE(SUM(is_deleted = 0), 0), \
                    COALESCE(SUM(is_deleted = 1), 0), \
                    COALESCE(SUM(is_directory = 1 AND is_deleted = 0), 0), \
                    COALESCE(SUM(CASE WHEN is_deleted = 0 THEN size ELSE 0 END), 0), \
                    MAX(last_seen) \
             FROM files",
            [],
            |row| {
                Ok(InventorySummary {
                    total_records: row.get(0)?,
                    live_records: row.get(1)?,
                    deleted_records: row.get(2)?,
                    directories: row.get(3)?,
                    live_bytes: row.get(4)?,
                    last_scan: row.get(5)?,
                })
            },
        )
    }
}
