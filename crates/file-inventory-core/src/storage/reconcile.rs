use super::models::{ObservedEntry, UpsertOutcome};
use crate::error::Error;
use crate::scanner::EntrySink;
use rusqlite::{params, Connection, Result, Statement};
use tracing::trace;

const UPDATE_SQL: &str = "UPDATE files SET \
     name = ?1, extension = ?2, size = ?3, is_directory = ?4, \
     created_time = ?5, modified_time = ?6, accessed_time = ?7, \
     attributes = ?8, is_deleted = 0, \
     last_seen = MAX(COALESCE(last_seen, ?9), ?9) \
     WHERE path = ?10";

const INSERT_SQL: &str = "INSERT INTO files \
     (name, path, extension, size, is_directory, created_time, \
      modified_time, accessed_time, attributes, last_seen) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const MARK_STALE_SQL: &str =
    "UPDATE files SET is_deleted = 1 WHERE last_seen < ?1 AND is_deleted = 0";

/// Upserts observed entries by path and marks unseen records stale, all
/// stamped with one scan timestamp.
///
/// Statements are prepared up front against the scan transaction's
/// connection; the update-then-insert pair is only safe while that
/// transaction holds the write lock.
pub struct Reconciler<'conn> {
    update: Statement<'conn>,
    insert: Statement<'conn>,
    mark_stale: Statement<'conn>,
    scan_time: i64,
}

impl<'conn> Reconciler<'conn> {
    pub fn new(conn: &'conn Connection, scan_time: i64) -> Result<Self> {
        Ok(Self {
            update: conn.prepare(UPDATE_SQL)?,
            insert: conn.prepare(INSERT_SQL)?,
            mark_stale: conn.prepare(MARK_STALE_SQL)?,
            scan_time,
        })
    }

    pub fn upsert(&mut self, entry: &ObservedEntry) -> Result<UpsertOutcome> {
        let updated = self.update.execute(params![
            entry.name,
            entry.extension,
            entry.size,
            entry.is_directory,
            entry.created_time,
            entry.modified_time,
            entry.accessed_time,
            entry.attributes,
            self.scan_time,
            entry.path,
        ])?;

        if updated > 0 {
            trace!("Updated {}", entry.path);
            return Ok(UpsertOutcome::Updated);
        }

        self.insert.execute(params![
            entry.name,
            entry.path,
            entry.extension,
            entry.size,
            entry.is_directory,
            entry.created_time,
            entry.modified_time,
            entry.accessed_time,
            entry.attributes,
            self.scan_time,
        ])?;
        trace!("Inserted {}", entry.path);
        Ok(UpsertOutcome::Inserted)
    }

    /// Flag every live record last seen before this scan as deleted.
    /// Returns the number of records newly marked.
    pub fn mark_stale(&mut self) -> Result<usize> {
        self.mark_stale.execute(params![self.scan_time])
    }
}

impl EntrySink for Reconciler<'_> {
    fn accept(&mut self, entry: &ObservedEntry) -> Result<UpsertOutcome, Error> {
        Ok(self.upsert(entry)?)
    }
}
