use rusqlite::{Connection, Result, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const SCHEMA_VERSION: i64 = 1;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let db = Database { conn };
        db.configure_pragmas()?;
        db.migrate_schema()?;
        debug!("Opened inventory database {}", path.as_ref().display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.configure_pragmas()?;
        db.migrate_schema()?;
        Ok(db)
    }

    fn configure_pragmas(&self) -> Result<()> {
        let journal_mode: String =
            self.conn
                .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        self.conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;
        self.conn.busy_timeout(Duration::from_millis(5000))?;
        debug!("SQLite pragmas configured (journal_mode={}, 64MB cache)", journal_mode);
        Ok(())
    }

    /// Create the `files` table and its indexes if absent. Existing rows are
    /// never dropped; the inventory history is not recomputable.
    fn migrate_schema(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;

        self.conn.execute_batch(include_str!("schema.sql"))?;

        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
            debug!("Schema version {} -> {}", version, SCHEMA_VERSION);
        }
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Start the single write transaction a scan runs in. `IMMEDIATE` takes the
    /// write lock up front so no other writer can interleave with the upserts.
    /// Dropping the returned transaction without committing rolls it back.
    pub fn begin_scan(&self) -> Result<Transaction<'_>> {
        Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
    }
}
