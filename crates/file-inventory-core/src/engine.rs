use crate::config::AppConfig;
use crate::error::Error;
use crate::inventory::time;
use crate::platform;
use crate::progress::ProgressReporter;
use crate::scanner::{TreeWalker, WalkStats};
use crate::storage::{Database, Reconciler};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Files SQLite keeps next to the database while it is open.
const SQLITE_SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Runs one scan: walk the root, upsert every entry, optionally mark unseen
/// records deleted, and commit it all as a single transaction.
pub struct ScanEngine {
    config: AppConfig,
    root: Option<PathBuf>,
    db_path: Option<PathBuf>,
    refresh: bool,
    excluded: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct ScanResult {
    pub root: PathBuf,
    pub db_path: PathBuf,
    pub refresh: bool,
    pub scan_time: i64,
    pub entries_seen: usize,
    pub files: usize,
    pub directories: usize,
    pub inserted: usize,
    pub updated: usize,
    pub marked_deleted: usize,
    pub traversal_errors: usize,
    pub write_errors: usize,
    pub walk_duration: Duration,
    pub total_duration: Duration,
}

impl ScanEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            root: None,
            db_path: None,
            refresh: false,
            excluded: Vec::new(),
        }
    }

    /// Scan `root` instead of the configured `root_path`.
    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Store the inventory at `path` instead of `<root>/<db_name>`.
    pub fn with_db_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Mark records not observed by this scan as deleted.
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Keep `path` out of the inventory, e.g. a log file written during the scan.
    pub fn exclude_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.excluded.push(path.into());
        self
    }

    /// The canonical scan root.
    pub fn resolve_root(&self) -> Result<PathBuf, Error> {
        let root = self
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.root_path));
        let canonical = canonicalize(&root).map_err(|e| Error::InvalidRoot {
            path: root.clone(),
            reason: e.to_string(),
        })?;
        if !canonical.is_dir() {
            return Err(Error::InvalidRoot {
                path: root,
                reason: "not a directory".to_string(),
            });
        }
        if canonical.to_str().is_none() {
            return Err(Error::InvalidRoot {
                path: root,
                reason: "path is not valid UTF-8".to_string(),
            });
        }
        Ok(canonical)
    }

    pub fn resolve_db_path(&self, root: &Path) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.config.db_path_for(root))
    }

    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanResult, Error> {
        let started = Instant::now();
        let root = self.resolve_root()?;
        let db_path = self.resolve_db_path(&root);
        info!(
            "Scanning {} into {} ({} mode)",
            root.display(),
            db_path.display(),
            if self.refresh { "refresh" } else { "incremental" }
        );

        let db = Database::open(&db_path)?;
        let walker = self.build_walker(&db_path, reporter);

        let tx = db.begin_scan()?;
        // Strictly after every stored last_seen, so records from a scan in the
        // same second (or before a clock step back) still count as stale.
        let scan_time = match db.latest_last_seen()? {
            Some(latest) => time::now_unix().max(latest.saturating_add(1)),
            None => time::now_unix(),
        };
        debug!("Scan timestamp {}", scan_time);

        let (stats, marked_deleted, walk_duration) = {
            let mut reconciler = Reconciler::new(&tx, scan_time)?;

            reporter.on_scan_start(&root.to_string_lossy());
            let walk_start = Instant::now();
            let mut stats: WalkStats = walker.walk(&root, &mut reconciler);
            let walk_duration = walk_start.elapsed();
            reporter.on_scan_complete(stats.entries_seen, walk_duration.as_secs_f64());
            debug!(
                "Walk completed in {:.2}s: {} entries, {} inserted, {} updated",
                walk_duration.as_secs_f64(),
                stats.entries_seen,
                stats.inserted,
                stats.updated,
            );

            let marked_deleted = if self.refresh {
                match reconciler.mark_stale() {
                    Ok(marked) => {
                        debug!("Marked {} records deleted", marked);
                        reporter.on_mark_stale_complete(marked);
                        marked
                    }
                    Err(err) => {
                        error!("Error marking stale records: {}", err);
                        stats.write_errors += 1;
                        0
                    }
                }
            } else {
                0
            };

            (stats, marked_deleted, walk_duration)
        };

        let commit_start = Instant::now();
        tx.commit()?;
        reporter.on_commit_complete(commit_start.elapsed().as_secs_f64());

        if stats.traversal_errors > 0 || stats.write_errors > 0 {
            info!(
                "{} traversal errors and {} write errors were skipped",
                stats.traversal_errors, stats.write_errors
            );
        }

        Ok(ScanResult {
            root,
            db_path,
            refresh: self.refresh,
            scan_time,
            entries_seen: stats.entries_seen,
            files: stats.files,
            directories: stats.directories,
            inserted: stats.inserted,
            updated: stats.updated,
            marked_deleted,
            traversal_errors: stats.traversal_errors,
            write_errors: stats.write_errors,
            walk_duration,
            total_duration: started.elapsed(),
        })
    }

    /// Walker excluding the database, its sidecars and any extra paths, all
    /// canonicalized so they compare equal to paths joined from the root.
    fn build_walker<'a>(&self, db_path: &Path, reporter: &'a dyn ProgressReporter) -> TreeWalker<'a> {
        let db_path = canonical_or_absolute(db_path);
        let mut walker = TreeWalker::new(reporter)
            .with_ignore_patterns(&self.config.ignore_patterns)
            .exclude_path(db_path.clone());
        for suffix in SQLITE_SIDECAR_SUFFIXES {
            let mut sidecar: OsString = db_path.clone().into_os_string();
            sidecar.push(suffix);
            walker = walker.exclude_path(PathBuf::from(sidecar));
        }
        for path in &self.excluded {
            walker = walker.exclude_path(canonical_or_absolute(path));
        }
        walker
    }
}

fn canonicalize(path: &Path) -> std::io::Result<PathBuf> {
    fs::canonicalize(path).map(platform::plain_path)
}

fn canonical_or_absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = canonicalize(path) {
        return canonical;
    }
    // Not created yet: canonicalize the parent and re-attach the name.
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            canonicalize(parent)
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}
