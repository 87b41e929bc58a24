use super::entry::observe;
use super::EntrySink;
use crate::progress::ProgressReporter;
use crate::storage::models::UpsertOutcome;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub entries_seen: usize,
    pub files: usize,
    pub directories: usize,
    pub inserted: usize,
    pub updated: usize,
    pub traversal_errors: usize,
    pub write_errors: usize,
}

/// Depth-first, pre-order directory traversal.
///
/// Symlinks are recorded but never descended, so link cycles cannot occur.
/// Unreadable directories and vanished entries are logged and skipped.
pub struct TreeWalker<'a> {
    excluded: Vec<PathBuf>,
    ignore_patterns: Vec<Pattern>,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> TreeWalker<'a> {
    pub fn new(reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            excluded: Vec::new(),
            ignore_patterns: Vec::new(),
            reporter,
        }
    }

    /// Never record or descend `path`. Compared against the joined entry
    /// path, so it must be spelled the way the walk root is.
    pub fn exclude_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    pub fn with_ignore_patterns(mut self, globs: &[String]) -> Self {
        self.ignore_patterns = globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();
        self
    }

    /// Hand every entry below `root` to `sink`. The root itself is not
    /// recorded.
    pub fn walk<S: EntrySink + ?Sized>(&self, root: &Path, sink: &mut S) -> WalkStats {
        let mut stats = WalkStats::default();
        self.visit_dir(root, sink, &mut stats);
        stats
    }

    fn is_skipped(&self, path: &Path) -> bool {
        self.excluded.iter().any(|excluded| excluded == path)
            || self
                .ignore_patterns
                .iter()
                .any(|pattern| pattern.matches_path(path))
    }

    fn visit_dir<S: EntrySink + ?Sized>(&self, dir: &Path, sink: &mut S, stats: &mut WalkStats) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Cannot open directory {}: {}", dir.display(), err);
                stats.traversal_errors += 1;
                return;
            }
        };

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Error reading entry in directory {}: {}", dir.display(), err);
                    stats.traversal_errors += 1;
                    continue;
                }
            };

            let file_name = entry.file_name();
            let path = dir.join(&file_name);
            // Paths are stored as text; a lossy conversion would let two
            // distinct names collapse onto one record.
            let (Some(name), Some(path_str)) = (file_name.to_str(), path.to_str()) else {
                warn!("Skipping path that is not valid UTF-8: {}", path.display());
                stats.traversal_errors += 1;
                continue;
            };
            if name == "." || name == ".." {
                continue;
            }

            if self.is_skipped(&path) {
                debug!("Skipping {}", path.display());
                continue;
            }

            let metadata = match fs::symlink_metadata(&path) {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!("Error getting metadata for {}: {}", path.display(), err);
                    stats.traversal_errors += 1;
                    continue;
                }
            };

            let observed = observe(path_str, name, &metadata);
            stats.entries_seen += 1;
            if observed.is_directory {
                stats.directories += 1;
            } else {
                stats.files += 1;
            }
            self.reporter
                .on_scan_progress(stats.entries_seen, &observed.path);

            match sink.accept(&observed) {
                Ok(UpsertOutcome::Inserted) => stats.inserted += 1,
                Ok(UpsertOutcome::Updated) => stats.updated += 1,
                Err(err) => {
                    error!("Error recording {}: {}", observed.path, err);
                    stats.write_errors += 1;
                }
            }

            if metadata.is_dir() {
                self.visit_dir(&path, sink, stats);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::progress::SilentReporter;
    use crate::storage::models::ObservedEntry;

    #[derive(Default)]
    struct Collect(Vec<ObservedEntry>);

    impl EntrySink for Collect {
        fn accept(&mut self, entry: &ObservedEntry) -> Result<UpsertOutcome, Error> {
            self.0.push(entry.clone());
            Ok(UpsertOutcome::Inserted)
        }
    }

    /// Rejects entries with the given name but keeps collecting the rest.
    struct RejectNamed {
        name: &'static str,
        seen: Vec<String>,
    }

    impl EntrySink for RejectNamed {
        fn accept(&mut self, entry: &ObservedEntry) -> Result<UpsertOutcome, Error> {
            if entry.name == self.name {
                return Err(Error::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                    Some("database or disk is full".to_string()),
                )));
            }
            self.seen.push(entry.name.clone());
            Ok(UpsertOutcome::Updated)
        }
    }

    fn names(sink: &Collect) -> Vec<String> {
        let mut names: Vec<String> = sink.0.iter().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_empty_root() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = Collect::default();
        let stats = TreeWalker::new(&SilentReporter).walk(tmp.path(), &mut sink);
        assert!(sink.0.is_empty());
        assert_eq!(stats, WalkStats::default());
    }

    #[test]
    fn test_nested_tree_is_pre_order() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("top.txt"), "top").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("nested.md"), "nested").unwrap();

        let mut sink = Collect::default();
        let stats = TreeWalker::new(&SilentReporter).walk(root, &mut sink);

        assert_eq!(names(&sink), vec!["nested.md", "sub", "top.txt"]);
        assert_eq!(stats.entries_seen, 3);
        assert_eq!(stats.files, 2);
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.inserted, 3);

        let sub_pos = sink.0.iter().position(|e| e.name == "sub").unwrap();
        let nested_pos = sink.0.iter().position(|e| e.name == "nested.md").unwrap();
        assert!(sub_pos < nested_pos);

        let nested = &sink.0[nested_pos];
        assert_eq!(
            PathBuf::from(&nested.path),
            root.join("sub").join("nested.md")
        );
        assert!(sink.0[sub_pos].is_directory);
        assert_eq!(sink.0[sub_pos].size, 0);
    }

    #[test]
    fn test_excluded_path_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("file_inventory.db"), "sqlite").unwrap();
        fs::write(root.join("keep.txt"), "keep").unwrap();

        let mut sink = Collect::default();
        TreeWalker::new(&SilentReporter)
            .exclude_path(root.join("file_inventory.db"))
            .walk(root, &mut sink);

        assert_eq!(names(&sink), vec!["keep.txt"]);
    }

    #[test]
    fn test_ignore_pattern_skips_subtree() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("node_modules").join("pkg")).unwrap();
        fs::write(root.join("node_modules").join("pkg").join("index.js"), "x").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("debug.log"), "log").unwrap();

        let mut sink = Collect::default();
        TreeWalker::new(&SilentReporter)
            .with_ignore_patterns(&[
                "*/node_modules".to_string(),
                "*.log".to_string(),
                "[invalid".to_string(),
            ])
            .walk(root, &mut sink);

        assert_eq!(names(&sink), vec!["main.rs"]);
    }

    #[test]
    fn test_sink_failure_does_not_stop_descent() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("broken")).unwrap();
        fs::write(root.join("broken").join("inner.txt"), "inner").unwrap();
        fs::write(root.join("sibling.txt"), "sibling").unwrap();

        let mut sink = RejectNamed {
            name: "broken",
            seen: Vec::new(),
        };
        let stats = TreeWalker::new(&SilentReporter).walk(root, &mut sink);

        sink.seen.sort();
        assert_eq!(sink.seen, vec!["inner.txt", "sibling.txt"]);
        assert_eq!(stats.write_errors, 1);
        assert_eq!(stats.updated, 2);
    }

    #[test]
    fn test_missing_root_is_traversal_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = Collect::default();
        let stats = TreeWalker::new(&SilentReporter).walk(&tmp.path().join("gone"), &mut sink);
        assert!(sink.0.is_empty());
        assert_eq!(stats.traversal_errors, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret.txt"), "secret").unwrap();
        fs::write(root.join("open.txt"), "open").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::read_dir(&locked).is_ok() {
            // Running with privileges that bypass permission bits.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut sink = Collect::default();
        let stats = TreeWalker::new(&SilentReporter).walk(root, &mut sink);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(names(&sink), vec!["locked", "open.txt"]);
        assert_eq!(stats.traversal_errors, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_skipped_not_merged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("ok.txt"), "ok").unwrap();
        for raw in [&b"a\xff"[..], &b"a\xfe"[..]] {
            if fs::write(root.join(OsStr::from_bytes(raw)), "x").is_err() {
                // Filesystem only accepts UTF-8 names.
                return;
            }
        }

        let mut sink = Collect::default();
        let stats = TreeWalker::new(&SilentReporter).walk(root, &mut sink);

        assert_eq!(names(&sink), vec!["ok.txt"]);
        assert_eq!(stats.entries_seen, 1);
        assert_eq!(stats.traversal_errors, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("dir")).unwrap();
        std::os::unix::fs::symlink(root, root.join("dir").join("loop")).unwrap();

        let mut sink = Collect::default();
        let stats = TreeWalker::new(&SilentReporter).walk(root, &mut sink);

        assert_eq!(names(&sink), vec!["dir", "loop"]);
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.files, 1);
    }
}
