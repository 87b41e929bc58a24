/// Trait for reporting scan progress.
///
/// The CLI implements it with an indicatif spinner. All methods have default
/// no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _root: &str) {}
    fn on_scan_progress(&self, _entries_seen: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _entries_seen: usize, _duration_secs: f64) {}
    fn on_mark_stale_complete(&self, _marked: usize) {}
    fn on_commit_complete(&self, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
