use file_inventory_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Entries between spinner message updates.
const UPDATE_EVERY: usize = 256;

/// CLI progress reporter: one spinner for the walk, a line per finished phase.
pub struct CliReporter {
    bar: ProgressBar,
}

impl CliReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        Self { bar }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &str) {
        self.bar.set_message(format!("Scanning {}...", root));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_scan_progress(&self, entries_seen: usize, _current_path: &str) {
        if entries_seen % UPDATE_EVERY == 0 {
            self.bar
                .set_message(format!("Scanning... {} entries recorded", entries_seen));
        }
    }

    fn on_scan_complete(&self, entries_seen: usize, duration_secs: f64) {
        self.bar.finish_and_clear();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} entries in {:.2}s",
            entries_seen, duration_secs
        );
    }

    fn on_mark_stale_complete(&self, marked: usize) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Stale marking complete: {} records marked deleted",
            marked
        );
    }

    fn on_commit_complete(&self, duration_secs: f64) {
        eprintln!("  \x1b[32m✓\x1b[0m Committed in {:.2}s", duration_secs);
    }
}
