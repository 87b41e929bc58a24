use std::env;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE_PATH: &str = "./logs/file_inventory.log";
const DEFAULT_LEVEL: &str = "info";

/// Where the scan log is written. The scan excludes this file from the
/// inventory, so it must match what `init_logger` opens.
pub fn log_file_path() -> PathBuf {
    env::var_os("LOG_FILE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH))
}

/// Directory and file name for the appender; a bare name lands in `./`.
fn split_log_path(path: &Path) -> (PathBuf, OsString) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("file_inventory.log"));
    (dir, name)
}

/// `TRACING_LEVEL` as an `EnvFilter`, falling back to `info` when the
/// directive does not parse. The rejected directive is returned for logging.
fn level_filter(directive: Option<&str>) -> (EnvFilter, Option<String>) {
    match directive {
        None => (EnvFilter::new(DEFAULT_LEVEL), None),
        Some(d) => match EnvFilter::try_new(d) {
            Ok(filter) => (filter, None),
            Err(_) => (EnvFilter::new(DEFAULT_LEVEL), Some(d.to_string())),
        },
    }
}

/// Console output goes to stderr so the scan summary on stdout stays clean
/// for piping; the file gets timestamps and targets.
pub fn init_logger() -> WorkerGuard {
    let level = env::var("TRACING_LEVEL").ok();
    let (filter, rejected) = level_filter(level.as_deref());

    let log_path = log_file_path();
    let (log_dir, log_name) = split_log_path(&log_path);
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_target(false)
                .without_time()
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_ansi(false),
        )
        .with(filter)
        .init();

    if let Some(directive) = rejected {
        warn!("Ignoring invalid TRACING_LEVEL {:?}, using {}", directive, DEFAULT_LEVEL);
    }
    debug!("Logging to {}", log_path.display());

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("./logs/scan.log"));
        assert_eq!(dir, PathBuf::from("./logs"));
        assert_eq!(name, OsString::from("scan.log"));

        let (dir, name) = split_log_path(Path::new("scan.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsString::from("scan.log"));
    }

    #[test]
    fn test_level_filter_falls_back_on_bad_directive() {
        let (_, rejected) = level_filter(Some("debug"));
        assert_eq!(rejected, None);

        let (_, rejected) = level_filter(Some("file_inventory_core=loud"));
        assert_eq!(rejected.as_deref(), Some("file_inventory_core=loud"));

        let (_, rejected) = level_filter(None);
        assert_eq!(rejected, None);
    }
}
