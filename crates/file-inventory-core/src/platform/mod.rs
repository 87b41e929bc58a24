//! Platform metadata shapes, reduced to the canonical flag set and epoch
//! seconds so the walker and reconciler never see them.

#[cfg(windows)]
pub mod windows;

#[cfg(unix)]
pub mod unix;

use crate::inventory::attributes::FileAttributes;
use std::fs::Metadata;
use std::path::PathBuf;

/// Creation, modification and access times in epoch seconds.
/// `None` where the platform or filesystem does not track the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryTimes {
    pub created: Option<i64>,
    pub modified: Option<i64>,
    pub accessed: Option<i64>,
}

#[cfg(windows)]
pub fn native_attributes(name: &str, metadata: &Metadata) -> FileAttributes {
    windows::native_attributes(name, metadata)
}

#[cfg(unix)]
pub fn native_attributes(name: &str, metadata: &Metadata) -> FileAttributes {
    unix::native_attributes(name, metadata)
}

#[cfg(windows)]
pub fn native_times(metadata: &Metadata) -> EntryTimes {
    windows::native_times(metadata)
}

#[cfg(unix)]
pub fn native_times(metadata: &Metadata) -> EntryTimes {
    unix::native_times(metadata)
}

/// Canonicalized paths in the form users type them. On Windows this drops the
/// `\\?\` prefix `fs::canonicalize` adds to drive paths.
#[cfg(windows)]
pub fn plain_path(path: PathBuf) -> PathBuf {
    windows::strip_verbatim_disk(&path).unwrap_or(path)
}

#[cfg(unix)]
pub fn plain_path(path: PathBuf) -> PathBuf {
    path
}
