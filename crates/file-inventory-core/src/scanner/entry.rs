use crate::inventory::{extension_of, FileAttributes};
use crate::platform;
use crate::storage::models::ObservedEntry;
use std::fs::Metadata;

/// Build the observed entry for `path` from metadata read without following
/// symlinks. Directories always report a size of 0.
pub fn observe(path: &str, name: &str, metadata: &Metadata) -> ObservedEntry {
    let is_directory = metadata.is_dir();
    let times = platform::native_times(metadata);

    ObservedEntry {
        name: name.to_string(),
        path: path.to_string(),
        extension: extension_of(name),
        size: if is_directory { 0 } else { metadata.len() as i64 },
        is_directory,
        created_time: times.created,
        modified_time: times.modified,
        accessed_time: times.accessed,
        attributes: FileAttributes::from_metadata(name, metadata).encode(),
    }
}
