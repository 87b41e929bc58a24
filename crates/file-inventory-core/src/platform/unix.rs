use super::EntryTimes;
use crate::inventory::attributes::FileAttributes;
use crate::inventory::time::system_time_to_unix;
use std::fs::Metadata;
use std::os::unix::fs::FileTypeExt;

/// Unix has no archive bit, so `archive` is never set. `normal` follows the
/// Windows rule of only appearing when nothing else applies.
pub fn native_attributes(name: &str, metadata: &Metadata) -> FileAttributes {
    let file_type = metadata.file_type();
    let mut attrs = FileAttributes {
        read_only: metadata.permissions().readonly(),
        hidden: name.starts_with('.'),
        system: file_type.is_fifo()
            || file_type.is_socket()
            || file_type.is_block_device()
            || file_type.is_char_device(),
        directory: file_type.is_dir(),
        archive: false,
        normal: false,
    };
    attrs.normal = attrs == FileAttributes::default();
    attrs
}

pub fn native_times(metadata: &Metadata) -> EntryTimes {
    EntryTimes {
        created: metadata.created().ok().map(system_time_to_unix),
        modified: metadata.modified().ok().map(system_time_to_unix),
        accessed: metadata.accessed().ok().map(system_time_to_unix),
    }
}
