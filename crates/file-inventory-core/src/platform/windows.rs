use super::EntryTimes;
use crate::inventory::attributes::FileAttributes;
use crate::inventory::time::filetime_to_unix;
use std::fs::Metadata;
use std::os::windows::fs::MetadataExt;
use std::path::{Component, Path, PathBuf, Prefix};
use winapi::um::winnt::{
    FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_HIDDEN,
    FILE_ATTRIBUTE_NORMAL, FILE_ATTRIBUTE_READONLY, FILE_ATTRIBUTE_SYSTEM,
};

pub fn attributes_from_raw(raw: u32) -> FileAttributes {
    FileAttributes {
        read_only: raw & FILE_ATTRIBUTE_READONLY != 0,
        hidden: raw & FILE_ATTRIBUTE_HIDDEN != 0,
        system: raw & FILE_ATTRIBUTE_SYSTEM != 0,
        directory: raw & FILE_ATTRIBUTE_DIRECTORY != 0,
        archive: raw & FILE_ATTRIBUTE_ARCHIVE != 0,
        normal: raw & FILE_ATTRIBUTE_NORMAL != 0,
    }
}

pub fn native_attributes(_name: &str, metadata: &Metadata) -> FileAttributes {
    attributes_from_raw(metadata.file_attributes())
}

pub fn native_times(metadata: &Metadata) -> EntryTimes {
    EntryTimes {
        created: Some(filetime_to_unix(metadata.creation_time())),
        modified: Some(filetime_to_unix(metadata.last_write_time())),
        accessed: Some(filetime_to_unix(metadata.last_access_time())),
    }
}

/// Paths at or beyond this length need the verbatim form to be usable.
const MAX_PATH: usize = 260;

/// `\\?\C:\dir\file` -> `C:\dir\file`. `None` for anything that is not a
/// verbatim drive path, or that would be too long without the prefix.
pub fn strip_verbatim_disk(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    let letter = match components.next() {
        Some(Component::Prefix(prefix)) => match prefix.kind() {
            Prefix::VerbatimDisk(letter) => letter,
            _ => return None,
        },
        _ => return None,
    };

    let mut plain = PathBuf::from(format!("{}:\\", letter as char));
    for component in components {
        match component {
            Component::RootDir => {}
            Component::Normal(part) => plain.push(part),
            _ => return None,
        }
    }
    if plain.as_os_str().len() >= MAX_PATH {
        return None;
    }
    Some(plain)
}
