use crate::platform;
use std::fs::Metadata;

/// Normalized file classification flags.
///
/// Encoded as one character per set flag in the fixed order `R H S D A N`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FileAttributes {
    pub read_only: bool,
    pub hidden: bool,
    pub system: bool,
    pub directory: bool,
    pub archive: bool,
    pub normal: bool,
}

impl FileAttributes {
    /// Derive attributes from metadata read without following symlinks.
    pub fn from_metadata(name: &str, metadata: &Metadata) -> Self {
        platform::native_attributes(name, metadata)
    }

    pub fn encode(&self) -> String {
        let flags = [
            (self.read_only, 'R'),
            (self.hidden, 'H'),
            (self.system, 'S'),
            (self.directory, 'D'),
            (self.archive, 'A'),
            (self.normal, 'N'),
        ];
        flags
            .iter()
            .filter(|(set, _)| *set)
            .map(|(_, c)| *c)
            .collect()
    }
}

/// Lowercased text after the last `.` of a file name.
/// Names without a dot, or whose only dot leads the name, have no extension.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx + 1..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.TXT"), "txt");
        assert_eq!(extension_of(".gitignore"), "");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of("a.b.c"), "c");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(".config.Yml"), "yml");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(FileAttributes::default().encode(), "");
    }

    #[test]
    fn test_encode_canonical_order() {
        let all = FileAttributes {
            read_only: true,
            hidden: true,
            system: true,
            directory: true,
            archive: true,
            normal: true,
        };
        assert_eq!(all.encode(), "RHSDAN");

        let some = FileAttributes {
            archive: true,
            read_only: true,
            directory: true,
            ..FileAttributes::default()
        };
        assert_eq!(some.encode(), "RDA");
    }

    #[test]
    fn test_encode_deterministic() {
        let attrs = FileAttributes {
            hidden: true,
            directory: true,
            ..FileAttributes::default()
        };
        let first = attrs.encode();
        for _ in 0..10 {
            assert_eq!(attrs.encode().as_bytes(), first.as_bytes());
        }
        assert_eq!(first, "HD");
    }

    #[cfg(unix)]
    #[test]
    fn test_from_metadata_directory_and_hidden() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(".cache");
        std::fs::create_dir(&dir).unwrap();
        let metadata = std::fs::symlink_metadata(&dir).unwrap();
        let attrs = FileAttributes::from_metadata(".cache", &metadata);
        assert!(attrs.directory);
        assert!(attrs.hidden);
        assert!(!attrs.normal);
        assert!(!attrs.archive);
        assert_eq!(attrs.encode(), "HD");
    }

    #[cfg(unix)]
    #[test]
    fn test_from_metadata_plain_and_read_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();

        let metadata = std::fs::symlink_metadata(&file).unwrap();
        assert_eq!(FileAttributes::from_metadata("notes.txt", &metadata).encode(), "N");

        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o444)).unwrap();
        let metadata = std::fs::symlink_metadata(&file).unwrap();
        assert_eq!(FileAttributes::from_metadata("notes.txt", &metadata).encode(), "R");
    }
}
