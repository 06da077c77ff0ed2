use std::fmt;

/// File-format version: four 16-bit components, ordered lexicographically
/// over `(main, major, minor, revision)`.
///
/// The version gates the header layout, so comparisons here are part of the
/// wire contract and not a cosmetic versioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileVersion {
    pub main: u16,
    pub major: u16,
    pub minor: u16,
    pub revision: u16,
}

impl FileVersion {
    /// Oldest version this codec will decode.
    pub const MIN_SUPPORTED: FileVersion = FileVersion::new(0, 16, 0, 0);

    /// First version whose file header carries an extra reserved byte.
    pub const RESERVED_BYTE_SINCE: FileVersion = FileVersion::new(0, 17, 0, 0);

    /// Version stamped on written files when the caller does not pick one.
    pub const DEFAULT_WRITE: FileVersion = FileVersion::new(0, 17, 73, 4);

    pub const fn new(main: u16, major: u16, minor: u16, revision: u16) -> FileVersion {
        FileVersion {
            main,
            major,
            minor,
            revision,
        }
    }
}

impl fmt::Display for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.main, self.major, self.minor, self.revision
        )
    }
}
