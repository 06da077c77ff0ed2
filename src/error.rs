use crate::version::FileVersion;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("string data is not valid UTF-8")]
    InvalidUtf8(#[source] std::string::FromUtf8Error),

    #[error("unsupported primitive: {0}")]
    Unsupported(&'static str),

    #[error("unknown property-tree tag {0:#04x}")]
    InvalidData(u8),

    #[error("unsupported file version {0} (minimum supported is {min})", min = FileVersion::MIN_SUPPORTED)]
    UnsupportedVersion(FileVersion),

    #[error("not a valid property-tree file")]
    InvalidFile(#[source] Box<Error>),

    #[error("invalid document text: {0}")]
    InvalidText(String),

    #[error("stream I/O failed")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(err)
        }
    }
}

impl Error {
    /// Collapse body-level decode failures into the one category the
    /// top-level caller sees. Version and UTF-8 errors pass through.
    pub(crate) fn into_invalid_file(self) -> Error {
        match self {
            Error::UnexpectedEof | Error::InvalidData(_) => Error::InvalidFile(Box::new(self)),
            other => other,
        }
    }
}
