use thiserror::Error;
use zip::result::ZipError;

/// Error types for the archive pipelines
///
/// Every variant except `UnsupportedOperation` collapses into a plain `fail`
/// reply at the command boundary; the variants exist so logs and tests can
/// tell the failures apart.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Corrupted archive: {0}")]
    InvalidArchive(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not implemented: {0}")]
    UnsupportedOperation(String),
}

/// Coarse failure category, used to assert on the kind of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArchive,
    Decryption,
    Io,
    InvalidInput,
    UnsupportedOperation,
}

impl ArchiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArchiveError::InvalidArchive(_) => ErrorKind::InvalidArchive,
            ArchiveError::Decryption(_) => ErrorKind::Decryption,
            ArchiveError::Io(_) | ArchiveError::Archive(_) => ErrorKind::Io,
            ArchiveError::InvalidArgument(_) | ArchiveError::InvalidConfig(_) => {
                ErrorKind::InvalidInput
            }
            ArchiveError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
        }
    }
}

impl From<ZipError> for ArchiveError {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(e) => ArchiveError::Io(e),
            ZipError::InvalidPassword => {
                ArchiveError::Decryption("invalid password".to_string())
            }
            ZipError::UnsupportedArchive(msg) if msg == ZipError::PASSWORD_REQUIRED => {
                ArchiveError::Decryption("archive is encrypted and no password was given".to_string())
            }
            ZipError::FileNotFound => {
                ArchiveError::InvalidArchive("entry missing from central directory".to_string())
            }
            other => ArchiveError::InvalidArchive(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        ArchiveError::Io(err.into())
    }
}
