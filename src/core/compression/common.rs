// Archive handler trait for the container codec

use std::path::{Path, PathBuf};
use crate::models::{ArchiveEntry, ArchiveError};

/// Trait for reading and writing one archive container format
pub trait ArchiveHandler: Send + Sync {
    /// Create an archive at `output_path` from a file or the children of a directory.
    /// A non-empty `password` encrypts every file entry.
    fn create(&self, source: &Path, output_path: &Path, password: Option<&str>) -> Result<(), ArchiveError>;

    /// Extract every entry into `dest_dir`, returning the extracted file paths in
    /// archive order (directories excluded)
    fn extract(&self, archive_path: &Path, dest_dir: &Path, password: Option<&str>) -> Result<Vec<PathBuf>, ArchiveError>;

    /// List the central directory without extracting anything
    fn entries(&self, archive_path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError>;
}
