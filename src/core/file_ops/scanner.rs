use std::path::{Component, Path};
use walkdir::WalkDir;
use crate::models::{ArchiveError, SourceEntry};

/// Enumerates what goes into an archive built from a file or directory
///
/// A directory source contributes its children (not itself) walked recursively
/// in file-name order, so the same tree always yields the same entry order.
/// A file source contributes a single entry named after the file.
pub struct SourceScanner;

impl SourceScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan `source` into archive entries
    ///
    /// # Example
    /// ```ignore
    /// let entries = SourceScanner::new().scan(Path::new("/data/photos"))?;
    /// // [a.jpg, trips/, trips/b.jpg] for photos/{a.jpg, trips/b.jpg}
    /// ```
    pub fn scan(&self, source: &Path) -> Result<Vec<SourceEntry>, ArchiveError> {
        let metadata = source.metadata()?;

        if !metadata.is_dir() {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| ArchiveError::InvalidArgument(
                    format!("Source has no file name: {}", source.display())
                ))?;
            return Ok(vec![SourceEntry::new(name, source.to_path_buf(), false)]);
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(source)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            let relative = path.strip_prefix(source)
                .map_err(|e| ArchiveError::Archive(
                    format!("Failed to calculate relative path: {}", e)
                ))?;

            if path.is_dir() {
                entries.push(SourceEntry::new(entry_name(relative), path.to_path_buf(), true));
            } else if path.is_file() {
                entries.push(SourceEntry::new(entry_name(relative), path.to_path_buf(), false));
            }
        }

        Ok(entries)
    }
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Archive entry names always use `/`, whatever the host separator
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
