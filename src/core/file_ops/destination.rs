use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::{debug, warn};

/// Extension appended to every derived archive name
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Compute where the archive for `source` should be written
///
/// # Behavior
/// - No destination: `<parent>/<name>.zip` for a directory source,
///   `<parent>/<stem>.zip` for a file source
/// - Destination ending in a separator: the directory is created if missing and
///   the derived file name is appended
/// - Any other destination: its parent directory is created if missing and the
///   destination is returned as-is, whatever its extension
///
/// Directory creation failures are logged and otherwise ignored; opening the
/// archive afterwards reports the real problem.
pub fn resolve_destination(source: &Path, destination: Option<&str>) -> PathBuf {
    let resolved = match destination.filter(|d| !d.is_empty()) {
        None => {
            let parent = source.parent().unwrap_or_else(|| Path::new(""));
            parent.join(archive_file_name(source))
        }
        Some(dest) if ends_with_separator(dest) => {
            ensure_directory(Path::new(dest));
            Path::new(dest).join(archive_file_name(source))
        }
        Some(dest) => {
            if let Some(parent) = Path::new(dest).parent() {
                ensure_directory(parent);
            }
            PathBuf::from(dest)
        }
    };

    debug!(source = %source.display(), destination = ?destination, resolved = %resolved.display(), "Resolved archive destination");
    resolved
}

/// `<name>.zip` for directories, `<stem>.zip` for files
pub fn archive_file_name(source: &Path) -> OsString {
    let base = if source.is_dir() {
        source.file_name()
    } else {
        source.file_stem()
    };
    let mut name = base.map_or_else(|| OsString::from("archive"), |b| b.to_os_string());
    name.push(".");
    name.push(ARCHIVE_EXTENSION);
    name
}

fn ends_with_separator(path: &str) -> bool {
    path.ends_with('/') || path.ends_with(MAIN_SEPARATOR)
}

fn ensure_directory(dir: &Path) {
    if dir.as_os_str().is_empty() || dir.exists() {
        return;
    }
    if let Err(e) = fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "Failed to create destination directory");
    }
}
