// Archive compression modules
pub mod common;
pub mod zip_handler;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use crate::core::file_ops::resolve_destination;
use crate::models::{ArchiveEntry, ArchiveError, CodecOptions};
use common::ArchiveHandler;
use zip_handler::ZipHandler;

/// Archive processor that runs the two pipelines
///
/// Workflow:
/// 1. Zip: resolve the archive path, then write the source into it
/// 2. Unzip: pick the destination directory, then extract every entry into it
pub struct ArchiveProcessor {
    handler: Arc<dyn ArchiveHandler>,
}

impl ArchiveProcessor {
    /// Create a processor with the default codec options
    pub fn new() -> Self {
        Self::with_options(CodecOptions::default())
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            handler: Arc::new(ZipHandler::with_options(options)),
        }
    }

    /// Archive `source` (a file or directory)
    ///
    /// # Arguments
    /// * `source` - File or directory to archive
    /// * `destination` - Optional target: a directory (trailing separator) or a full file path
    /// * `password` - Optional password; empty means no encryption
    ///
    /// # Returns
    /// * Path of the written archive
    pub fn create_archive(
        &self,
        source: &Path,
        destination: Option<&str>,
        password: Option<&str>,
    ) -> Result<PathBuf, ArchiveError> {
        let output_path = resolve_destination(source, destination);
        self.handler.create(source, &output_path, password)?;

        info!(source = %source.display(), archive = %output_path.display(), "Archive created");
        Ok(output_path)
    }

    /// Extract `archive_path` into `destination`
    ///
    /// # Arguments
    /// * `archive_path` - ZIP archive to extract
    /// * `destination` - Target directory; defaults to the archive's own directory
    /// * `password` - Password for encrypted archives
    ///
    /// # Returns
    /// * Paths of the extracted files, in archive order
    pub fn extract_archive(
        &self,
        archive_path: &Path,
        destination: Option<&str>,
        password: Option<&str>,
    ) -> Result<Vec<PathBuf>, ArchiveError> {
        let dest_dir = match destination.filter(|d| !d.is_empty()) {
            Some(dest) => PathBuf::from(dest),
            None => default_extract_dir(archive_path),
        };

        let extracted = self.handler.extract(archive_path, &dest_dir, password)?;

        info!(
            archive = %archive_path.display(),
            destination = %dest_dir.display(),
            files = extracted.len(),
            "Archive extracted"
        );
        Ok(extracted)
    }

    /// List the entries of an archive in header order
    pub fn list_entries(&self, archive_path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        self.handler.entries(archive_path)
    }
}

impl Default for ArchiveProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn default_extract_dir(archive_path: &Path) -> PathBuf {
    match archive_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;
    use std::fs;
    use tempfile::TempDir;
    use zip::{write::FileOptions, ZipWriter};

    fn create_test_files(dir: &Path) {
        fs::create_dir_all(dir.join("subdir/nested")).unwrap();
        fs::write(dir.join("file1.txt"), b"test content 1").unwrap();
        fs::write(dir.join("subdir/file2.txt"), b"test content 2").unwrap();
        fs::write(dir.join("subdir/nested/file3.bin"), vec![0u8, 1, 2, 3, 255]).unwrap();
    }

    fn assert_same_tree(expected: &Path, actual: &Path) {
        for entry in walkdir::WalkDir::new(expected).min_depth(1) {
            let entry = entry.unwrap();
            let relative = entry.path().strip_prefix(expected).unwrap();
            let counterpart = actual.join(relative);
            if entry.file_type().is_dir() {
                assert!(counterpart.is_dir(), "missing directory {}", relative.display());
            } else {
                assert_eq!(
                    fs::read(entry.path()).unwrap(),
                    fs::read(&counterpart).unwrap(),
                    "content differs for {}",
                    relative.display()
                );
            }
        }
    }

    #[test]
    fn test_round_trip_without_password() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("photos");
        create_test_files(&source);

        let processor = ArchiveProcessor::new();
        let archive = processor.create_archive(&source, None, None).unwrap();
        assert_eq!(archive, temp.path().join("photos.zip"));

        let out = temp.path().join("restored");
        processor.extract_archive(&archive, out.to_str(), None).unwrap();
        assert_same_tree(&source, &out);
    }

    #[test]
    fn test_round_trip_with_password() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("photos");
        create_test_files(&source);

        let processor = ArchiveProcessor::new();
        let archive = processor.create_archive(&source, None, Some("pa55")).unwrap();

        let out = temp.path().join("restored");
        processor.extract_archive(&archive, out.to_str(), Some("pa55")).unwrap();
        assert_same_tree(&source, &out);
    }

    #[test]
    fn test_encryption_gate() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("docs");
        create_test_files(&source);
        let processor = ArchiveProcessor::new();

        let locked = processor.create_archive(&source, Some(temp.path().join("locked.zip").to_str().unwrap()), Some("k")).unwrap();
        let err = processor.extract_archive(&locked, temp.path().join("x").to_str(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decryption);

        let open = processor.create_archive(&source, Some(temp.path().join("open.zip").to_str().unwrap()), None).unwrap();
        let files = processor.extract_archive(&open, temp.path().join("y").to_str(), Some("whatever")).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_extract_creates_missing_destination() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("docs");
        create_test_files(&source);
        let processor = ArchiveProcessor::new();
        let archive = processor.create_archive(&source, None, None).unwrap();

        let out = temp.path().join("a").join("b").join("c");
        processor.extract_archive(&archive, out.to_str(), None).unwrap();

        let mut found: Vec<_> = walkdir::WalkDir::new(&out)
            .min_depth(1)
            .into_iter()
            .map(|e| e.unwrap().path().strip_prefix(&out).unwrap().to_path_buf())
            .collect();
        found.sort();
        let expected: Vec<PathBuf> = vec![
            "file1.txt".into(),
            "subdir".into(),
            Path::new("subdir").join("file2.txt"),
            Path::new("subdir").join("nested"),
            Path::new("subdir").join("nested").join("file3.bin"),
        ];
        assert_eq!(found, expected);
    }

    #[test]
    fn test_extract_defaults_to_archive_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("input").join("report.txt");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"quarterly").unwrap();

        let processor = ArchiveProcessor::new();
        let out_dir = format!("{}/", temp.path().join("archives").display());
        let archive = processor.create_archive(&file, Some(out_dir.as_str()), None).unwrap();
        assert_eq!(archive, temp.path().join("archives").join("report.zip"));

        let files = processor.extract_archive(&archive, None, None).unwrap();
        assert_eq!(files, vec![temp.path().join("archives").join("report.txt")]);
    }

    #[test]
    fn test_entry_listing_order_skips_directories() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("ordered.zip");
        {
            let mut zip = ZipWriter::new(fs::File::create(&archive).unwrap());
            let opts = FileOptions::<()>::default();
            zip.start_file("a.txt", opts).unwrap();
            std::io::Write::write_all(&mut zip, b"a").unwrap();
            zip.start_file("sub/b.txt", opts).unwrap();
            std::io::Write::write_all(&mut zip, b"b").unwrap();
            zip.add_directory("sub/", opts).unwrap();
            zip.finish().unwrap();
        }

        let processor = ArchiveProcessor::new();
        let names: Vec<_> = processor
            .list_entries(&archive)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.txt", "sub/b.txt", "sub/"]);

        let out = temp.path().join("out");
        let files = processor.extract_archive(&archive, out.to_str(), None).unwrap();
        assert_eq!(files, vec![out.join("a.txt"), out.join("sub").join("b.txt")]);
    }

    #[test]
    fn test_corrupt_input_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        let bogus = temp.path().join("random.zip");
        fs::write(&bogus, (0..=255u8).cycle().take(4096).collect::<Vec<_>>()).unwrap();

        let out = temp.path().join("out");
        let err = ArchiveProcessor::new()
            .extract_archive(&bogus, out.to_str(), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArchive);
        assert!(!out.exists());
    }

    #[test]
    fn test_default_extract_dir() {
        assert_eq!(default_extract_dir(Path::new("/data/a.zip")), PathBuf::from("/data"));
        assert_eq!(default_extract_dir(Path::new("a.zip")), PathBuf::from("."));
    }
}
