use std::path::{Component, Path, PathBuf};
use std::fs::{self, File};
use std::io;
use encoding_rs::Encoding;
use tracing::{debug, warn};
use zip::{ZipArchive, ZipWriter, write::FileOptions, CompressionMethod};
use zip::unstable::write::FileOptionsExt;
use crate::core::compression::common::ArchiveHandler;
use crate::core::file_ops::SourceScanner;
use crate::models::{ArchiveEntry, ArchiveError, CodecOptions, SourceEntry};

/// ZIP archive handler
///
/// Writes Deflate entries, optionally protected with the standard ZIP
/// (ZipCrypto) password scheme, and reads archives whose filenames are either
/// flagged UTF-8 or in the configured legacy charset.
pub struct ZipHandler {
    options: CodecOptions,
}

impl ZipHandler {
    pub fn new() -> Self {
        Self::with_options(CodecOptions::default())
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    fn open(&self, archive_path: &Path) -> Result<ZipArchive<File>, ArchiveError> {
        let file = File::open(archive_path)?;
        ZipArchive::new(file).map_err(|e| ArchiveError::InvalidArchive(
            format!("{} is not a valid ZIP archive: {}", archive_path.display(), e)
        ))
    }

    fn write_entries(
        &self,
        entries: &[SourceEntry],
        output: File,
        password: Option<&str>,
    ) -> Result<(), ArchiveError> {
        let mut zip = ZipWriter::new(output);

        let dir_opts = FileOptions::<()>::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o755);

        let mut file_opts = FileOptions::<()>::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.options.compression_level))
            .unix_permissions(0o644);
        if let Some(password) = password {
            file_opts = file_opts.with_deprecated_encryption(password.as_bytes());
        }

        for entry in entries {
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), dir_opts)
                    .map_err(|e| ArchiveError::Archive(
                        format!("Failed to add directory {} to archive: {}", entry.name, e)
                    ))?;
                continue;
            }

            zip.start_file(entry.name.as_str(), file_opts)
                .map_err(|e| ArchiveError::Archive(
                    format!("Failed to start file {} in archive: {}", entry.name, e)
                ))?;

            let mut input = File::open(&entry.path)?;
            io::copy(&mut input, &mut zip)
                .map_err(|e| ArchiveError::Archive(
                    format!("Failed to write file {} to archive: {}", entry.name, e)
                ))?;
        }

        zip.finish()
            .map_err(|e| ArchiveError::Archive(
                format!("Failed to finalize ZIP archive: {}", e)
            ))?;

        Ok(())
    }
}

impl ArchiveHandler for ZipHandler {
    /// Create ZIP archive from a file or directory
    ///
    /// # Behavior
    /// - Directory source: its children become top-level entries, subdirectories
    ///   keep their structure
    /// - All file entries use Deflate at the configured level
    /// - A non-empty password enables ZipCrypto on every file entry
    /// - Any existing file at `output_path` is replaced; a half-written archive is
    ///   removed on failure
    fn create(&self, source: &Path, output_path: &Path, password: Option<&str>) -> Result<(), ArchiveError> {
        let entries = skip_output(SourceScanner::new().scan(source)?, output_path);
        let password = password.filter(|p| !p.is_empty());

        let output = File::create(output_path)
            .map_err(|e| ArchiveError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create ZIP file {}: {}", output_path.display(), e),
            )))?;

        debug!(
            source = %source.display(),
            output = %output_path.display(),
            entries = entries.len(),
            encrypted = password.is_some(),
            "Writing ZIP archive"
        );

        if let Err(e) = self.write_entries(&entries, output, password) {
            if let Err(remove_err) = fs::remove_file(output_path) {
                warn!(output = %output_path.display(), error = %remove_err, "Failed to remove incomplete archive");
            }
            return Err(e);
        }

        Ok(())
    }

    /// Extract ZIP archive to destination directory
    ///
    /// # Behavior
    /// - The central directory is validated before anything touches the disk
    /// - Destination directory is created (recursively) when missing
    /// - Encrypted entries need the password; entries that are not encrypted
    ///   ignore it
    /// - Entry names escaping the destination are rejected
    /// - Sets file permissions on Unix systems
    fn extract(&self, archive_path: &Path, dest_dir: &Path, password: Option<&str>) -> Result<Vec<PathBuf>, ArchiveError> {
        let encoding = self.options.encoding()?;
        let mut archive = self.open(archive_path)?;
        let password = password.filter(|p| !p.is_empty());

        fs::create_dir_all(dest_dir)?;

        let mut extracted = Vec::new();
        for i in 0..archive.len() {
            let mut file = match password {
                Some(password) => archive.by_index_decrypt(i, password.as_bytes())?,
                None => archive.by_index(i)?,
            };

            let name = decode_entry_name(file.name_raw(), file.name(), encoding);
            let relative = enclosed_path(&name)?;
            if relative.as_os_str().is_empty() {
                continue;
            }
            let output_path = dest_dir.join(&relative);

            if file.is_dir() {
                fs::create_dir_all(&output_path)?;
                continue;
            }

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut output_file = File::create(&output_path)?;
            io::copy(&mut file, &mut output_file)
                .map_err(|e| extract_error(&name, e, password.is_some()))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    fs::set_permissions(&output_path, fs::Permissions::from_mode(mode))?;
                }
            }

            extracted.push(output_path);
        }

        Ok(extracted)
    }

    fn entries(&self, archive_path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let encoding = self.options.encoding()?;
        let mut archive = self.open(archive_path)?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            entries.push(ArchiveEntry {
                name: decode_entry_name(file.name_raw(), file.name(), encoding),
                is_directory: file.is_dir(),
                compressed_size: file.compressed_size(),
                uncompressed_size: file.size(),
            });
        }

        Ok(entries)
    }
}

impl Default for ZipHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a failure while streaming an entry out of the archive
///
/// A bad checksum or deflate stream under a password almost always means the
/// password passed the one-byte header check by chance.
fn extract_error(name: &str, err: io::Error, with_password: bool) -> ArchiveError {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput if with_password => {
            ArchiveError::Decryption(format!("{} could not be decrypted: {}", name, err))
        }
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => {
            ArchiveError::InvalidArchive(format!("Entry {} is corrupt: {}", name, err))
        }
        _ => ArchiveError::Archive(format!("Failed to extract file {}: {}", name, err)),
    }
}

/// Drop the entry that is the archive being written, left over from an earlier
/// run into a destination inside the source
fn skip_output(entries: Vec<SourceEntry>, output_path: &Path) -> Vec<SourceEntry> {
    let Ok(target) = fs::canonicalize(output_path) else {
        return entries;
    };

    entries
        .into_iter()
        .filter(|entry| {
            let is_output = !entry.is_dir
                && fs::canonicalize(&entry.path).map_or(false, |path| path == target);
            if is_output {
                debug!(entry = %entry.name, "Skipping the output archive found in the source");
            }
            !is_output
        })
        .collect()
}

/// Decode an entry name from its raw header bytes
///
/// `decoded` is the zip crate's own reading: UTF-8 when the language-encoding
/// flag is set, CP437 otherwise. For non-ASCII names the two only agree when
/// the flag is set, so any disagreement means the raw bytes are in the legacy
/// charset.
pub fn decode_entry_name(raw: &[u8], decoded: &str, encoding: &'static Encoding) -> String {
    if raw.is_ascii() || std::str::from_utf8(raw) == Ok(decoded) {
        return decoded.to_string();
    }
    let (name, had_errors) = encoding.decode_without_bom_handling(raw);
    if had_errors {
        warn!(encoding = encoding.name(), "Entry name contains bytes invalid in the filename encoding");
    }
    name.into_owned()
}

/// Turn an entry name into a relative path that stays inside the destination
fn enclosed_path(name: &str) -> Result<PathBuf, ArchiveError> {
    let normalized = name.replace('\\', "/");
    let mut path = PathBuf::new();

    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                warn!(entry = name, "Entry path escapes the destination directory");
                return Err(ArchiveError::InvalidArchive(
                    format!("Entry path escapes the destination directory: {}", name)
                ));
            }
        }
    }

    Ok(path)
}
