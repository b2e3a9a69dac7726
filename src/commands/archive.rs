use std::path::Path;
use tracing::{debug, warn};
use crate::core::compression::ArchiveProcessor;
use crate::models::response::display_name;
use crate::models::{
    ArchiveError, ArchiveRequest, ArchiveResponse, ArchiveResult, MethodCall, Operation, Reply,
};

/// Route one host call to its pipeline
///
/// Unknown method names are answered with `Reply::NotImplemented`; every known
/// method produces a response map, `fail` included.
pub fn dispatch(call: &MethodCall, processor: &ArchiveProcessor) -> Reply {
    match Operation::parse(&call.method) {
        Ok(operation) => {
            let result = run(operation, call, processor);
            Reply::Response(ArchiveResponse::from_result(&result))
        }
        Err(e) => {
            debug!(method = %call.method, "{}", e);
            Reply::NotImplemented
        }
    }
}

/// Run a known operation and collapse any error into a failure result
pub fn run(operation: Operation, call: &MethodCall, processor: &ArchiveProcessor) -> ArchiveResult {
    let outcome = ArchiveRequest::from_call(operation, call).and_then(|request| match operation {
        Operation::Zip => zip(&request, processor),
        Operation::Unzip => unzip(&request, processor),
    });

    outcome.unwrap_or_else(|e| {
        warn!(method = %call.method, kind = ?e.kind(), error = %e, "Archive operation failed");
        ArchiveResult::failure()
    })
}

/// Compress `src` into an archive
///
/// # Arguments (host call)
/// * `src` - File or directory to compress (required)
/// * `dest` - Target directory (trailing separator) or archive path
/// * `password` - Encrypts every entry when non-empty
///
/// # Returns
/// * The resolved archive path
pub fn zip(request: &ArchiveRequest, processor: &ArchiveProcessor) -> Result<ArchiveResult, ArchiveError> {
    let archive_path = processor.create_archive(
        Path::new(&request.source_path),
        request.destination_path.as_deref(),
        request.password.as_deref(),
    )?;

    Ok(ArchiveResult::archived(archive_path.to_string_lossy()))
}

/// Extract the archive `zip` into `dest`
///
/// # Arguments (host call)
/// * `zip` - Archive to extract (required)
/// * `dest` - Destination directory, defaults to the archive's directory
/// * `password` - Needed when the archive is encrypted
///
/// # Returns
/// * Base names of the extracted files in archive order
pub fn unzip(request: &ArchiveRequest, processor: &ArchiveProcessor) -> Result<ArchiveResult, ArchiveError> {
    let extracted = processor.extract_archive(
        Path::new(&request.source_path),
        request.destination_path.as_deref(),
        request.password.as_deref(),
    )?;

    let names = extracted.iter().map(|path| display_name(path)).collect();
    Ok(ArchiveResult::extracted(names))
}
