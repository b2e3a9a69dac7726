pub mod error;
pub mod task;
pub mod config;
pub mod response;

// Re-export commonly used types
pub use error::{ArchiveError, ErrorKind};
pub use task::{
    ArchiveEntry, ArchivePayload, ArchiveRequest, ArchiveResult, ArchiveStatus, MethodCall,
    Operation, SourceEntry,
};
pub use config::{BridgeConfig, CodecOptions};
pub use response::{ArchiveResponse, Reply};
