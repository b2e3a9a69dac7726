//! ZIP archive creation and extraction for host applications
//!
//! A host hands over a [`MethodCall`] (`zip` or `unzip` plus string arguments)
//! and gets back a [`Reply`]: either a response map (`result`, `path`, `files`)
//! or a not-implemented rejection for unknown method names.

// Module declarations
pub mod models;
pub mod core;
pub mod commands;
pub mod utils;

pub use commands::{dispatch, ArchiveBridge};
pub use crate::core::compression::ArchiveProcessor;
pub use models::{
    ArchiveEntry, ArchiveError, ArchiveResponse, ArchiveResult, BridgeConfig, CodecOptions,
    ErrorKind, MethodCall, Operation, Reply,
};
