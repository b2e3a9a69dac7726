pub mod archive;
pub mod bridge;

pub use archive::dispatch;
pub use bridge::ArchiveBridge;
