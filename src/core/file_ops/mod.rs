pub mod destination;
pub mod scanner;

pub use destination::resolve_destination;
pub use scanner::SourceScanner;
