use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use crate::models::ArchiveError;

/// Filename charset assumed for entries that do not carry the UTF-8 flag
pub const DEFAULT_FILENAME_ENCODING: &str = "GBK";

/// Deflate level used for every entry ("normal" compression)
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 5;

/// Codec configuration shared by the archive writer and reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodecOptions {
    /// WHATWG label of the legacy filename encoding (default: "GBK")
    #[serde(default = "default_filename_encoding")]
    pub filename_encoding: String,
    /// Deflate compression level (1 - 9)
    #[serde(default = "default_compression_level")]
    pub compression_level: i64,
}

fn default_filename_encoding() -> String {
    DEFAULT_FILENAME_ENCODING.to_string()
}

fn default_compression_level() -> i64 {
    DEFAULT_COMPRESSION_LEVEL
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            filename_encoding: default_filename_encoding(),
            compression_level: default_compression_level(),
        }
    }
}

impl CodecOptions {
    pub fn with_filename_encoding(mut self, label: &str) -> Self {
        self.filename_encoding = label.to_string();
        self
    }

    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    /// Look up the configured legacy encoding
    pub fn encoding(&self) -> Result<&'static Encoding, ArchiveError> {
        Encoding::for_label(self.filename_encoding.trim().as_bytes()).ok_or_else(|| {
            ArchiveError::InvalidConfig(format!(
                "Unknown filename encoding: {}",
                self.filename_encoding
            ))
        })
    }
}

/// Configuration of the request dispatcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Worker threads for background requests (0 = one per logical CPU)
    #[serde(default)]
    pub threads: usize,
    #[serde(default)]
    pub codec: CodecOptions,
}
