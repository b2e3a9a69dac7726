use std::path::PathBuf;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use crate::models::ArchiveError;

/// Operations the bridge knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Zip,
    Unzip,
}

impl Operation {
    /// Map a host method name onto an operation
    pub fn parse(method: &str) -> Result<Self, ArchiveError> {
        match method {
            "zip" => Ok(Operation::Zip),
            "unzip" => Ok(Operation::Unzip),
            other => Err(ArchiveError::UnsupportedOperation(other.to_string())),
        }
    }

    /// Argument key holding the source path for this operation
    fn source_key(self) -> &'static str {
        match self {
            Operation::Zip => "src",
            Operation::Unzip => "zip",
        }
    }
}

/// A call as marshalled by the host: a method name plus loosely typed arguments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodCall {
    #[serde(default, deserialize_with = "lenient_method")]
    pub method: String,
    #[serde(default, deserialize_with = "lenient_arguments")]
    pub arguments: Map<String, Value>,
}

/// A non-string method name reads as empty, which no operation matches
fn lenient_method<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(method) => method,
        _ => String::new(),
    })
}

/// Anything other than an object reads as no arguments at all
fn lenient_arguments<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(arguments) => arguments,
        _ => Map::new(),
    })
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    pub fn arg(mut self, key: &str, value: impl Into<String>) -> Self {
        self.arguments.insert(key.to_string(), Value::String(value.into()));
        self
    }

    /// String argument lookup; missing, null and non-string values all read as absent
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

/// One zip or unzip invocation, built fresh from the caller's arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub operation: Operation,
    pub source_path: String,
    pub destination_path: Option<String>,
    pub password: Option<String>,
}

impl ArchiveRequest {
    pub fn from_call(operation: Operation, call: &MethodCall) -> Result<Self, ArchiveError> {
        let source_key = operation.source_key();
        let source_path = call
            .argument(source_key)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ArchiveError::InvalidArgument(format!("missing required argument '{}'", source_key))
            })?
            .to_string();

        Ok(Self {
            operation,
            source_path,
            destination_path: non_empty(call.argument("dest")),
            password: non_empty(call.argument("password")),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Outcome status of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStatus {
    Success,
    Failure,
}

/// Payload carried by a successful pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchivePayload {
    ArchivePath(String),
    ExtractedFiles(Vec<String>),
}

/// Result of a zip or unzip pipeline, handed to the formatter as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResult {
    pub status: ArchiveStatus,
    pub payload: Option<ArchivePayload>,
}

impl ArchiveResult {
    pub fn archived(path: impl Into<String>) -> Self {
        Self {
            status: ArchiveStatus::Success,
            payload: Some(ArchivePayload::ArchivePath(path.into())),
        }
    }

    pub fn extracted(file_names: Vec<String>) -> Self {
        Self {
            status: ArchiveStatus::Success,
            payload: Some(ArchivePayload::ExtractedFiles(file_names)),
        }
    }

    pub fn failure() -> Self {
        Self {
            status: ArchiveStatus::Failure,
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ArchiveStatus::Success
    }
}

/// Read-only view of one central directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Decoded entry name, `/`-separated; directories end with `/`
    pub name: String,
    pub is_directory: bool,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

/// A file or directory found under an archive source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Entry name inside the archive, `/`-separated, relative to the source root
    pub name: String,
    /// Location on disk
    pub path: PathBuf,
    pub is_dir: bool,
}

impl SourceEntry {
    pub fn new(name: String, path: PathBuf, is_dir: bool) -> Self {
        Self { name, path, is_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_call_tolerates_mistyped_fields() {
        for raw in [
            json!({"method": "zip", "arguments": null}),
            json!({"method": "unzip", "arguments": ["x"]}),
            json!({"method": "zip", "arguments": "src=/tmp"}),
            json!({"method": "zip"}),
        ] {
            let call: MethodCall = serde_json::from_value(raw).unwrap();
            assert!(call.arguments.is_empty());
            let operation = Operation::parse(&call.method).unwrap();
            assert!(matches!(
                ArchiveRequest::from_call(operation, &call),
                Err(ArchiveError::InvalidArgument(_))
            ));
        }

        let call: MethodCall = serde_json::from_value(json!({"method": 7})).unwrap();
        assert_eq!(call.method, "");
        let call: MethodCall = serde_json::from_value(json!({})).unwrap();
        assert!(Operation::parse(&call.method).is_err());
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!(Operation::parse("zip").unwrap(), Operation::Zip);
        assert_eq!(Operation::parse("unzip").unwrap(), Operation::Unzip);
        assert!(matches!(
            Operation::parse("gzip"),
            Err(ArchiveError::UnsupportedOperation(name)) if name == "gzip"
        ));
        assert!(Operation::parse("ZIP").is_err());
    }

    #[test]
    fn test_request_from_call() {
        let call = MethodCall::new("zip")
            .arg("src", "/data/photos")
            .arg("dest", "")
            .arg("password", "secret");
        let request = ArchiveRequest::from_call(Operation::Zip, &call).unwrap();

        assert_eq!(request.source_path, "/data/photos");
        assert_eq!(request.destination_path, None);
        assert_eq!(request.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_request_ignores_non_string_arguments() {
        let call: MethodCall = serde_json::from_value(json!({
            "method": "unzip",
            "arguments": { "zip": "/tmp/a.zip", "dest": 42, "password": null }
        }))
        .unwrap();
        let request = ArchiveRequest::from_call(Operation::Unzip, &call).unwrap();

        assert_eq!(request.source_path, "/tmp/a.zip");
        assert_eq!(request.destination_path, None);
        assert_eq!(request.password, None);
    }

    #[test]
    fn test_request_missing_source() {
        let call = MethodCall::new("unzip").arg("src", "/tmp/a.zip");
        let err = ArchiveRequest::from_call(Operation::Unzip, &call).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidArgument(_)));
    }

    #[test]
    fn test_call_without_arguments_deserializes() {
        let call: MethodCall = serde_json::from_str(r#"{"method": "zip"}"#).unwrap();
        assert!(call.arguments.is_empty());
        assert_eq!(call.argument("src"), None);
    }
}
