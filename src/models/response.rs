use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::models::{ArchivePayload, ArchiveResult, ArchiveStatus};

pub const RESULT_SUCCESS: &str = "success";
pub const RESULT_FAIL: &str = "fail";

/// Reply map handed back to the host for a handled call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveResponse {
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,
}

impl ArchiveResponse {
    /// Render a pipeline result. Total: every result maps to exactly one response.
    pub fn from_result(result: &ArchiveResult) -> Self {
        match (result.status, &result.payload) {
            (ArchiveStatus::Success, Some(ArchivePayload::ArchivePath(path))) => Self {
                result: RESULT_SUCCESS.to_string(),
                path: Some(path.clone()),
                files: None,
            },
            (ArchiveStatus::Success, Some(ArchivePayload::ExtractedFiles(names))) => Self {
                result: RESULT_SUCCESS.to_string(),
                path: None,
                files: Some(names.join(",")),
            },
            (ArchiveStatus::Success, None) => Self {
                result: RESULT_SUCCESS.to_string(),
                path: None,
                files: None,
            },
            (ArchiveStatus::Failure, _) => Self::fail(),
        }
    }

    pub fn fail() -> Self {
        Self {
            result: RESULT_FAIL.to_string(),
            path: None,
            files: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == RESULT_SUCCESS
    }

    /// Split the `files` field back into names
    pub fn file_names(&self) -> Vec<&str> {
        match self.files.as_deref() {
            Some("") | None => Vec::new(),
            Some(files) => files.split(',').collect(),
        }
    }
}

/// What the host receives for a call: a response map, or a protocol-level rejection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Response(ArchiveResponse),
    NotImplemented,
}

impl Reply {
    pub fn response(&self) -> Option<&ArchiveResponse> {
        match self {
            Reply::Response(response) => Some(response),
            Reply::NotImplemented => None,
        }
    }
}

/// Base name of an extracted path, as reported in the `files` field
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
