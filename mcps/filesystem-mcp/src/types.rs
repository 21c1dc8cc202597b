//! Response types for filesystem MCP

use serde::{Deserialize, Serialize};

/// Response for read_file operation
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadFileResponse {
    pub path: String,
    pub content: String,
    pub size: u64,
}

/// Per-file outcome inside read_multiple_files
#[derive(Debug, Serialize, Deserialize)]
pub struct FileReadOutcome {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for read_multiple_files operation
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadMultipleFilesResponse {
    pub files: Vec<FileReadOutcome>,
}

/// Response for write_file operation
#[derive(Debug, Serialize, Deserialize)]
pub struct WriteFileResponse {
    pub path: String,
    pub success: bool,
    pub bytes_written: usize,
}

/// What happened to one edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditChange {
    pub old_text: String,
    pub new_text: String,
    pub found: bool,
    pub occurrences: usize,
}

/// Response for edit_file operation
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFileResponse {
    pub path: String,
    pub changes: Vec<EditChange>,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for create_directory operation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDirectoryResponse {
    pub path: String,
    /// False when the directory already existed
    pub created: bool,
}

/// Response for list_directory operation
#[derive(Debug, Serialize, Deserialize)]
pub struct ListDirectoryResponse {
    pub path: String,
    /// `[DIR] name` or `[FILE] name`, sorted by name
    pub entries: Vec<String>,
    pub total_count: usize,
}

/// Response for move_file operation
#[derive(Debug, Serialize, Deserialize)]
pub struct MoveFileResponse {
    pub source: String,
    pub destination: String,
    pub success: bool,
}

/// Response for search_files operation
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchFilesResponse {
    pub pattern: String,
    pub base_path: String,
    pub matches: Vec<String>,
    pub total_count: usize,
}

/// Response for get_file_info operation
#[derive(Debug, Serialize, Deserialize)]
pub struct FileInfoResponse {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub size: u64,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub accessed: Option<String>,
    /// Octal permission bits, e.g. "644"
    pub permissions: String,
}

/// Response for list_allowed_directories operation
#[derive(Debug, Serialize, Deserialize)]
pub struct AllowedDirectoriesResponse {
    pub allowed_dirs: Vec<String>,
}
