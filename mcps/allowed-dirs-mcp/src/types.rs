//! Response types for allowed directories MCP

use serde::{Deserialize, Serialize};

/// Response for get_allowed_directories and update_allowed_directories
#[derive(Debug, Serialize, Deserialize)]
pub struct AllowedDirectoriesResponse {
    pub allowed_dirs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response for add_allowed_directory and remove_allowed_directory
#[derive(Debug, Serialize, Deserialize)]
pub struct DirectoryChangeResponse {
    pub success: bool,
    pub directory: String,
    pub message: String,
}

/// Response for check_directory_allowed
#[derive(Debug, Serialize, Deserialize)]
pub struct DirectoryCheckResponse {
    pub directory: String,
    /// The directory itself is an entry of the allow-list
    pub allowed: bool,
    /// The directory lies inside some entry, so filesystem tools may touch it
    pub authorized: bool,
    pub protected: bool,
    pub message: String,
}

/// Response for list_protected_directories
#[derive(Debug, Serialize, Deserialize)]
pub struct ProtectedDirectoriesResponse {
    pub protected_dirs: Vec<String>,
}
