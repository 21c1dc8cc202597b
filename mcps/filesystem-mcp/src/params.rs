//! Parameter types for Filesystem MCP tools

use gateway_common::deserialize_lenient_bool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    #[schemars(description = "Path to the file to read")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReadMultipleFilesParams {
    #[schemars(description = "Paths of the files to read")]
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    #[schemars(description = "Path to the file to write")]
    pub path: String,

    #[schemars(description = "Content to write to the file")]
    pub content: String,
}

/// One exact-text replacement
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EditOperation {
    #[schemars(description = "Text to search for (every occurrence is replaced)")]
    #[serde(rename = "oldText", alias = "old_text", default)]
    pub old_text: String,

    #[schemars(description = "Replacement text")]
    #[serde(rename = "newText", alias = "new_text", default)]
    pub new_text: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EditFileParams {
    #[schemars(description = "Path to the file to edit")]
    pub path: String,

    #[schemars(description = "Edits to apply in order, each with oldText and newText")]
    pub edits: Vec<EditOperation>,

    #[schemars(description = "Preview changes without writing (default: false)")]
    #[serde(
        default,
        alias = "dryRun",
        deserialize_with = "deserialize_lenient_bool"
    )]
    pub dry_run: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateDirectoryParams {
    #[schemars(description = "Path of the directory to create")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListDirectoryParams {
    #[schemars(description = "Path to the directory to list")]
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MoveFileParams {
    #[schemars(description = "Source path")]
    pub source: String,

    #[schemars(description = "Destination path (must not exist)")]
    pub destination: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchFilesParams {
    #[schemars(description = "Directory to search from")]
    pub path: String,

    #[schemars(description = "Glob pattern matched case-insensitively against entry names (e.g. '*.rs')")]
    pub pattern: String,

    #[schemars(description = "Glob patterns to exclude; a matching directory is skipped entirely")]
    #[serde(default, alias = "excludePatterns")]
    pub exclude_patterns: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetFileInfoParams {
    #[schemars(description = "Path to the file or directory")]
    pub path: String,
}
