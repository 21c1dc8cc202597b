//! Parameter types for Allowed Directories MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DirectoryParams {
    #[schemars(description = "Directory path (~ is expanded)")]
    pub directory: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateDirectoriesParams {
    #[schemars(description = "Complete list of directories to allow; protected directories are always kept")]
    pub directories: Vec<String>,
}
