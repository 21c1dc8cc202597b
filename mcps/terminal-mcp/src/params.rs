//! Parameter types for Terminal MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RunCommandParams {
    #[schemars(description = "The shell command line to execute")]
    pub command: String,

    #[schemars(description = "Working directory (optional, defaults to the server's)")]
    #[serde(default)]
    pub cwd: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RunScriptParams {
    #[schemars(description = "Path to the script to run with the configured interpreter")]
    #[serde(alias = "script")]
    pub path: String,

    #[schemars(description = "Arguments for the script, split on whitespace (optional)")]
    #[serde(default)]
    pub args: Option<String>,

    #[schemars(description = "Working directory (optional, defaults to the server's)")]
    #[serde(default)]
    pub cwd: Option<String>,
}
