//! Type definitions for terminal MCP

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration Types
// ============================================================================

/// The `[terminal]` part of `gateway.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Shell used for run_command
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Flag that makes the shell take a command line argument
    #[serde(default = "default_shell_arg")]
    pub shell_arg: String,

    /// Interpreter used for run_script
    #[serde(default = "default_script_interpreter")]
    pub script_interpreter: String,

    #[serde(default)]
    pub env: EnvConfig,
}

fn default_shell() -> String {
    if cfg!(windows) { "cmd" } else { "/bin/sh" }.to_string()
}

fn default_shell_arg() -> String {
    if cfg!(windows) { "/C" } else { "-c" }.to_string()
}

fn default_script_interpreter() -> String {
    if cfg!(windows) { "python" } else { "python3" }.to_string()
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            shell_arg: default_shell_arg(),
            script_interpreter: default_script_interpreter(),
            env: EnvConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Environment variables to set
    #[serde(default)]
    pub set: HashMap<String, String>,
    /// Environment variables to remove
    #[serde(default)]
    pub remove: Vec<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for command and script execution
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandOutput {
    pub command: String,
    /// stdout, then `"\nErrors:\n"` and stderr when stderr is non-empty
    pub output: String,
    /// None when the process was killed by a signal or never started
    pub exit_code: Option<i32>,
}
