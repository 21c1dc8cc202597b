//! Command execution handlers
//!
//! Commands run to completion with stdin closed. A child that cannot be
//! spawned is reported in the output text rather than as an error.

use std::process::Stdio;

use gateway_common::{json_success, ToolResult};
use tokio::process::Command;

use crate::params::*;
use crate::types::{CommandOutput, TerminalConfig};

// ============================================================================
// Helper Functions
// ============================================================================

/// stdout, followed by stderr under an `Errors:` heading when there is any
pub fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut output = String::from_utf8_lossy(stdout).to_string();
    if !stderr.is_empty() {
        output.push_str("\nErrors:\n");
        output.push_str(&String::from_utf8_lossy(stderr));
    }
    output
}

/// Core execution: apply environment config, run, capture both streams
async fn execute(
    config: &TerminalConfig,
    mut cmd: Command,
    label: String,
    cwd: Option<&str>,
) -> CommandOutput {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(gateway_common::expand_home(dir));
    }

    for (key, value) in &config.env.set {
        cmd.env(key, value);
    }
    for key in &config.env.remove {
        cmd.env_remove(key);
    }

    match cmd.output().await {
        Ok(output) => {
            tracing::info!(exit_code = ?output.status.code(), "ran {}", label);
            CommandOutput {
                command: label,
                output: combine_output(&output.stdout, &output.stderr),
                exit_code: output.status.code(),
            }
        }
        Err(e) => {
            tracing::warn!("failed to spawn {}: {}", label, e);
            CommandOutput {
                command: label,
                output: format!("Error executing command: {}", e),
                exit_code: None,
            }
        }
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

pub async fn run_command(config: &TerminalConfig, params: RunCommandParams) -> ToolResult {
    let mut cmd = Command::new(&config.shell);
    cmd.arg(&config.shell_arg).arg(&params.command);

    let output = execute(config, cmd, params.command.clone(), params.cwd.as_deref()).await;
    json_success(&output)
}

pub async fn run_script(config: &TerminalConfig, params: RunScriptParams) -> ToolResult {
    let args: Vec<&str> = params
        .args
        .as_deref()
        .map(|a| a.split_whitespace().collect())
        .unwrap_or_default();

    let mut cmd = Command::new(&config.script_interpreter);
    cmd.arg(&params.path).args(&args);

    let label = std::iter::once(config.script_interpreter.as_str())
        .chain(std::iter::once(params.path.as_str()))
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    let output = execute(config, cmd, label, params.cwd.as_deref()).await;
    json_success(&output)
}
