//! Tool server for unrestricted command execution
//!
//! Handler implementations are in the handlers module.

use std::sync::Arc;

use gateway_common::{load_config, ToolRegistry, ToolServer};

use crate::handlers;
use crate::params::*;
use crate::types::{Config, TerminalConfig};

/// The Terminal tool server
#[derive(Debug, Clone)]
pub struct TerminalServer {
    config: Arc<TerminalConfig>,
}

impl TerminalServer {
    /// Create a server from the `[terminal]` section of `gateway.toml`
    pub fn new() -> anyhow::Result<Self> {
        let config: Config = load_config();
        Ok(Self::with_config(config.terminal))
    }

    /// Create a server with explicit config
    pub fn with_config(config: TerminalConfig) -> Self {
        tracing::info!(
            shell = %config.shell,
            interpreter = %config.script_interpreter,
            "terminal configured"
        );
        Self {
            config: Arc::new(config),
        }
    }
}

impl ToolServer for TerminalServer {
    fn into_registry(self) -> ToolRegistry {
        let run_command_config = Arc::clone(&self.config);
        let run_script_config = self.config;

        ToolRegistry::new("terminal", env!("CARGO_PKG_VERSION"))
            .with_instructions(
                "Runs commands and scripts without restriction and returns their combined \
                 output. Calls block until the process exits.",
            )
            .tool::<RunCommandParams, _, _>(
                "run_command",
                "Run a command line through the system shell. Returns stdout, then stderr \
                 under an 'Errors:' heading, plus the exit code.",
                move |params| {
                    let config = Arc::clone(&run_command_config);
                    async move { handlers::run_command(&config, params).await }
                },
            )
            .tool::<RunScriptParams, _, _>(
                "run_script",
                "Run a script file with the configured interpreter. Arguments are split \
                 on whitespace.",
                move |params| {
                    let config = Arc::clone(&run_script_config);
                    async move { handlers::run_script(&config, params).await }
                },
            )
    }
}
