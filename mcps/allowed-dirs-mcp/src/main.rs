//! Allowed Directories MCP - allow-list manager for the filesystem server
//!
//! With no subcommand (or `serve`) this runs the stdio tool server. The
//! `list`, `add`, `remove` and `seed` subcommands edit the store directly.

use allowed_dirs_mcp::cli::{self, Cli, Commands};
use allowed_dirs_mcp::AllowedDirsServer;
use clap::Parser;
use gateway_common::{load_config, GatewayConfig, PermissionStore, ToolServer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    gateway_common::init_tracing("allowed_dirs_mcp")?;

    let config: GatewayConfig = load_config();
    let store = match cli.store {
        Some(path) => PermissionStore::new(path, config.allowlist.protected_dirs()),
        None => PermissionStore::from_config(&config.allowlist),
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!("Starting allowed_dirs_mcp tool server");
            let registry = AllowedDirsServer::with_store(store).into_registry();
            tracing::info!(
                tools = registry.len(),
                "Server running, waiting for requests..."
            );
            gateway_common::transport::serve_stdio(&registry).await?;
            tracing::info!("Server shutting down");
        }
        command => {
            for line in cli::run(&store, command)? {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
