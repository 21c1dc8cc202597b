//! Command line interface
//!
//! Without a subcommand the binary serves the tool protocol on stdio. The
//! other subcommands edit the allow-list directly, for setup scripts.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gateway_common::PermissionStore;

#[derive(Parser)]
#[command(name = "allowed-dirs-mcp")]
#[command(about = "Manage the directory allow-list shared by the gateway tool servers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Allow-list JSON file (default: from gateway.toml)
    #[arg(long, env = "ALLOWED_DIRS_PATH", global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the management tools over stdin/stdout (default)
    Serve,
    /// Print the allowed directories, one per line
    List,
    /// Add a directory to the allow-list
    Add {
        /// Directory to allow
        directory: String,
    },
    /// Remove a directory from the allow-list
    Remove {
        /// Directory to remove
        directory: String,
    },
    /// Initialise the allow-list from a template file
    Seed {
        /// Template JSON document of the form {"allowed_dirs": [...]}
        #[arg(long, short)]
        template: PathBuf,

        /// Name substituted for [USERNAME] (default: current user)
        #[arg(long, short)]
        user: Option<String>,
    },
}

/// Name of the user running the process
pub fn current_user() -> Option<String> {
    ["USERNAME", "USER"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
}

/// Run a non-serving subcommand against the store, returning lines to print
pub fn run(store: &PermissionStore, command: Commands) -> anyhow::Result<Vec<String>> {
    let lines = match command {
        Commands::Serve => bail!("serve is handled by the caller"),
        Commands::List => store.load().to_strings(),
        Commands::Add { directory } => {
            let added = store.add(&directory)?;
            vec![format!("Added '{}'", added.display())]
        }
        Commands::Remove { directory } => {
            let removed = store.remove(&directory)?;
            vec![format!("Removed '{}'", removed.display())]
        }
        Commands::Seed { template, user } => {
            let user = match user.or_else(current_user) {
                Some(user) => user,
                None => bail!("cannot determine the current user; pass --user"),
            };
            let set = store
                .seed_from_template(&template, &user)
                .with_context(|| format!("seeding from {}", template.display()))?;
            vec![format!(
                "Seeded {} with {} entries",
                store.path().display(),
                set.len()
            )]
        }
    };
    Ok(lines)
}
