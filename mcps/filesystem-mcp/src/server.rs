//! Tool server exposing sandboxed filesystem operations
//!
//! Handler implementations are in the handlers module; this module only
//! wires them into the registry.

use std::sync::Arc;

use gateway_common::{load_config, GatewayConfig, PermissionStore, ToolRegistry, ToolServer};

use crate::handlers;
use crate::params::*;
use crate::sandbox::Sandbox;

/// The Filesystem tool server
#[derive(Debug, Clone)]
pub struct FilesystemServer {
    sandbox: Arc<Sandbox>,
}

impl FilesystemServer {
    /// Create a server from `gateway.toml` (or defaults)
    pub fn new() -> anyhow::Result<Self> {
        let config: GatewayConfig = load_config();
        let store = PermissionStore::from_config(&config.allowlist);
        tracing::info!("Using allow-list at {}", store.path().display());
        Ok(Self::with_store(store))
    }

    /// Create a server backed by an explicit permission store
    pub fn with_store(store: PermissionStore) -> Self {
        Self {
            sandbox: Arc::new(Sandbox::new(store)),
        }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }
}

impl ToolServer for FilesystemServer {
    fn into_registry(self) -> ToolRegistry {
        let sandbox = self.sandbox;

        macro_rules! bind {
            ($handler:path) => {{
                let sandbox = Arc::clone(&sandbox);
                move |params| {
                    let sandbox = Arc::clone(&sandbox);
                    async move { $handler(&sandbox, params).await }
                }
            }};
        }

        ToolRegistry::new("filesystem", env!("CARGO_PKG_VERSION"))
            .with_instructions(
                "Sandboxed filesystem access. Every path must lie inside a directory on \
                 the allow-list; call list_allowed_directories to see it.",
            )
            .tool::<ReadFileParams, _, _>(
                "read_file",
                "Read the complete contents of a UTF-8 text file.",
                bind!(handlers::read_file),
            )
            .tool::<ReadMultipleFilesParams, _, _>(
                "read_multiple_files",
                "Read several files at once. A failure on one file is reported for that file \
                 and does not stop the others.",
                bind!(handlers::read_multiple_files),
            )
            .tool::<WriteFileParams, _, _>(
                "write_file",
                "Create or overwrite a file. Missing parent directories are created.",
                bind!(handlers::write_file),
            )
            .tool::<EditFileParams, _, _>(
                "edit_file",
                "Apply exact-text replacements to a file in order. Use dryRun to preview.",
                bind!(handlers::edit_file),
            )
            .tool::<CreateDirectoryParams, _, _>(
                "create_directory",
                "Create a directory and any missing parents. Succeeds if it already exists.",
                bind!(handlers::create_directory),
            )
            .tool::<ListDirectoryParams, _, _>(
                "list_directory",
                "List a directory. Entries are prefixed with [DIR] or [FILE].",
                bind!(handlers::list_directory),
            )
            .tool::<MoveFileParams, _, _>(
                "move_file",
                "Move or rename a file or directory. Fails if the destination exists.",
                bind!(handlers::move_file),
            )
            .tool::<SearchFilesParams, _, _>(
                "search_files",
                "Recursively find entries whose name matches a glob pattern \
                 (case-insensitive).",
                bind!(handlers::search_files),
            )
            .tool::<GetFileInfoParams, _, _>(
                "get_file_info",
                "Get type, size, timestamps and permissions of a file or directory.",
                bind!(handlers::get_file_info),
            )
            .tool::<gateway_common::NoParams, _, _>(
                "list_allowed_directories",
                "List the directories this server is allowed to access.",
                bind!(handlers::list_allowed_directories),
            )
    }
}
