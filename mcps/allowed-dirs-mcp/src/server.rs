//! Tool server for managing the directory allow-list
//!
//! Handler implementations are in the handlers module.

use std::sync::Arc;

use gateway_common::{
    load_config, GatewayConfig, NoParams, PermissionStore, ToolRegistry, ToolServer,
};

use crate::handlers;
use crate::params::*;

/// The Allowed Directories tool server
#[derive(Debug, Clone)]
pub struct AllowedDirsServer {
    store: Arc<PermissionStore>,
}

impl AllowedDirsServer {
    /// Create a server from `gateway.toml` (or defaults)
    pub fn new() -> anyhow::Result<Self> {
        let config: GatewayConfig = load_config();
        Ok(Self::with_store(PermissionStore::from_config(&config.allowlist)))
    }

    /// Create a server backed by an explicit permission store
    pub fn with_store(store: PermissionStore) -> Self {
        tracing::info!("Managing allow-list at {}", store.path().display());
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &PermissionStore {
        &self.store
    }
}

impl ToolServer for AllowedDirsServer {
    fn into_registry(self) -> ToolRegistry {
        let store = self.store;

        macro_rules! bind {
            ($handler:path) => {{
                let store = Arc::clone(&store);
                move |params| {
                    let store = Arc::clone(&store);
                    async move { $handler(&store, params).await }
                }
            }};
        }

        ToolRegistry::new("allowed_dirs_manager", env!("CARGO_PKG_VERSION"))
            .with_instructions(
                "Manages the directories the filesystem server may access. Changes apply \
                 to the filesystem server immediately.",
            )
            .tool::<NoParams, _, _>(
                "get_allowed_directories",
                "Get the list of currently allowed directories.",
                bind!(handlers::get_allowed_directories),
            )
            .tool::<DirectoryParams, _, _>(
                "add_allowed_directory",
                "Add a directory to the allowed list.",
                bind!(handlers::add_allowed_directory),
            )
            .tool::<DirectoryParams, _, _>(
                "remove_allowed_directory",
                "Remove a directory from the allowed list. Protected directories cannot \
                 be removed.",
                bind!(handlers::remove_allowed_directory),
            )
            .tool::<UpdateDirectoriesParams, _, _>(
                "update_allowed_directories",
                "Replace the complete list of allowed directories. Protected directories \
                 are always kept.",
                bind!(handlers::update_allowed_directories),
            )
            .tool::<DirectoryParams, _, _>(
                "check_directory_allowed",
                "Check whether a directory is on the allowed list, and whether it lies \
                 inside an allowed directory.",
                bind!(handlers::check_directory_allowed),
            )
            .tool::<NoParams, _, _>(
                "list_protected_directories",
                "List the directories that can never be removed.",
                bind!(handlers::list_protected_directories),
            )
    }
}
