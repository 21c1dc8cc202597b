//! Allow-list management handlers
//!
//! Every handler goes straight to the permission store, so a running
//! filesystem server sees the result on its next call.

use gateway_common::{
    is_allowed, json_success, normalize_path, NoParams, PermissionStore, ToolError, ToolResult,
};

use crate::params::*;
use crate::types::{
    AllowedDirectoriesResponse, DirectoryChangeResponse, DirectoryCheckResponse,
    ProtectedDirectoriesResponse,
};

fn require_directory(raw: &str) -> ToolResult<&str> {
    if raw.contains('\0') {
        return Err(ToolError::InvalidParameters(
            "directory contains null byte".to_string(),
        ));
    }
    if raw.trim().is_empty() {
        return Err(ToolError::InvalidParameters("directory is empty".to_string()));
    }
    Ok(raw)
}

pub async fn get_allowed_directories(store: &PermissionStore, _params: NoParams) -> ToolResult {
    json_success(&AllowedDirectoriesResponse {
        allowed_dirs: store.load().to_strings(),
        message: None,
    })
}

pub async fn add_allowed_directory(store: &PermissionStore, params: DirectoryParams) -> ToolResult {
    let added = store.add(require_directory(&params.directory)?)?;
    json_success(&DirectoryChangeResponse {
        success: true,
        directory: added.display().to_string(),
        message: format!("Added '{}' to allowed directories", added.display()),
    })
}

pub async fn remove_allowed_directory(
    store: &PermissionStore,
    params: DirectoryParams,
) -> ToolResult {
    let removed = store.remove(require_directory(&params.directory)?)?;
    json_success(&DirectoryChangeResponse {
        success: true,
        directory: removed.display().to_string(),
        message: format!("Removed '{}' from allowed directories", removed.display()),
    })
}

pub async fn update_allowed_directories(
    store: &PermissionStore,
    params: UpdateDirectoriesParams,
) -> ToolResult {
    for directory in &params.directories {
        require_directory(directory)?;
    }
    let set = store.replace(&params.directories)?;
    json_success(&AllowedDirectoriesResponse {
        message: Some(format!(
            "Updated allowed directories with {} entries",
            set.len()
        )),
        allowed_dirs: set.to_strings(),
    })
}

pub async fn check_directory_allowed(
    store: &PermissionStore,
    params: DirectoryParams,
) -> ToolResult {
    let directory = normalize_path(require_directory(&params.directory)?);
    let set = store.load();

    let listed = set.contains(&directory);
    let authorized = is_allowed(&directory, &set);
    let message = match (listed, authorized) {
        (true, _) => format!("Directory '{}' is allowed", directory.display()),
        (false, true) => format!(
            "Directory '{}' is not listed but lies inside an allowed directory",
            directory.display()
        ),
        (false, false) => format!("Directory '{}' is not allowed", directory.display()),
    };

    json_success(&DirectoryCheckResponse {
        protected: store.is_protected(&directory),
        directory: directory.display().to_string(),
        allowed: listed,
        authorized,
        message,
    })
}

pub async fn list_protected_directories(
    store: &PermissionStore,
    _params: NoParams,
) -> ToolResult {
    json_success(&ProtectedDirectoriesResponse {
        protected_dirs: store
            .protected()
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    })
}
