//! Sandbox module for path authorization
//!
//! The sandbox holds no snapshot of the allow-list: each check reads the
//! permission store so edits made by the allow-list manager apply to the very
//! next call.

use std::path::{Path, PathBuf};

use gateway_common::{
    is_allowed, normalize_path, AllowedDirectorySet, PermissionStore, ToolError, ToolResult,
};

/// Gate in front of every filesystem operation
#[derive(Debug, Clone)]
pub struct Sandbox {
    store: PermissionStore,
}

impl Sandbox {
    pub fn new(store: PermissionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PermissionStore {
        &self.store
    }

    /// Current allow-list, read from disk
    pub fn snapshot(&self) -> AllowedDirectorySet {
        self.store.load()
    }

    /// Normalize a user-supplied path and check it against the live allow-list
    pub fn authorize(&self, raw: &str) -> ToolResult<PathBuf> {
        Self::authorize_in(&self.snapshot(), raw)
    }

    /// Same as [`Sandbox::authorize`] against an already loaded allow-list
    pub fn authorize_in(allowed: &AllowedDirectorySet, raw: &str) -> ToolResult<PathBuf> {
        // Null bytes would be truncated by the OS
        if raw.contains('\0') {
            return Err(ToolError::InvalidParameters(
                "Path contains null byte".to_string(),
            ));
        }
        if raw.trim().is_empty() {
            return Err(ToolError::InvalidParameters("Path is empty".to_string()));
        }

        let path = normalize_path(raw);
        Self::check_in(allowed, &path)?;
        Ok(path)
    }

    /// Check an already normalized path
    pub fn check_in(allowed: &AllowedDirectorySet, path: &Path) -> ToolResult<()> {
        if is_allowed(path, allowed) {
            Ok(())
        } else {
            Err(ToolError::AccessDenied(format!(
                "Access to path '{}' is not allowed",
                path.display()
            )))
        }
    }
}
