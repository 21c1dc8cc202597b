//! Path authorization against the allow-list
//!
//! A path is allowed when one of the allow-list entries is a component-wise
//! prefix of it (or equal to it). `/data/docs` therefore allows
//! `/data/docs/a.txt` but not `/data/docs2/a.txt`.
//!
//! Both sides are resolved through the filesystem first: the longest existing
//! ancestor is canonicalized and the non-existent remainder re-appended, so a
//! symlink inside an allowed directory that points elsewhere is judged by
//! where it points.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::allowlist::{fold_case, normalize_path, AllowedDirectorySet};

/// Resolve symlinks along a path that may not fully exist yet
///
/// Returns `None` when the path runs through a dangling symlink, since its
/// final location cannot be known.
pub fn resolve_path(path: &Path) -> Option<PathBuf> {
    let normalized = normalize_path(path);
    let mut existing = normalized.as_path();
    let mut suffix: Vec<OsString> = Vec::new();

    loop {
        match std::fs::canonicalize(existing) {
            Ok(canonical) => {
                let mut resolved = canonical;
                for part in suffix.iter().rev() {
                    resolved.push(part);
                }
                return Some(fold_case(resolved));
            }
            Err(_) => {
                if std::fs::symlink_metadata(existing)
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false)
                {
                    return None;
                }
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        suffix.push(name.to_os_string());
                        existing = parent;
                    }
                    _ => return Some(normalized),
                }
            }
        }
    }
}

/// Whether `path` lies inside (or is) one of the allowed directories
pub fn is_allowed(path: &Path, allowed: &AllowedDirectorySet) -> bool {
    let Some(candidate) = resolve_path(path) else {
        return false;
    };

    allowed.iter().any(|dir| {
        resolve_path(dir)
            .map(|root| candidate.starts_with(&root))
            .unwrap_or(false)
    })
}
