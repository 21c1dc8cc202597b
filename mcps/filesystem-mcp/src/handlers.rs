//! Filesystem operation handlers
//!
//! Each handler takes the sandbox and its params, authorizes every path it
//! is about to touch, then performs the operation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use gateway_common::{
    is_allowed, json_success, AllowedDirectorySet, IntoToolError, NoParams, ResultExt, ToolError,
    ToolResult,
};
use glob::{MatchOptions, Pattern};
use tempfile::NamedTempFile;
use tokio::fs;

use crate::params::*;
use crate::sandbox::Sandbox;
use crate::types::{
    AllowedDirectoriesResponse, CreateDirectoryResponse, EditChange, EditFileResponse,
    FileInfoResponse, FileReadOutcome, ListDirectoryResponse, MoveFileResponse,
    ReadFileResponse, ReadMultipleFilesResponse, SearchFilesResponse, WriteFileResponse,
};

const SEARCH_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn iso8601(time: std::io::Result<SystemTime>) -> Option<String> {
    time.ok().map(|t| DateTime::<Utc>::from(t).to_rfc3339())
}

#[cfg(unix)]
fn permission_bits(metadata: &std::fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:03o}", metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permission_bits(metadata: &std::fs::Metadata) -> String {
    if metadata.permissions().readonly() {
        "444".to_string()
    } else {
        "666".to_string()
    }
}

fn is_cross_device(err: &std::io::Error) -> bool {
    // EXDEV on Unix, ERROR_NOT_SAME_DEVICE on Windows
    let code = if cfg!(windows) { 17 } else { 18 };
    err.raw_os_error() == Some(code)
}

/// Create `dir` and any missing ancestors, each of which must be allowed
async fn ensure_directory(allowed: &AllowedDirectorySet, dir: &Path) -> ToolResult<()> {
    if !is_allowed(dir, allowed) {
        return Err(ToolError::AccessDenied(format!(
            "Access to directory '{}' is not allowed",
            dir.display()
        )));
    }

    let mut missing = Vec::new();
    let mut current = Some(dir);
    while let Some(candidate) = current {
        if fs::metadata(candidate).await.is_ok() {
            break;
        }
        missing.push(candidate);
        current = candidate.parent();
    }

    if let Some(denied) = missing.iter().find(|d| !is_allowed(d, allowed)) {
        return Err(ToolError::AccessDenied(format!(
            "Access to directory '{}' is not allowed",
            denied.display()
        )));
    }

    if !missing.is_empty() {
        fs::create_dir_all(dir).await.to_tool_err(&display(dir))?;
        tracing::debug!(created = missing.len(), "created directories for {}", dir.display());
    }
    Ok(())
}

/// Write through a temp file in the same directory, then persist over the target
///
/// The target's permission bits carry over to the replacement.
async fn atomic_write(path: &Path, content: &str) -> ToolResult<()> {
    let original_perms = fs::metadata(path).await.ok().map(|m| m.permissions());
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        ToolError::IoFailure(format!("{}: cannot create temp file: {}", path.display(), e))
    })?;
    fs::write(temp_file.path(), content)
        .await
        .to_tool_err(&display(temp_file.path()))?;

    // NamedTempFile is created 0600
    if let Some(perms) = original_perms {
        temp_file
            .as_file()
            .set_permissions(perms)
            .to_tool_err(&display(path))?;
    }

    temp_file.persist(path).map_err(|e| {
        ToolError::IoFailure(format!("{}: persist failed: {}", path.display(), e.error))
    })?;
    Ok(())
}

/// Read a UTF-8 text file, rejecting directories as a caller mistake
async fn read_text(path: &Path) -> ToolResult<String> {
    let metadata = fs::metadata(path).await.to_tool_err(&display(path))?;
    if metadata.is_dir() {
        return Err(ToolError::NotFound(format!(
            "{} is a directory, not a file",
            path.display()
        )));
    }
    fs::read_to_string(path).await.to_tool_err(&display(path))
}

/// Apply edits in order, replacing every occurrence of each old text
pub fn apply_edits(content: &str, edits: &[EditOperation]) -> (String, Vec<EditChange>) {
    let mut updated = content.to_string();
    let mut changes = Vec::with_capacity(edits.len());

    for edit in edits {
        let occurrences = if edit.old_text.is_empty() {
            0
        } else {
            updated.matches(edit.old_text.as_str()).count()
        };
        if occurrences > 0 {
            updated = updated.replace(edit.old_text.as_str(), &edit.new_text);
        }
        changes.push(EditChange {
            old_text: edit.old_text.clone(),
            new_text: edit.new_text.clone(),
            found: occurrences > 0,
            occurrences,
        });
    }

    (updated, changes)
}

async fn read_authorized(allowed: &AllowedDirectorySet, raw: &str) -> ToolResult<ReadFileResponse> {
    let path = Sandbox::authorize_in(allowed, raw)?;
    let content = read_text(&path).await?;
    Ok(ReadFileResponse {
        path: display(&path),
        size: content.len() as u64,
        content,
    })
}

// ============================================================================
// Handler Functions
// ============================================================================

pub async fn read_file(sandbox: &Sandbox, params: ReadFileParams) -> ToolResult {
    let response = read_authorized(&sandbox.snapshot(), &params.path).await?;
    json_success(&response)
}

pub async fn read_multiple_files(sandbox: &Sandbox, params: ReadMultipleFilesParams) -> ToolResult {
    let allowed = sandbox.snapshot();
    let mut files = Vec::with_capacity(params.paths.len());

    for path in params.paths {
        let outcome = match read_authorized(&allowed, &path).await {
            Ok(read) => FileReadOutcome {
                path,
                content: Some(read.content),
                error: None,
            },
            Err(e) => FileReadOutcome {
                path,
                content: None,
                error: Some(format!("Error: {}", e)),
            },
        };
        files.push(outcome);
    }

    json_success(&ReadMultipleFilesResponse { files })
}

pub async fn write_file(sandbox: &Sandbox, params: WriteFileParams) -> ToolResult {
    let allowed = sandbox.snapshot();
    let path = Sandbox::authorize_in(&allowed, &params.path)?;

    if let Some(parent) = path.parent() {
        ensure_directory(&allowed, parent).await?;
    }

    fs::write(&path, params.content.as_bytes())
        .await
        .to_tool_err(&display(&path))?;
    tracing::info!(bytes = params.content.len(), "wrote {}", path.display());

    json_success(&WriteFileResponse {
        path: display(&path),
        success: true,
        bytes_written: params.content.len(),
    })
}

pub async fn edit_file(sandbox: &Sandbox, params: EditFileParams) -> ToolResult {
    let path = sandbox.authorize(&params.path)?;
    let content = read_text(&path).await?;

    let (new_content, changes) = apply_edits(&content, &params.edits);

    let response = if params.dry_run {
        EditFileResponse {
            path: display(&path),
            changes,
            applied: false,
            original_content: Some(content),
            new_content: Some(new_content),
            message: None,
        }
    } else if new_content != content {
        atomic_write(&path, &new_content).await?;
        tracing::info!(edits = changes.len(), "edited {}", path.display());
        EditFileResponse {
            path: display(&path),
            changes,
            applied: true,
            original_content: None,
            new_content: None,
            message: None,
        }
    } else {
        EditFileResponse {
            path: display(&path),
            changes,
            applied: false,
            original_content: None,
            new_content: None,
            message: Some("No changes were made to the file".to_string()),
        }
    };

    json_success(&response)
}

pub async fn create_directory(sandbox: &Sandbox, params: CreateDirectoryParams) -> ToolResult {
    let allowed = sandbox.snapshot();
    let path = Sandbox::authorize_in(&allowed, &params.path)?;

    let existed = fs::metadata(&path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    ensure_directory(&allowed, &path).await?;

    json_success(&CreateDirectoryResponse {
        path: display(&path),
        created: !existed,
    })
}

pub async fn list_directory(sandbox: &Sandbox, params: ListDirectoryParams) -> ToolResult {
    let path = sandbox.authorize(&params.path)?;

    let mut read_dir = fs::read_dir(&path).await.to_tool_err(&display(&path))?;
    let mut items = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .to_tool_err(&display(&path))?
    {
        let name = entry.file_name().to_string_lossy().to_string();
        // Follows symlinks, so a link to a directory lists as [DIR]
        let is_dir = fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        items.push((name, is_dir));
    }
    items.sort();

    let entries: Vec<String> = items
        .into_iter()
        .map(|(name, is_dir)| {
            if is_dir {
                format!("[DIR] {}", name)
            } else {
                format!("[FILE] {}", name)
            }
        })
        .collect();

    json_success(&ListDirectoryResponse {
        path: display(&path),
        total_count: entries.len(),
        entries,
    })
}

pub async fn move_file(sandbox: &Sandbox, params: MoveFileParams) -> ToolResult {
    let allowed = sandbox.snapshot();
    let source = Sandbox::authorize_in(&allowed, &params.source)?;
    let destination = Sandbox::authorize_in(&allowed, &params.destination)?;

    let source_meta = fs::symlink_metadata(&source)
        .await
        .map_err(|_| ToolError::NotFound(format!("Source {} does not exist", source.display())))?;
    if fs::symlink_metadata(&destination).await.is_ok() {
        return Err(ToolError::AlreadyExists(format!(
            "Destination {} already exists",
            destination.display()
        )));
    }
    if let Some(parent) = destination.parent() {
        if !fs::metadata(parent).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(ToolError::NotFound(format!(
                "Destination directory {} does not exist",
                parent.display()
            )));
        }
    }

    match fs::rename(&source, &destination).await {
        Ok(()) => {}
        Err(e) if is_cross_device(&e) && source_meta.is_file() => {
            fs::copy(&source, &destination)
                .await
                .to_tool_err(&display(&destination))?;
            fs::remove_file(&source).await.to_tool_err(&display(&source))?;
        }
        Err(e) => return Err(e.into_tool_error(&display(&source))),
    }
    tracing::info!("moved {} to {}", source.display(), destination.display());

    json_success(&MoveFileResponse {
        source: display(&source),
        destination: display(&destination),
        success: true,
    })
}

pub async fn search_files(sandbox: &Sandbox, params: SearchFilesParams) -> ToolResult {
    let allowed = sandbox.snapshot();
    let root = Sandbox::authorize_in(&allowed, &params.path)?;

    let root_meta = fs::metadata(&root)
        .await
        .map_err(|_| ToolError::NotFound(format!("Path {} does not exist", root.display())))?;
    if !root_meta.is_dir() {
        return Err(ToolError::NotFound(format!(
            "Path {} is not a directory",
            root.display()
        )));
    }

    let pattern = Pattern::new(&params.pattern).map_err(|e| {
        ToolError::InvalidParameters(format!("invalid pattern '{}': {}", params.pattern, e))
    })?;
    let excludes = params
        .exclude_patterns
        .unwrap_or_default()
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                ToolError::InvalidParameters(format!("invalid exclude pattern '{}': {}", p, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let is_excluded = |path: &Path, name: &str| {
        let full = path.to_string_lossy();
        excludes.iter().any(|p| {
            p.matches_with(&full, SEARCH_MATCH_OPTIONS) || p.matches_with(name, SEARCH_MATCH_OPTIONS)
        })
    };

    let mut matches = Vec::new();
    let mut stack: Vec<PathBuf> = vec![root.clone()];
    while let Some(dir) = stack.pop() {
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if is_excluded(&dir, &dir_name) {
            continue;
        }

        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if dir == root => return Err(e.into_tool_error(&display(&dir))),
            Err(e) => {
                tracing::debug!("skipping unreadable {}: {}", dir.display(), e);
                continue;
            }
        };

        while let Ok(Some(entry)) = read_dir.next_entry().await {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();

            // Symlinked directories are reported but not descended into
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                stack.push(path.clone());
            }

            if pattern.matches_with(&name, SEARCH_MATCH_OPTIONS)
                && !is_excluded(&path, &name)
                && is_allowed(&path, &allowed)
            {
                matches.push(display(&path));
            }
        }
    }
    matches.sort();

    json_success(&SearchFilesResponse {
        pattern: params.pattern,
        base_path: display(&root),
        total_count: matches.len(),
        matches,
    })
}

pub async fn get_file_info(sandbox: &Sandbox, params: GetFileInfoParams) -> ToolResult {
    let path = sandbox.authorize(&params.path)?;
    let metadata = fs::metadata(&path).await.to_tool_err(&display(&path))?;

    json_success(&FileInfoResponse {
        path: display(&path),
        entry_type: if metadata.is_dir() {
            "directory".to_string()
        } else {
            "file".to_string()
        },
        size: metadata.len(),
        created: iso8601(metadata.created()),
        modified: iso8601(metadata.modified()),
        accessed: iso8601(metadata.accessed()),
        permissions: permission_bits(&metadata),
    })
}

pub async fn list_allowed_directories(sandbox: &Sandbox, _params: NoParams) -> ToolResult {
    json_success(&AllowedDirectoriesResponse {
        allowed_dirs: sandbox.snapshot().to_strings(),
    })
}
