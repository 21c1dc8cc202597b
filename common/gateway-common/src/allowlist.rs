//! Permission store for allow-listed directories
//!
//! The allow-list is a single JSON document, `{"allowed_dirs": [...]}`,
//! pretty-printed with 4-space indentation. It is the only state shared
//! between tool server processes and has no locking: concurrent writers race
//! and the last write wins.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::AllowlistConfig;
use crate::error::{ResultExt, ToolError, ToolResult};

/// Placeholder in seed templates replaced with the current user's name
pub const USERNAME_PLACEHOLDER: &str = "[USERNAME]";

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Normalize a path lexically
///
/// Expands `~`, makes the path absolute against the current directory,
/// collapses `.` and `..`, drops trailing separators and rebuilds it with
/// native separators. Windows paths are lower-cased. The filesystem is not
/// consulted.
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let expanded = match path.to_str() {
        Some(s) if s.starts_with('~') => expand_home(s),
        _ => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    fold_case(normalized)
}

#[cfg(windows)]
pub(crate) fn fold_case(path: PathBuf) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}

#[cfg(not(windows))]
pub(crate) fn fold_case(path: PathBuf) -> PathBuf {
    path
}

/// Ordered, duplicate-free list of allowed directories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedDirectorySet {
    #[serde(default)]
    allowed_dirs: Vec<PathBuf>,
}

impl AllowedDirectorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize every entry and drop duplicates, keeping first occurrences
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = Self::new();
        for path in paths {
            set.insert(normalize_path(path));
        }
        set
    }

    /// Append a normalized path; returns false if it was already present
    fn insert(&mut self, path: PathBuf) -> bool {
        if self.contains(&path) {
            return false;
        }
        self.allowed_dirs.push(path);
        true
    }

    /// Exact membership after normalization
    pub fn contains(&self, path: &Path) -> bool {
        let wanted = normalize_path(path);
        self.allowed_dirs.iter().any(|p| normalize_path(p) == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.allowed_dirs.iter()
    }

    pub fn len(&self) -> usize {
        self.allowed_dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed_dirs.is_empty()
    }

    /// Entries rendered for display and JSON payloads
    pub fn to_strings(&self) -> Vec<String> {
        self.allowed_dirs
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }
}

/// Durable allow-list backed by a JSON file
#[derive(Debug, Clone)]
pub struct PermissionStore {
    path: PathBuf,
    protected: Vec<PathBuf>,
}

impl PermissionStore {
    pub fn new(path: impl Into<PathBuf>, protected: Vec<PathBuf>) -> Self {
        Self {
            path: path.into(),
            protected: protected.into_iter().map(normalize_path).collect(),
        }
    }

    pub fn from_config(config: &AllowlistConfig) -> Self {
        Self::new(config.store_path(), config.protected_dirs())
    }

    /// Location of the backing JSON document
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn protected(&self) -> &[PathBuf] {
        &self.protected
    }

    pub fn is_protected(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        self.protected.iter().any(|p| *p == normalized)
    }

    /// Current contents; a missing or unreadable file means nothing is allowed
    pub fn load(&self) -> AllowedDirectorySet {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("allow-list {} does not exist", self.path.display());
                return AllowedDirectorySet::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read allow-list {}: {}", self.path.display(), e);
                return AllowedDirectorySet::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!("Failed to parse allow-list {}: {}", self.path.display(), e);
                AllowedDirectorySet::new()
            }
        }
    }

    /// Overwrite the backing document atomically (temp file + rename)
    pub fn save(&self, set: &AllowedDirectorySet) -> ToolResult<()> {
        let context = self.path.display().to_string();

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| {
            ToolError::IoFailure(format!("{}: cannot create directory: {}", context, e))
        })?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        set.serialize(&mut serializer).to_tool_err(&context)?;
        buf.push(b'\n');

        let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
            ToolError::IoFailure(format!("{}: cannot create temp file: {}", context, e))
        })?;
        temp_file
            .write_all(&buf)
            .map_err(|e| ToolError::IoFailure(format!("{}: write failed: {}", context, e)))?;
        temp_file.persist(&self.path).map_err(|e| {
            ToolError::IoFailure(format!("{}: persist failed: {}", context, e.error))
        })?;

        tracing::debug!(entries = set.len(), "saved allow-list {}", context);
        Ok(())
    }

    /// Append a directory; `DuplicateEntry` if it is already listed
    pub fn add(&self, raw: &str) -> ToolResult<PathBuf> {
        let path = normalize_path(raw);
        let mut set = self.load();
        if !set.insert(path.clone()) {
            return Err(ToolError::DuplicateEntry(format!(
                "'{}' is already in the allowed list",
                path.display()
            )));
        }
        self.save(&set)?;
        tracing::info!("Added '{}' to allowed directories", path.display());
        Ok(path)
    }

    /// Remove a directory; protected entries and unknown entries are rejected
    pub fn remove(&self, raw: &str) -> ToolResult<PathBuf> {
        let path = normalize_path(raw);
        if self.is_protected(&path) {
            return Err(ToolError::ProtectedEntry(format!(
                "cannot remove '{}': the gateway depends on it",
                path.display()
            )));
        }

        let mut set = self.load();
        let before = set.len();
        set.allowed_dirs.retain(|p| normalize_path(p) != path);
        if set.len() == before {
            return Err(ToolError::NotFound(format!(
                "'{}' is not in the allowed list",
                path.display()
            )));
        }

        self.save(&set)?;
        tracing::info!("Removed '{}' from allowed directories", path.display());
        Ok(path)
    }

    /// Replace the whole list; protected directories are always kept
    pub fn replace<I, P>(&self, paths: I) -> ToolResult<AllowedDirectorySet>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = AllowedDirectorySet::from_paths(paths);
        for protected in &self.protected {
            set.insert(protected.clone());
        }
        self.save(&set)?;
        tracing::info!(entries = set.len(), "Replaced allowed directories");
        Ok(set)
    }

    /// Initialise the store from a template, substituting the user's name
    pub fn seed_from_template(
        &self,
        template: &Path,
        username: &str,
    ) -> ToolResult<AllowedDirectorySet> {
        let context = template.display().to_string();
        let content = std::fs::read_to_string(template).to_tool_err(&context)?;
        let template: AllowedDirectorySet =
            serde_json::from_str(&content).to_tool_err(&context)?;

        let set = AllowedDirectorySet::from_paths(template.iter().map(|p| {
            p.to_string_lossy()
                .replace(USERNAME_PLACEHOLDER, username)
        }));
        self.save(&set)?;
        tracing::info!(entries = set.len(), "Seeded allow-list from {}", context);
        Ok(set)
    }
}
