//! Filesystem MCP Library
//!
//! Allow-listed filesystem server. Every tool re-reads the allow-list and
//! checks the requested path before touching storage.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use filesystem_mcp::FilesystemServer;
//! use gateway_common::{PermissionStore, ToolServer};
//!
//! let registry = FilesystemServer::with_store(store).into_registry();
//! let result = registry.call("read_file", Some(json!({"path": "/data/a.txt"}))).await?;
//! ```

pub mod handlers;
pub mod params;
pub mod sandbox;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::FilesystemServer;

// Re-export parameter types for direct API usage
pub use params::*;
