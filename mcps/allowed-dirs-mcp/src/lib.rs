//! Allowed Directories MCP Library
//!
//! Tool server and CLI for editing the directory allow-list that gates the
//! filesystem server. Both operate on the same JSON permission store.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use allowed_dirs_mcp::AllowedDirsServer;
//! use gateway_common::ToolServer;
//!
//! let registry = AllowedDirsServer::new()?.into_registry();
//! ```

pub mod cli;
pub mod handlers;
pub mod params;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::AllowedDirsServer;

// Re-export parameter types for direct API usage
pub use params::*;
