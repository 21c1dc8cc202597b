//! Terminal MCP Library
//!
//! Unrestricted command execution server. Runs a shell command line or a
//! script through the configured interpreter and returns the combined
//! stdout/stderr text. Nothing here consults the directory allow-list.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use gateway_common::ToolServer;
//! use terminal_mcp::TerminalServer;
//!
//! let registry = TerminalServer::new()?.into_registry();
//! ```

pub mod handlers;
pub mod params;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::TerminalServer;

// Re-export parameter types for direct API usage
pub use params::*;
