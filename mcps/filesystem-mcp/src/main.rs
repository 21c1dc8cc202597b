//! Filesystem MCP - Allow-listed filesystem tool server
//!
//! Exposes read/write/edit/move/search/list/metadata tools over stdio.
//! Operations are restricted to the directories in the allow-list file.

use filesystem_mcp::FilesystemServer;

gateway_common::serve_stdio!(FilesystemServer, "filesystem_mcp");
