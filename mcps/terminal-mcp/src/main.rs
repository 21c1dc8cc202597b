//! Terminal MCP - Unrestricted shell command and script execution
//!
//! Runs commands through the configured shell and reports the combined
//! output. There is no allow-list, timeout or output cap.

use terminal_mcp::TerminalServer;

gateway_common::serve_stdio!(TerminalServer, "terminal_mcp");
