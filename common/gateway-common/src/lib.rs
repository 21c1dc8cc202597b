//! Gateway Common - Shared plumbing for the gateway tool servers
//!
//! This crate provides the pieces every tool server is built from:
//!
//! - **Transport**: line-delimited JSON request/response loop over stdio
//! - **Registry**: typed tool registration with parameter validation
//! - **Errors**: the tool error taxonomy and protocol error objects
//! - **Allow-list**: the durable permission store and path authorization
//! - **Initialization**: tracing setup and the `serve_stdio!` macro
//!
//! # Example
//!
//! ```rust,ignore
//! use gateway_common::{json_success, ToolRegistry, ToolServer};
//!
//! impl ToolServer for MyServer {
//!     fn into_registry(self) -> ToolRegistry {
//!         ToolRegistry::new("my-server", env!("CARGO_PKG_VERSION"))
//!             .tool("hello", "Say hello", |_: NoParams| async { json_success(&"hello") })
//!     }
//! }
//!
//! // In main.rs
//! gateway_common::serve_stdio!(MyServer, "my_server");
//! ```

pub mod allowlist;
pub mod authorize;
pub mod config;
pub mod error;
pub mod init;
pub mod protocol;
pub mod registry;
pub mod result;
pub mod transport;

// Re-export commonly used items at crate root
pub use allowlist::{expand_home, normalize_path, AllowedDirectorySet, PermissionStore};
pub use authorize::{is_allowed, resolve_path};
pub use config::{load_config, AllowlistConfig, GatewayConfig};
pub use error::{IntoToolError, ProtocolError, ResultExt, ToolError, ToolResult};
pub use init::init_tracing;
pub use protocol::{Request, Response};
pub use registry::{deserialize_lenient_bool, NoParams, ToolRegistry, ToolServer};
pub use result::json_success;
