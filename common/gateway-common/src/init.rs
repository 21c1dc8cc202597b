//! Server initialization utilities
//!
//! Provides standardized tracing setup and the `serve_stdio!` macro
//! for consistent tool server startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for a tool server
///
/// Logs go to stderr (stdout carries the protocol) with:
/// - Formatted output without ANSI colors
/// - Environment-based filtering via RUST_LOG
/// - Default log level of `info` for the specified crate
///
/// Set `LOG_FORMAT=json` for structured JSON output.
///
/// # Example
///
/// ```rust,ignore
/// gateway_common::init_tracing("filesystem_mcp")?;
/// ```
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env()
        .add_directive(directive.parse()?)
        .add_directive("gateway_common=info".parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

/// Macro for standardized tool server startup
///
/// Expands to a single-threaded `#[tokio::main] async fn main()` that:
/// 1. Initializes tracing to stderr
/// 2. Creates the server with `::new()` (which may fail)
/// 3. Serves its registry over stdin/stdout until stdin closes
///
/// # Example
///
/// ```rust,ignore
/// gateway_common::serve_stdio!(FilesystemServer, "filesystem_mcp");
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr) => {
        #[tokio::main(flavor = "current_thread")]
        async fn main() -> anyhow::Result<()> {
            use $crate::ToolServer;

            $crate::init_tracing($crate_name)?;

            tracing::info!(concat!("Starting ", $crate_name, " tool server"));

            let registry = <$server_type>::new()?.into_registry();

            tracing::info!(
                tools = registry.len(),
                "Server running, waiting for requests..."
            );

            $crate::transport::serve_stdio(&registry).await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}
