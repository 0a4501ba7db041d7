//! Gateway Entry Point
//!
//! Loads configuration, initializes logging, and starts the enabled
//! transports (stdio and/or HTTP) over a single MCP server.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use livros_mcp_gateway::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from .env and environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    // Create the MCP server (backend clients, catalog, dispatcher)
    let server = McpServer::new(config.clone())?;

    info!("Server initialized");

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr: stdout belongs to the stdio transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
