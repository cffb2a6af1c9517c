//! Pipedrive MCP Server
//!
//! Model Context Protocol server exposing Pipedrive CRM deals, notes,
//! pipelines and users to LLM agents over stdio.

use std::path::PathBuf;

use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use pipedrive_client::PipedriveClient;
use pipedrive_mcp::{Feature, FeatureRegistry, McpConfig, PipedriveMcpServer};

#[derive(Debug, Parser)]
#[command(name = "pipedrive-mcp", version, about = "MCP server for the Pipedrive CRM API")]
struct Cli {
    /// TOML configuration file (defaults to ./.pipedrive-mcp.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Serve tool listings without API access; every tool call fails
    #[arg(long)]
    offline: bool,

    /// Disable a feature (deals, notes, pipelines, users); repeatable
    #[arg(long = "disable", value_name = "FEATURE")]
    disable: Vec<Feature>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("pipedrive_mcp=info".parse()?)
                .add_directive("pipedrive_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("pipedrive-mcp starting (stdio transport)");

    let config = McpConfig::load(cli.config.as_deref())?;
    let mut registry = FeatureRegistry::from_config(&config);
    for feature in &cli.disable {
        registry.disable(*feature);
    }
    registry.log_summary();

    let server = if cli.offline {
        tracing::warn!("Running in offline mode; tool calls will fail");
        PipedriveMcpServer::offline(registry)
    } else {
        let client = PipedriveClient::new(config.client_config()?)?;
        PipedriveMcpServer::new(client, registry)
    };

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
