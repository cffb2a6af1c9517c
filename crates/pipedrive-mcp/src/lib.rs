//! Pipedrive MCP Server library.
//!
//! Provides the [`server::PipedriveMcpServer`] handler, its configuration and
//! feature registry, and the tool adapters. Used by the `pipedrive-mcp`
//! binary and available for integration testing.

pub mod config;
pub mod registry;
pub mod server;
pub mod tools;

pub use config::McpConfig;
pub use registry::{Feature, FeatureRegistry};
pub use server::PipedriveMcpServer;
