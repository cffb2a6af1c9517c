//! MCP protocol integration test.
//!
//! Drives the real server over an in-memory duplex transport: tool discovery
//! via `list_tools` and tool invocation via `call_tool`, with the Pipedrive
//! API replaced by a `MockTransport`.

use std::sync::Arc;

use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo};
use rmcp::service::{RoleClient, RunningService};
use rmcp::{ClientHandler, ServiceExt};
use serde_json::{json, Value};

use pipedrive_client::testing::MockTransport;
use pipedrive_client::PipedriveClient;
use pipedrive_mcp::{Feature, FeatureRegistry, PipedriveMcpServer};

#[derive(Debug, Clone, Default)]
struct DummyClient;

impl ClientHandler for DummyClient {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

type Client = RunningService<RoleClient, DummyClient>;

async fn connect(
    server: PipedriveMcpServer,
) -> anyhow::Result<(Client, tokio::task::JoinHandle<anyhow::Result<()>>)> {
    let (server_transport, client_transport) = tokio::io::duplex(4096);
    let server_handle = tokio::spawn(async move {
        let service = server.serve(server_transport).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });
    let client = DummyClient.serve(client_transport).await?;
    Ok((client, server_handle))
}

fn mocked_server(registry: FeatureRegistry) -> (PipedriveMcpServer, Arc<MockTransport>) {
    let transport = MockTransport::new();
    let client = PipedriveClient::with_transport(transport.clone());
    (PipedriveMcpServer::new(client, registry), transport)
}

fn request(name: &str, arguments: Value) -> CallToolRequestParams {
    CallToolRequestParams {
        meta: None,
        name: name.to_string().into(),
        arguments: arguments.as_object().cloned(),
        task: None,
    }
}

fn envelope(result: &CallToolResult) -> Value {
    let text = result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .expect("Expected text content");
    serde_json::from_str(text).expect("Expected JSON envelope")
}

#[tokio::test]
async fn test_mcp_protocol_list_tools_respects_registry() -> anyhow::Result<()> {
    let mut registry = FeatureRegistry::default();
    registry.disable(Feature::Users);
    let (server, _transport) = mocked_server(registry);
    let (client, server_handle) = connect(server).await?;

    let tools = client.list_tools(None).await?;
    let tool_names: Vec<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    assert!(
        tool_names.contains(&"deal_search"),
        "Expected deal_search in tool list, got: {:?}",
        tool_names
    );
    assert!(tool_names.contains(&"comment_list"));
    assert!(!tool_names.contains(&"user_me"));
    assert_eq!(tool_names.len(), 26);

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_call_tool_returns_envelope() -> anyhow::Result<()> {
    let (server, transport) = mocked_server(FeatureRegistry::default());
    transport.push_json(json!({
        "success": true,
        "data": [{"id": 1, "name": "Sales"}],
        "additional_data": {"next_cursor": "next-page"}
    }));
    let (client, server_handle) = connect(server).await?;

    let result = client
        .call_tool(request("pipeline_list", json!({"limit": "10"})))
        .await?;
    let parsed = envelope(&result);
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["data"]["pipelines"][0]["name"], "Sales");
    assert_eq!(parsed["data"]["next_cursor"], "next-page");
    assert_eq!(transport.last_request().unwrap().query.get("limit"), Some("10"));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_validation_error_envelope() -> anyhow::Result<()> {
    let (server, transport) = mocked_server(FeatureRegistry::default());
    let (client, server_handle) = connect(server).await?;

    let result = client
        .call_tool(request(
            "deal_update",
            json!({"id": "5", "probability": 150}),
        ))
        .await?;
    let parsed = envelope(&result);
    assert_eq!(parsed["success"], false);
    assert!(parsed["error"]
        .as_str()
        .unwrap()
        .starts_with("Validation error:"));
    assert_eq!(transport.request_count(), 0);

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_concurrent_calls() -> anyhow::Result<()> {
    let (server, transport) = mocked_server(FeatureRegistry::default());
    for _ in 0..3 {
        transport.push_json(json!({"success": true, "data": {"id": 7}}));
    }
    let (client, server_handle) = connect(server).await?;

    let calls = ["pipeline_get", "stage_get", "note_get"]
        .into_iter()
        .map(|name| client.call_tool(request(name, json!({"id": "7"}))));
    let results = futures::future::join_all(calls).await;
    for result in results {
        let parsed = envelope(&result?);
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["data"]["id"], 7);
    }
    assert_eq!(transport.request_count(), 3);

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_mcp_protocol_offline_server() -> anyhow::Result<()> {
    let server = PipedriveMcpServer::offline(FeatureRegistry::default());
    let (client, server_handle) = connect(server).await?;

    let tools = client.list_tools(None).await?;
    assert_eq!(tools.tools.len(), 29);

    let result = client.call_tool(request("user_me", json!({}))).await?;
    let parsed = envelope(&result);
    assert_eq!(parsed["success"], false);
    assert!(parsed["error"].as_str().unwrap().contains("offline"));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}
