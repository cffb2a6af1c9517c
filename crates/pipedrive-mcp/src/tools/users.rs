//! User tools.

use serde_json::Value;

use pipedrive_client::PipedriveClient;

use super::helpers::{found, require_id, ToolError, ToolResult};
use super::params::EntityIdParams;

// ── user_get ──

pub async fn user_get(client: &PipedriveClient, params: EntityIdParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "user_id")?;
    let user = client.get_user(id).await?;
    found("User", id, user)
}

// ── user_list ──

pub async fn user_list(client: &PipedriveClient) -> ToolResult<Value> {
    let users = client.list_users().await?;
    serde_json::to_value(users)
        .map_err(|e| ToolError::Failed(format!("Failed to serialize users: {e}")))
}

// ── user_me ──

pub async fn user_me(client: &PipedriveClient) -> ToolResult<Value> {
    let me = client.get_current_user().await?;
    if super::helpers::is_empty_data(&me) {
        return Err(ToolError::NotFound(
            "Current user could not be retrieved".to_string(),
        ));
    }
    Ok(me)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedrive_client::testing::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_user_get_rejects_non_numeric_id() {
        let transport = MockTransport::new();
        let client = PipedriveClient::with_transport(transport.clone());
        let err = user_get(&client, EntityIdParams { id: "abc".into() })
            .await
            .unwrap_err();
        assert!(matches!(&err, ToolError::Input(msg) if msg.contains("user_id") && msg.contains("numeric")));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_user_list_normalizes_records() {
        let transport = MockTransport::new();
        transport.push_json(json!({
            "success": true,
            "data": [
                {"id": 1, "name": "Ada", "email": "ada@example.com", "is_admin": 1, "extra": true},
                {"id": 2, "name": "Grace"}
            ]
        }));
        let client = PipedriveClient::with_transport(transport.clone());
        let out = user_list(&client).await.unwrap();
        let users = out.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["is_admin"], json!(true));
        assert!(users[0].get("extra").is_none());
        assert_eq!(users[1]["active_flag"], json!(true));
    }

    #[tokio::test]
    async fn test_user_list_malformed_record_is_an_error() {
        let transport = MockTransport::new();
        transport.push_json(json!({
            "success": true,
            "data": [{"id": 1, "name": "Ada"}, {"name": "missing id"}]
        }));
        let client = PipedriveClient::with_transport(transport.clone());
        let err = user_list(&client).await.unwrap_err();
        assert!(err.to_string().contains("Invalid response: data[1]"));
    }

    #[tokio::test]
    async fn test_user_me_passes_raw_data() {
        let transport = MockTransport::new();
        transport.push_json(json!({"success": true, "data": {"id": 5, "company_domain": "acme"}}));
        let client = PipedriveClient::with_transport(transport.clone());
        let me = user_me(&client).await.unwrap();
        assert_eq!(me["company_domain"], json!("acme"));
        assert_eq!(transport.last_request().unwrap().path, "/users/me");
    }
}
