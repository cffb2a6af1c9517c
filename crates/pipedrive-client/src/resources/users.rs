//! Company users (API v1).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::models::user::User;
use crate::transport::{ApiRequest, Transport};
use crate::validation;

#[derive(Debug, Clone)]
pub struct UserClient {
    transport: Arc<dyn Transport>,
}

impl UserClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_user(&self, user_id: i64) -> ClientResult<Value> {
        validation::positive_id("user_id", "user ID", user_id)?;
        debug!(user_id, "Fetching user");
        let response = self
            .transport
            .request(ApiRequest::get(format!("/users/{user_id}")).v1())
            .await?;
        Ok(response.data_object())
    }

    /// The user owning the API token.
    pub async fn get_current_user(&self) -> ClientResult<Value> {
        let response = self
            .transport
            .request(ApiRequest::get("/users/me").v1())
            .await?;
        Ok(response.data_object())
    }

    /// All users. A record that does not parse fails the whole call.
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        let response = self
            .transport
            .request(ApiRequest::get("/users").v1())
            .await?;

        let users = response
            .data_list()
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                User::from_api(raw).map_err(|e| {
                    warn!(index, error = %e, "Unparseable user record");
                    ClientError::invalid_response(format!("data[{index}]"), e.to_string())
                })
            })
            .collect::<ClientResult<Vec<User>>>()?;
        info!(count = users.len(), "Listed users");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::transport::ApiVersion;
    use serde_json::json;

    #[tokio::test]
    async fn test_current_user_path() {
        let transport = MockTransport::new();
        transport.push_json(json!({"success": true, "data": {"id": 1, "name": "Me"}}));
        let me = UserClient::new(transport.clone())
            .get_current_user()
            .await
            .unwrap();
        assert_eq!(me["name"], json!("Me"));

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/users/me");
        assert_eq!(request.version, ApiVersion::V1);
    }

    #[tokio::test]
    async fn test_list_users_parses_records() {
        let transport = MockTransport::new();
        transport.push_json(json!({
            "success": true,
            "data": [
                {"id": 1, "name": "Ada", "email": "ada@example.com"},
                {"id": 3, "name": "Grace", "active_flag": false}
            ]
        }));
        let users = UserClient::new(transport).list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Ada");
        assert!(!users[1].active_flag);
    }

    #[tokio::test]
    async fn test_list_users_reports_malformed_record() {
        let transport = MockTransport::new();
        transport.push_json(json!({
            "success": true,
            "data": [
                {"id": 1, "name": "Ada"},
                {"name": "missing id"},
                {"id": 3, "name": "Grace"}
            ]
        }));
        let err = UserClient::new(transport).list_users().await.unwrap_err();
        match err {
            ClientError::InvalidResponse { field, reason } => {
                assert_eq!(field, "data[1]");
                assert!(reason.contains("id"));
            }
            other => panic!("expected InvalidResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_user_validates_id() {
        let transport = MockTransport::new();
        let err = UserClient::new(transport.clone())
            .get_user(0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid user ID"));
        assert_eq!(transport.request_count(), 0);
    }
}
