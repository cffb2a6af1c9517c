//! MCP ServerHandler implementation for Pipedrive.
//!
//! Tools are grouped by feature, one router per feature:
//!
//! **Deals**
//! - `deal_create`, `deal_get`, `deal_update`, `deal_delete`, `deal_list`, `deal_search`
//! - `deal_label_list`, `deal_label_create`
//! - `deal_product_add`, `deal_product_update`, `deal_product_delete`, `deal_product_list`
//!
//! **Notes** (notes and their comments)
//! - `note_create`, `note_get`, `note_update`, `note_delete`, `note_list`
//! - `comment_add`, `comment_get`, `comment_update`, `comment_delete`, `comment_list`
//!
//! **Pipelines**
//! - `pipeline_list`, `pipeline_get`, `stage_list`, `stage_get`
//!
//! **Users**
//! - `user_get`, `user_list`, `user_me`
//!
//! Only the routers of features enabled in the [`FeatureRegistry`] are mounted,
//! so disabled tools are neither listed nor callable. Every tool answers with
//! the JSON envelope produced by [`respond`].

use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde_json::Value;
use tracing::debug;

use pipedrive_client::PipedriveClient;

use crate::config::{ENV_API_TOKEN, ENV_COMPANY_DOMAIN};
use crate::registry::{Feature, FeatureRegistry};
use crate::tools::*;

/// Pipedrive MCP server handler.
#[derive(Debug, Clone)]
pub struct PipedriveMcpServer {
    tool_router: ToolRouter<Self>,
    client: Option<Arc<PipedriveClient>>,
    registry: FeatureRegistry,
}

impl PipedriveMcpServer {
    /// Create a server backed by a configured client.
    pub fn new(client: PipedriveClient, registry: FeatureRegistry) -> Self {
        Self::build(Some(Arc::new(client)), registry)
    }

    /// Create a server without API access. Tools are listed but every call
    /// answers with an offline error.
    pub fn offline(registry: FeatureRegistry) -> Self {
        Self::build(None, registry)
    }

    fn build(client: Option<Arc<PipedriveClient>>, registry: FeatureRegistry) -> Self {
        Self {
            tool_router: Self::build_router(&registry),
            client,
            registry,
        }
    }

    fn build_router(registry: &FeatureRegistry) -> ToolRouter<Self> {
        let mut router = ToolRouter::new();
        for feature in registry.enabled_features() {
            let feature_router = match feature {
                Feature::Deals => Self::deals_router(),
                Feature::Notes => Self::notes_router(),
                Feature::Pipelines => Self::pipelines_router(),
                Feature::Users => Self::users_router(),
            };
            router.merge(feature_router);
        }
        router
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    /// Names of the tools this server exposes.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    /// Returns an error envelope when running offline.
    fn resolve_client(&self) -> Result<Arc<PipedriveClient>, String> {
        self.client.clone().ok_or_else(|| {
            format_tool_response(
                false,
                None,
                Some(&format!(
                    "Pipedrive client is not configured (offline mode). \
                     Set {ENV_API_TOKEN} and {ENV_COMPANY_DOMAIN} to enable API tools."
                )),
            )
        })
    }

    /// Run one adapter against the client and wrap its result in the envelope.
    async fn call<F, Fut>(&self, tool: &'static str, adapter: F) -> String
    where
        F: FnOnce(Arc<PipedriveClient>) -> Fut,
        Fut: Future<Output = ToolResult<Value>>,
    {
        debug!(tool, "Tool invoked");
        match self.resolve_client() {
            Ok(client) => respond(tool, adapter(client).await),
            Err(offline) => offline,
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for PipedriveMcpServer {
    fn get_info(&self) -> ServerInfo {
        let features: Vec<String> = self
            .registry
            .enabled_features()
            .iter()
            .map(|feature| {
                let metadata = feature.metadata();
                format!("{} ({})", metadata.name, feature.tool_names().join(", "))
            })
            .collect();

        let mut instructions = String::from(
            "Pipedrive CRM tools. Every tool returns JSON of the form \
             {\"success\": bool, \"data\"?: ..., \"error\"?: string}.\n\
             Numeric IDs are passed as strings (e.g. \"42\"); lead and comment IDs are UUIDs.\n\
             Deal, pipeline and stage lists page with cursor/next_cursor; \
             note and comment lists page with start/limit and report has_more.\n",
        );
        if features.is_empty() {
            instructions.push_str("No features are enabled.");
        } else {
            instructions.push_str("Enabled features: ");
            instructions.push_str(&features.join("; "));
        }
        if self.is_offline() {
            instructions.push_str("\nRunning in OFFLINE mode: tool calls fail until an API token is configured.");
        }

        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pipedrive-mcp".to_string(),
                title: Some("Pipedrive MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server exposing Pipedrive deals, notes, pipelines and users".to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions),
        }
    }
}

#[tool_router(router = deals_router)]
impl PipedriveMcpServer {
    #[tool(
        name = "deal_create",
        description = "Create a deal. Requires a title; IDs (person_id, org_id, owner_id, stage_id, pipeline_id) are numeric strings. Status defaults to open and currency to USD."
    )]
    pub async fn deal_create(&self, Parameters(params): Parameters<DealCreateParams>) -> String {
        self.call("deal_create", |c| async move { deals::deal_create(&c, params).await })
            .await
    }

    #[tool(
        name = "deal_get",
        description = "Get a deal by ID, optionally with extra include_fields and custom field keys."
    )]
    pub async fn deal_get(&self, Parameters(params): Parameters<DealGetParams>) -> String {
        self.call("deal_get", |c| async move { deals::deal_get(&c, params).await })
            .await
    }

    #[tool(
        name = "deal_update",
        description = "Update a deal. Only supplied fields change; at least one is required. lost_reason is only allowed with status 'lost'."
    )]
    pub async fn deal_update(&self, Parameters(params): Parameters<DealUpdateParams>) -> String {
        self.call("deal_update", |c| async move { deals::deal_update(&c, params).await })
            .await
    }

    #[tool(
        name = "deal_delete",
        description = "Delete a deal by ID. A rejected deletion returns the ID with the API's error details."
    )]
    pub async fn deal_delete(&self, Parameters(params): Parameters<EntityIdParams>) -> String {
        self.call("deal_delete", |c| async move { deals::deal_delete(&c, params).await })
            .await
    }

    #[tool(
        name = "deal_list",
        description = "List deals with optional filters. Pass next_cursor from the previous page as cursor to continue."
    )]
    pub async fn deal_list(&self, Parameters(params): Parameters<DealListToolParams>) -> String {
        self.call("deal_list", |c| async move { deals::deal_list(&c, params).await })
            .await
    }

    #[tool(
        name = "deal_search",
        description = "Search deals by term across title, notes and custom fields. Terms shorter than 2 characters need exact_match."
    )]
    pub async fn deal_search(
        &self,
        Parameters(params): Parameters<DealSearchToolParams>,
    ) -> String {
        self.call("deal_search", |c| async move { deals::deal_search(&c, params).await })
            .await
    }

    #[tool(
        name = "deal_label_list",
        description = "List the label options available for deals."
    )]
    pub async fn deal_label_list(&self) -> String {
        self.call("deal_label_list", |c| async move { deals::deal_label_list(&c).await })
            .await
    }

    #[tool(
        name = "deal_label_create",
        description = "Create a new deal label option (name trimmed, at most 255 characters)."
    )]
    pub async fn deal_label_create(
        &self,
        Parameters(params): Parameters<DealLabelCreateParams>,
    ) -> String {
        self.call("deal_label_create", |c| async move {
            deals::deal_label_create(&c, params).await
        })
        .await
    }

    #[tool(
        name = "deal_product_add",
        description = "Attach a product to a deal with price, quantity, discount, tax and billing options."
    )]
    pub async fn deal_product_add(
        &self,
        Parameters(params): Parameters<DealProductAddParams>,
    ) -> String {
        self.call("deal_product_add", |c| async move {
            deals::deal_product_add(&c, params).await
        })
        .await
    }

    #[tool(
        name = "deal_product_update",
        description = "Update a product attached to a deal. Only supplied fields change."
    )]
    pub async fn deal_product_update(
        &self,
        Parameters(params): Parameters<DealProductUpdateParams>,
    ) -> String {
        self.call("deal_product_update", |c| async move {
            deals::deal_product_update(&c, params).await
        })
        .await
    }

    #[tool(
        name = "deal_product_delete",
        description = "Remove a product attachment from a deal."
    )]
    pub async fn deal_product_delete(
        &self,
        Parameters(params): Parameters<DealProductDeleteParams>,
    ) -> String {
        self.call("deal_product_delete", |c| async move {
            deals::deal_product_delete(&c, params).await
        })
        .await
    }

    #[tool(
        name = "deal_product_list",
        description = "List the products attached to a deal, cursor paginated."
    )]
    pub async fn deal_product_list(
        &self,
        Parameters(params): Parameters<DealProductListParams>,
    ) -> String {
        self.call("deal_product_list", |c| async move {
            deals::deal_product_list(&c, params).await
        })
        .await
    }
}

#[tool_router(router = notes_router)]
impl PipedriveMcpServer {
    #[tool(
        name = "note_create",
        description = "Create an HTML note attached to exactly one of lead_id (UUID), deal_id, person_id, org_id or project_id. pinned pins it to that entity."
    )]
    pub async fn note_create(&self, Parameters(params): Parameters<NoteCreateParams>) -> String {
        self.call("note_create", |c| async move { notes::note_create(&c, params).await })
            .await
    }

    #[tool(name = "note_get", description = "Get a note by ID.")]
    pub async fn note_get(&self, Parameters(params): Parameters<EntityIdParams>) -> String {
        self.call("note_get", |c| async move { notes::note_get(&c, params).await })
            .await
    }

    #[tool(
        name = "note_update",
        description = "Update a note's content, attachment or pinning. Pinning without a new attachment applies to the entity the note is already attached to."
    )]
    pub async fn note_update(&self, Parameters(params): Parameters<NoteUpdateParams>) -> String {
        self.call("note_update", |c| async move { notes::note_update(&c, params).await })
            .await
    }

    #[tool(name = "note_delete", description = "Delete a note by ID.")]
    pub async fn note_delete(&self, Parameters(params): Parameters<EntityIdParams>) -> String {
        self.call("note_delete", |c| async move { notes::note_delete(&c, params).await })
            .await
    }

    #[tool(
        name = "note_list",
        description = "List notes filtered by user, deal, person, organization or lead, with start/limit paging and has_more."
    )]
    pub async fn note_list(&self, Parameters(params): Parameters<NoteListToolParams>) -> String {
        self.call("note_list", |c| async move { notes::note_list(&c, params).await })
            .await
    }

    #[tool(name = "comment_add", description = "Add an HTML comment to a note.")]
    pub async fn comment_add(&self, Parameters(params): Parameters<CommentAddParams>) -> String {
        self.call("comment_add", |c| async move { comments::comment_add(&c, params).await })
            .await
    }

    #[tool(
        name = "comment_get",
        description = "Get one comment on a note by its UUID."
    )]
    pub async fn comment_get(&self, Parameters(params): Parameters<CommentRefParams>) -> String {
        self.call("comment_get", |c| async move { comments::comment_get(&c, params).await })
            .await
    }

    #[tool(
        name = "comment_update",
        description = "Replace the content of a comment on a note."
    )]
    pub async fn comment_update(
        &self,
        Parameters(params): Parameters<CommentUpdateParams>,
    ) -> String {
        self.call("comment_update", |c| async move {
            comments::comment_update(&c, params).await
        })
        .await
    }

    #[tool(name = "comment_delete", description = "Delete a comment from a note.")]
    pub async fn comment_delete(
        &self,
        Parameters(params): Parameters<CommentRefParams>,
    ) -> String {
        self.call("comment_delete", |c| async move {
            comments::comment_delete(&c, params).await
        })
        .await
    }

    #[tool(
        name = "comment_list",
        description = "List comments on a note with start/limit paging and has_more."
    )]
    pub async fn comment_list(
        &self,
        Parameters(params): Parameters<CommentListToolParams>,
    ) -> String {
        self.call("comment_list", |c| async move {
            comments::comment_list(&c, params).await
        })
        .await
    }
}

#[tool_router(router = pipelines_router)]
impl PipedriveMcpServer {
    #[tool(
        name = "pipeline_list",
        description = "List pipelines, cursor paginated."
    )]
    pub async fn pipeline_list(
        &self,
        Parameters(params): Parameters<PipelineListToolParams>,
    ) -> String {
        self.call("pipeline_list", |c| async move {
            pipelines::pipeline_list(&c, params).await
        })
        .await
    }

    #[tool(name = "pipeline_get", description = "Get a pipeline by ID.")]
    pub async fn pipeline_get(&self, Parameters(params): Parameters<EntityIdParams>) -> String {
        self.call("pipeline_get", |c| async move {
            pipelines::pipeline_get(&c, params).await
        })
        .await
    }

    #[tool(
        name = "stage_list",
        description = "List stages, optionally of one pipeline, cursor paginated."
    )]
    pub async fn stage_list(&self, Parameters(params): Parameters<StageListToolParams>) -> String {
        self.call("stage_list", |c| async move { pipelines::stage_list(&c, params).await })
            .await
    }

    #[tool(name = "stage_get", description = "Get a stage by ID.")]
    pub async fn stage_get(&self, Parameters(params): Parameters<EntityIdParams>) -> String {
        self.call("stage_get", |c| async move { pipelines::stage_get(&c, params).await })
            .await
    }
}

#[tool_router(router = users_router)]
impl PipedriveMcpServer {
    #[tool(name = "user_get", description = "Get a user by ID.")]
    pub async fn user_get(&self, Parameters(params): Parameters<EntityIdParams>) -> String {
        self.call("user_get", |c| async move { users::user_get(&c, params).await })
            .await
    }

    #[tool(
        name = "user_list",
        description = "List all users of the company account."
    )]
    pub async fn user_list(&self) -> String {
        self.call("user_list", |c| async move { users::user_list(&c).await })
            .await
    }

    #[tool(
        name = "user_me",
        description = "Get the user the API token belongs to."
    )]
    pub async fn user_me(&self) -> String {
        self.call("user_me", |c| async move { users::user_me(&c).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedrive_client::testing::MockTransport;
    use serde_json::json;

    fn mocked(registry: FeatureRegistry) -> (PipedriveMcpServer, Arc<MockTransport>) {
        let transport = MockTransport::new();
        let client = PipedriveClient::with_transport(transport.clone());
        (PipedriveMcpServer::new(client, registry), transport)
    }

    fn parse(envelope: &str) -> Value {
        serde_json::from_str(envelope).unwrap()
    }

    #[test]
    fn test_all_tools_mounted_by_default() {
        let server = PipedriveMcpServer::offline(FeatureRegistry::default());
        let mut names = server.tool_names();
        names.sort();
        let mut expected: Vec<String> = FeatureRegistry::default()
            .enabled_tools()
            .into_iter()
            .map(String::from)
            .collect();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_disabled_feature_is_not_mounted() {
        let mut registry = FeatureRegistry::default();
        registry.disable(Feature::Notes);
        let server = PipedriveMcpServer::offline(registry);
        let names = server.tool_names();
        assert!(!names.iter().any(|n| n.starts_with("note_") || n.starts_with("comment_")));
        assert!(names.contains(&"deal_create".to_string()));
    }

    #[test]
    fn test_server_info_lists_enabled_features() {
        let mut registry = FeatureRegistry::default();
        registry.disable(Feature::Users);
        let server = PipedriveMcpServer::offline(registry);
        let info = server.get_info();

        assert_eq!(info.server_info.name, "pipedrive-mcp");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        let instructions = info.instructions.unwrap();
        assert!(instructions.contains("Deals ("));
        assert!(instructions.contains("Pipelines ("));
        assert!(!instructions.contains("Users ("));
        assert!(instructions.contains("OFFLINE"));
    }

    #[tokio::test]
    async fn test_offline_tool_returns_error_envelope() {
        let server = PipedriveMcpServer::offline(FeatureRegistry::default());
        let out = parse(&server.user_me().await);
        assert_eq!(out["success"], json!(false));
        assert!(out["error"].as_str().unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn test_tool_success_envelope() {
        let (server, transport) = mocked(FeatureRegistry::default());
        transport.push_json(json!({"success": true, "data": {"id": 42, "title": "Acme"}}));
        let out = parse(
            &server
                .deal_get(Parameters(DealGetParams {
                    id: "42".into(),
                    ..DealGetParams::default()
                }))
                .await,
        );
        assert_eq!(out, json!({"success": true, "data": {"id": 42, "title": "Acme"}}));
    }

    #[tokio::test]
    async fn test_invalid_id_never_reaches_api() {
        let (server, transport) = mocked(FeatureRegistry::default());
        let out = parse(
            &server
                .stage_get(Parameters(EntityIdParams { id: "three".into() }))
                .await,
        );
        assert_eq!(out["success"], json!(false));
        assert!(out["error"].as_str().unwrap().contains("numeric"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_api_error_carries_body() {
        let (server, transport) = mocked(FeatureRegistry::default());
        transport.push_error(pipedrive_client::ClientError::api_error(
            401,
            "Unauthorized",
            json!({"success": false, "error": "Unauthorized"}),
        ));
        let out = parse(&server.user_list().await);
        assert_eq!(out["error"], json!("Pipedrive API error: Unauthorized"));
        assert_eq!(out["data"]["error"], json!("Unauthorized"));
    }
}
