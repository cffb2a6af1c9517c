//! Pipeline and stage tools (read-only).

use serde_json::{json, Value};

use pipedrive_client::models::pipeline::DEFAULT_PIPELINE_PAGE_LIMIT;
use pipedrive_client::{PipedriveClient, PipelineListParams, StageListParams};

use super::helpers::{found, non_blank, optional_id, page_size, parse_enum, require_id, ToolResult};
use super::params::{EntityIdParams, PipelineListToolParams, StageListToolParams};

// ── pipeline_list ──

pub async fn pipeline_list(
    client: &PipedriveClient,
    params: PipelineListToolParams,
) -> ToolResult<Value> {
    let query = PipelineListParams {
        limit: page_size(params.limit.as_deref(), DEFAULT_PIPELINE_PAGE_LIMIT)?,
        cursor: non_blank(params.cursor.as_deref()),
        sort_by: parse_enum(params.sort_by.as_deref())?,
        sort_direction: parse_enum(params.sort_direction.as_deref())?,
    };
    let page = client.list_pipelines(&query).await?;
    Ok(json!({"pipelines": page.items, "next_cursor": page.next_cursor}))
}

// ── pipeline_get ──

pub async fn pipeline_get(client: &PipedriveClient, params: EntityIdParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "id")?;
    let pipeline = client.get_pipeline(id).await?;
    found("Pipeline", id, pipeline)
}

// ── stage_list ──

pub async fn stage_list(
    client: &PipedriveClient,
    params: StageListToolParams,
) -> ToolResult<Value> {
    let query = StageListParams {
        pipeline_id: optional_id(params.pipeline_id.as_deref(), "pipeline_id")?,
        limit: page_size(params.limit.as_deref(), DEFAULT_PIPELINE_PAGE_LIMIT)?,
        cursor: non_blank(params.cursor.as_deref()),
        sort_by: parse_enum(params.sort_by.as_deref())?,
        sort_direction: parse_enum(params.sort_direction.as_deref())?,
    };
    let page = client.list_stages(&query).await?;
    Ok(json!({"stages": page.items, "next_cursor": page.next_cursor}))
}

// ── stage_get ──

pub async fn stage_get(client: &PipedriveClient, params: EntityIdParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "id")?;
    let stage = client.get_stage(id).await?;
    found("Stage", id, stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedrive_client::testing::MockTransport;
    use std::sync::Arc;

    fn client(transport: &Arc<MockTransport>) -> PipedriveClient {
        PipedriveClient::with_transport(transport.clone())
    }

    #[tokio::test]
    async fn test_pipeline_list_threads_cursor() {
        let transport = MockTransport::new();
        transport.push_json(json!({
            "success": true,
            "data": [{"id": 1, "name": "Sales"}],
            "additional_data": {"next_cursor": "p2"}
        }));
        let out = pipeline_list(
            &client(&transport),
            PipelineListToolParams {
                cursor: Some("p1".into()),
                sort_by: Some("add_time".into()),
                ..PipelineListToolParams::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(out["pipelines"][0]["name"], json!("Sales"));
        assert_eq!(out["next_cursor"], json!("p2"));

        let request = transport.last_request().unwrap();
        assert_eq!(request.query.get("cursor"), Some("p1"));
        assert_eq!(request.query.get("sort_by"), Some("add_time"));
    }

    #[tokio::test]
    async fn test_stage_list_sort_accepts_order_nr() {
        let transport = MockTransport::new();
        transport.push_json(json!({"success": true, "data": []}));
        let out = stage_list(
            &client(&transport),
            StageListToolParams {
                pipeline_id: Some("3".into()),
                sort_by: Some("order_nr".into()),
                ..StageListToolParams::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(out, json!({"stages": [], "next_cursor": null}));
        assert_eq!(transport.last_request().unwrap().query.get("pipeline_id"), Some("3"));
    }

    #[tokio::test]
    async fn test_pipeline_sort_rejects_order_nr() {
        let transport = MockTransport::new();
        let err = pipeline_list(
            &client(&transport),
            PipelineListToolParams {
                sort_by: Some("order_nr".into()),
                ..PipelineListToolParams::default()
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("sort_by"));
    }

    #[tokio::test]
    async fn test_stage_get_not_found() {
        let transport = MockTransport::new();
        transport.push_json(json!({"success": true, "data": {}}));
        let err = stage_get(&client(&transport), EntityIdParams { id: "9".into() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Stage with ID 9 not found");
    }
}
