//! Pipelines and their stages (API v2).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::ClientResult;
use crate::models::pipeline::{PipelineListParams, StageListParams};
use crate::response::CursorPage;
use crate::transport::{ApiRequest, Transport};
use crate::validation;

#[derive(Debug, Clone)]
pub struct PipelineClient {
    transport: Arc<dyn Transport>,
}

impl PipelineClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list_pipelines(&self, params: &PipelineListParams) -> ClientResult<CursorPage> {
        let query = params.build_query()?;
        let response = self
            .transport
            .request(ApiRequest::get("/pipelines").query(query))
            .await?;
        let page = CursorPage::from_list(&response);
        info!(count = page.items.len(), "Listed pipelines");
        Ok(page)
    }

    pub async fn get_pipeline(&self, pipeline_id: i64) -> ClientResult<Value> {
        validation::positive_id("pipeline_id", "pipeline ID", pipeline_id)?;
        debug!(pipeline_id, "Fetching pipeline");
        let response = self
            .transport
            .request(ApiRequest::get(format!("/pipelines/{pipeline_id}")))
            .await?;
        Ok(response.data_object())
    }

    pub async fn list_stages(&self, params: &StageListParams) -> ClientResult<CursorPage> {
        let query = params.build_query()?;
        let response = self
            .transport
            .request(ApiRequest::get("/stages").query(query))
            .await?;
        let page = CursorPage::from_list(&response);
        info!(
            pipeline_id = ?params.pipeline_id,
            count = page.items.len(),
            "Listed stages"
        );
        Ok(page)
    }

    pub async fn get_stage(&self, stage_id: i64) -> ClientResult<Value> {
        validation::positive_id("stage_id", "stage ID", stage_id)?;
        debug!(stage_id, "Fetching stage");
        let response = self
            .transport
            .request(ApiRequest::get(format!("/stages/{stage_id}")))
            .await?;
        Ok(response.data_object())
    }
}
