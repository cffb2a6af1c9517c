//! Listing parameters for pipelines and stages.

use crate::error::ValidationError;
use crate::payload::QueryParams;
use crate::validation::{self, SortDirection, SortField, StageSortField};

pub const DEFAULT_PIPELINE_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineListParams {
    pub limit: i64,
    pub cursor: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
}

impl Default for PipelineListParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PIPELINE_PAGE_LIMIT,
            cursor: None,
            sort_by: None,
            sort_direction: None,
        }
    }
}

impl PipelineListParams {
    pub fn build_query(&self) -> Result<QueryParams, ValidationError> {
        validation::page_limit(self.limit)?;
        let mut query = QueryParams::new();
        query.push("limit", self.limit);
        query.push_opt("cursor", self.cursor.as_deref());
        query.push_opt("sort_by", self.sort_by);
        query.push_opt("sort_direction", self.sort_direction);
        Ok(query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageListParams {
    /// Only stages of this pipeline
    pub pipeline_id: Option<i64>,
    pub limit: i64,
    pub cursor: Option<String>,
    pub sort_by: Option<StageSortField>,
    pub sort_direction: Option<SortDirection>,
}

impl Default for StageListParams {
    fn default() -> Self {
        Self {
            pipeline_id: None,
            limit: DEFAULT_PIPELINE_PAGE_LIMIT,
            cursor: None,
            sort_by: None,
            sort_direction: None,
        }
    }
}

impl StageListParams {
    pub fn build_query(&self) -> Result<QueryParams, ValidationError> {
        validation::page_limit(self.limit)?;
        if let Some(id) = self.pipeline_id {
            validation::positive_id("pipeline_id", "pipeline ID", id)?;
        }
        let mut query = QueryParams::new();
        query.push("limit", self.limit);
        query.push_opt("pipeline_id", self.pipeline_id);
        query.push_opt("cursor", self.cursor.as_deref());
        query.push_opt("sort_by", self.sort_by);
        query.push_opt("sort_direction", self.sort_direction);
        Ok(query)
    }
}
