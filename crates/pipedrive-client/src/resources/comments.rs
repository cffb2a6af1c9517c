//! Comments on notes (API v1).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use super::delete_outcome;
use crate::error::ClientResult;
use crate::models::comment::{CommentBody, CommentListParams};
use crate::response::OffsetPage;
use crate::transport::{ApiRequest, Transport};
use crate::validation;

#[derive(Debug, Clone)]
pub struct CommentClient {
    transport: Arc<dyn Transport>,
}

fn check_note_id(note_id: i64) -> ClientResult<()> {
    validation::positive_id("note_id", "note ID", note_id)?;
    Ok(())
}

/// Comment ids are spliced into the request path, so only a parsed UUID is accepted.
fn check_ids(note_id: i64, comment_id: &str) -> ClientResult<Uuid> {
    check_note_id(note_id)?;
    Ok(validation::uuid("comment_id", "comment ID", comment_id)?)
}

impl CommentClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list_comments(
        &self,
        note_id: i64,
        params: &CommentListParams,
    ) -> ClientResult<OffsetPage> {
        check_note_id(note_id)?;
        let query = params.build_query()?;

        let response = self
            .transport
            .request(
                ApiRequest::get(format!("/notes/{note_id}/comments"))
                    .v1()
                    .query(query),
            )
            .await?;
        let page = OffsetPage::from_list(&response);
        info!(note_id, count = page.items.len(), "Listed note comments");
        Ok(page)
    }

    /// Comment ids are UUID strings.
    pub async fn get_comment(&self, note_id: i64, comment_id: &str) -> ClientResult<Value> {
        let comment_id = check_ids(note_id, comment_id)?;
        debug!(note_id, %comment_id, "Fetching comment");

        let response = self
            .transport
            .request(ApiRequest::get(format!("/notes/{note_id}/comments/{comment_id}")).v1())
            .await?;
        Ok(response.data_object())
    }

    pub async fn add_comment(&self, note_id: i64, body: &CommentBody) -> ClientResult<Value> {
        check_note_id(note_id)?;
        let payload = body.build_payload()?;
        info!(note_id, "Adding comment to note");

        let response = self
            .transport
            .request(
                ApiRequest::post(format!("/notes/{note_id}/comments"))
                    .v1()
                    .payload(payload),
            )
            .await?;
        Ok(response.data_object())
    }

    pub async fn update_comment(
        &self,
        note_id: i64,
        comment_id: &str,
        body: &CommentBody,
    ) -> ClientResult<Value> {
        let comment_id = check_ids(note_id, comment_id)?;
        let payload = body.build_payload()?;
        info!(note_id, %comment_id, "Updating comment");

        let response = self
            .transport
            .request(
                ApiRequest::put(format!("/notes/{note_id}/comments/{comment_id}"))
                    .v1()
                    .payload(payload),
            )
            .await?;
        Ok(response.data_object())
    }

    pub async fn delete_comment(&self, note_id: i64, comment_id: &str) -> ClientResult<Value> {
        let comment_id = check_ids(note_id, comment_id)?;
        info!(note_id, %comment_id, "Deleting comment");

        let response = self
            .transport
            .request(ApiRequest::delete(format!("/notes/{note_id}/comments/{comment_id}")).v1())
            .await?;
        if response.success() {
            Ok(response.data_object())
        } else {
            let mut outcome = delete_outcome(note_id, response);
            outcome["id"] = Value::from(comment_id.to_string());
            Ok(outcome)
        }
    }
}
