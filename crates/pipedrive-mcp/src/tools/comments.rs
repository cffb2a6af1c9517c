//! Comment tools. Comments live under a note and are addressed by UUID.

use serde_json::Value;

use pipedrive_client::models::comment::DEFAULT_COMMENT_PAGE_LIMIT;
use pipedrive_client::{CommentBody, CommentListParams, PipedriveClient};

use super::helpers::{found, require_id, ToolError, ToolResult};
use super::notes::offset_page;
use super::params::{CommentAddParams, CommentListToolParams, CommentRefParams, CommentUpdateParams};

fn comment_id(raw: &str) -> ToolResult<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ToolError::Input("comment_id is required".to_string()));
    }
    Ok(id.to_string())
}

// ── comment_add ──

pub async fn comment_add(client: &PipedriveClient, params: CommentAddParams) -> ToolResult<Value> {
    let note_id = require_id(&params.note_id, "note_id")?;
    Ok(client
        .add_comment(note_id, &CommentBody::new(params.content))
        .await?)
}

// ── comment_get ──

pub async fn comment_get(client: &PipedriveClient, params: CommentRefParams) -> ToolResult<Value> {
    let note_id = require_id(&params.note_id, "note_id")?;
    let id = comment_id(&params.comment_id)?;
    let comment = client.get_comment(note_id, &id).await?;
    found("Comment", id, comment)
}

// ── comment_update ──

pub async fn comment_update(
    client: &PipedriveClient,
    params: CommentUpdateParams,
) -> ToolResult<Value> {
    let note_id = require_id(&params.note_id, "note_id")?;
    let id = comment_id(&params.comment_id)?;
    Ok(client
        .update_comment(note_id, &id, &CommentBody::new(params.content))
        .await?)
}

// ── comment_delete ──

pub async fn comment_delete(
    client: &PipedriveClient,
    params: CommentRefParams,
) -> ToolResult<Value> {
    let note_id = require_id(&params.note_id, "note_id")?;
    let id = comment_id(&params.comment_id)?;
    Ok(client.delete_comment(note_id, &id).await?)
}

// ── comment_list ──

pub async fn comment_list(
    client: &PipedriveClient,
    params: CommentListToolParams,
) -> ToolResult<Value> {
    let note_id = require_id(&params.note_id, "note_id")?;
    let query = CommentListParams {
        start: params.start.unwrap_or(0),
        limit: params.limit.unwrap_or(DEFAULT_COMMENT_PAGE_LIMIT),
    };
    let page = client.list_comments(note_id, &query).await?;
    Ok(offset_page(
        "comments",
        page.items,
        page.has_more,
        query.start,
        query.limit,
    ))
}
