//! Notes (API v1).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::delete_outcome;
use crate::error::ClientResult;
use crate::models::note::{NewNote, NoteListParams, NoteUpdate};
use crate::response::OffsetPage;
use crate::transport::{ApiRequest, Transport};
use crate::validation;

#[derive(Debug, Clone)]
pub struct NoteClient {
    transport: Arc<dyn Transport>,
}

impl NoteClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn create_note(&self, note: &NewNote) -> ClientResult<Value> {
        let payload = note.build_payload()?;
        info!(entity = %note.target.entity(), "Creating note");

        let response = self
            .transport
            .request(ApiRequest::post("/notes").v1().payload(payload))
            .await?;
        Ok(response.data_object())
    }

    pub async fn get_note(&self, note_id: i64) -> ClientResult<Value> {
        validation::positive_id("note_id", "note ID", note_id)?;
        debug!(note_id, "Fetching note");

        let response = self
            .transport
            .request(ApiRequest::get(format!("/notes/{note_id}")).v1())
            .await?;
        Ok(response.data_object())
    }

    /// v1 updates notes with PUT; only the supplied fields are sent.
    pub async fn update_note(&self, note_id: i64, update: &NoteUpdate) -> ClientResult<Value> {
        validation::positive_id("note_id", "note ID", note_id)?;
        let payload = update.build_payload()?;
        info!(note_id, fields = payload.len(), "Updating note");

        let response = self
            .transport
            .request(ApiRequest::put(format!("/notes/{note_id}")).v1().payload(payload))
            .await?;
        Ok(response.data_object())
    }

    pub async fn delete_note(&self, note_id: i64) -> ClientResult<Value> {
        validation::positive_id("note_id", "note ID", note_id)?;
        info!(note_id, "Deleting note");

        let response = self
            .transport
            .request(ApiRequest::delete(format!("/notes/{note_id}")).v1())
            .await?;
        if !response.success() {
            warn!(note_id, "Note deletion reported failure");
        }
        Ok(delete_outcome(note_id, response))
    }

    pub async fn list_notes(&self, params: &NoteListParams) -> ClientResult<OffsetPage> {
        let query = params.build_query()?;
        debug!(%query, "list_notes query");

        let response = self
            .transport
            .request(ApiRequest::get("/notes").v1().query(query))
            .await?;
        let page = OffsetPage::from_list(&response);
        info!(count = page.items.len(), has_more = page.has_more, "Listed notes");
        Ok(page)
    }
}
