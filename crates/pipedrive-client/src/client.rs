//! Aggregate client.
//!
//! [`PipedriveClient`] owns one resource client per entity, all sharing a
//! single transport. The resource clients are public fields; the forwarding
//! methods below exist so callers holding only the aggregate do not need to
//! know which resource an operation lives on.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::models::{
    CommentBody, CommentListParams, DealListParams, DealProductUpdate, DealSearchParams,
    DealUpdate, NewDeal, NewDealProduct, NewNote, NoteListParams, NoteUpdate,
    PipelineListParams, StageListParams, User,
};
use crate::resources::{CommentClient, DealClient, NoteClient, PipelineClient, UserClient};
use crate::response::{CursorPage, OffsetPage};
use crate::transport::{HttpTransport, Transport};

#[derive(Debug, Clone)]
pub struct PipedriveClient {
    pub deals: DealClient,
    pub notes: NoteClient,
    pub comments: CommentClient,
    pub pipelines: PipelineClient,
    pub users: UserClient,
}

impl PipedriveClient {
    /// Build an HTTP-backed client. Fails when the configuration is incomplete.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(config)?;
        info!(
            base_url = %transport.config().api_root(),
            "Pipedrive client initialized"
        );
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            deals: DealClient::new(Arc::clone(&transport)),
            notes: NoteClient::new(Arc::clone(&transport)),
            comments: CommentClient::new(Arc::clone(&transport)),
            pipelines: PipelineClient::new(Arc::clone(&transport)),
            users: UserClient::new(transport),
        }
    }

    // ---- Deals ----

    pub async fn create_deal(&self, deal: &NewDeal) -> ClientResult<Value> {
        self.deals.create_deal(deal).await
    }

    pub async fn get_deal(
        &self,
        deal_id: i64,
        include_fields: &[String],
        custom_fields_keys: &[String],
    ) -> ClientResult<Value> {
        self.deals
            .get_deal(deal_id, include_fields, custom_fields_keys)
            .await
    }

    pub async fn update_deal(&self, deal_id: i64, update: &DealUpdate) -> ClientResult<Value> {
        self.deals.update_deal(deal_id, update).await
    }

    pub async fn delete_deal(&self, deal_id: i64) -> ClientResult<Value> {
        self.deals.delete_deal(deal_id).await
    }

    pub async fn list_deals(&self, params: &DealListParams) -> ClientResult<CursorPage> {
        self.deals.list_deals(params).await
    }

    pub async fn search_deals(&self, params: &DealSearchParams) -> ClientResult<CursorPage> {
        self.deals.search_deals(params).await
    }

    pub async fn add_product_to_deal(
        &self,
        deal_id: i64,
        product: &NewDealProduct,
    ) -> ClientResult<Value> {
        self.deals.add_product(deal_id, product).await
    }

    pub async fn update_product_in_deal(
        &self,
        deal_id: i64,
        product_attachment_id: i64,
        update: &DealProductUpdate,
    ) -> ClientResult<Value> {
        self.deals
            .update_product(deal_id, product_attachment_id, update)
            .await
    }

    pub async fn delete_product_from_deal(
        &self,
        deal_id: i64,
        product_attachment_id: i64,
    ) -> ClientResult<Value> {
        self.deals
            .delete_product(deal_id, product_attachment_id)
            .await
    }

    pub async fn list_deal_products(
        &self,
        deal_id: i64,
        limit: i64,
        cursor: Option<&str>,
    ) -> ClientResult<CursorPage> {
        self.deals.list_products(deal_id, limit, cursor).await
    }

    pub async fn list_deal_labels(&self) -> ClientResult<Vec<Value>> {
        self.deals.list_labels().await
    }

    pub async fn create_deal_label(&self, name: &str) -> ClientResult<Value> {
        self.deals.create_label(name).await
    }

    // ---- Notes and comments ----

    pub async fn create_note(&self, note: &NewNote) -> ClientResult<Value> {
        self.notes.create_note(note).await
    }

    pub async fn get_note(&self, note_id: i64) -> ClientResult<Value> {
        self.notes.get_note(note_id).await
    }

    pub async fn update_note(&self, note_id: i64, update: &NoteUpdate) -> ClientResult<Value> {
        self.notes.update_note(note_id, update).await
    }

    pub async fn delete_note(&self, note_id: i64) -> ClientResult<Value> {
        self.notes.delete_note(note_id).await
    }

    pub async fn list_notes(&self, params: &NoteListParams) -> ClientResult<OffsetPage> {
        self.notes.list_notes(params).await
    }

    pub async fn add_comment(&self, note_id: i64, body: &CommentBody) -> ClientResult<Value> {
        self.comments.add_comment(note_id, body).await
    }

    pub async fn get_comment(&self, note_id: i64, comment_id: &str) -> ClientResult<Value> {
        self.comments.get_comment(note_id, comment_id).await
    }

    pub async fn update_comment(
        &self,
        note_id: i64,
        comment_id: &str,
        body: &CommentBody,
    ) -> ClientResult<Value> {
        self.comments
            .update_comment(note_id, comment_id, body)
            .await
    }

    pub async fn delete_comment(&self, note_id: i64, comment_id: &str) -> ClientResult<Value> {
        self.comments.delete_comment(note_id, comment_id).await
    }

    pub async fn list_comments(
        &self,
        note_id: i64,
        params: &CommentListParams,
    ) -> ClientResult<OffsetPage> {
        self.comments.list_comments(note_id, params).await
    }

    // ---- Pipelines and stages ----

    pub async fn list_pipelines(&self, params: &PipelineListParams) -> ClientResult<CursorPage> {
        self.pipelines.list_pipelines(params).await
    }

    pub async fn get_pipeline(&self, pipeline_id: i64) -> ClientResult<Value> {
        self.pipelines.get_pipeline(pipeline_id).await
    }

    pub async fn list_stages(&self, params: &StageListParams) -> ClientResult<CursorPage> {
        self.pipelines.list_stages(params).await
    }

    pub async fn get_stage(&self, stage_id: i64) -> ClientResult<Value> {
        self.pipelines.get_stage(stage_id).await
    }

    // ---- Users ----

    pub async fn get_user(&self, user_id: i64) -> ClientResult<Value> {
        self.users.get_user(user_id).await
    }

    pub async fn get_current_user(&self) -> ClientResult<Value> {
        self.users.get_current_user().await
    }

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.users.list_users().await
    }
}
