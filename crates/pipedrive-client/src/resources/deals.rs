//! Deals, deal products and deal labels (API v2).

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::delete_outcome;
use crate::error::ClientResult;
use crate::models::deal::{
    normalize_label_name, DealListParams, DealProductUpdate, DealSearchParams, DealUpdate,
    NewDeal, NewDealProduct,
};
use crate::payload::QueryParams;
use crate::response::CursorPage;
use crate::transport::{ApiRequest, Transport};
use crate::validation;

/// Page size used when reading deal field definitions.
const DEAL_FIELDS_LIMIT: i64 = 500;

#[derive(Debug, Clone)]
pub struct DealClient {
    transport: Arc<dyn Transport>,
}

impl DealClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn create_deal(&self, deal: &NewDeal) -> ClientResult<Value> {
        let payload = deal.build_payload()?;
        info!(title = %deal.title, "Creating deal");
        debug!(payload = %payload.redacted(), "create_deal payload");

        let response = self
            .transport
            .request(ApiRequest::post("/deals").payload(payload))
            .await?;
        Ok(response.data_object())
    }

    pub async fn get_deal(
        &self,
        deal_id: i64,
        include_fields: &[String],
        custom_fields_keys: &[String],
    ) -> ClientResult<Value> {
        validation::positive_id("deal_id", "deal ID", deal_id)?;
        info!(deal_id, "Fetching deal");

        let mut query = QueryParams::new();
        query.push_list("include_fields", include_fields);
        query.push_list("custom_fields", custom_fields_keys);
        let response = self
            .transport
            .request(ApiRequest::get(format!("/deals/{deal_id}")).query(query))
            .await?;
        Ok(response.data_object())
    }

    pub async fn update_deal(&self, deal_id: i64, update: &DealUpdate) -> ClientResult<Value> {
        validation::positive_id("deal_id", "deal ID", deal_id)?;
        let payload = update.build_payload()?;
        info!(deal_id, fields = payload.len(), "Updating deal");
        debug!(deal_id, payload = %payload.redacted(), "update_deal payload");

        let response = self
            .transport
            .request(ApiRequest::patch(format!("/deals/{deal_id}")).payload(payload))
            .await?;
        Ok(response.data_object())
    }

    pub async fn delete_deal(&self, deal_id: i64) -> ClientResult<Value> {
        validation::positive_id("deal_id", "deal ID", deal_id)?;
        info!(deal_id, "Deleting deal");

        let response = self
            .transport
            .request(ApiRequest::delete(format!("/deals/{deal_id}")))
            .await?;
        if !response.success() {
            warn!(deal_id, "Deal deletion reported failure");
        }
        Ok(delete_outcome(deal_id, response))
    }

    pub async fn list_deals(&self, params: &DealListParams) -> ClientResult<CursorPage> {
        let query = params.build_query()?;
        debug!(%query, "list_deals query");

        let response = self
            .transport
            .request(ApiRequest::get("/deals").query(query))
            .await?;
        let page = CursorPage::from_list(&response);
        info!(
            count = page.items.len(),
            next_cursor = ?page.next_cursor,
            "Listed deals"
        );
        Ok(page)
    }

    pub async fn search_deals(&self, params: &DealSearchParams) -> ClientResult<CursorPage> {
        let query = params.build_query()?;
        info!(term = %params.term, "Searching deals");

        let response = self
            .transport
            .request(ApiRequest::get("/deals/search").query(query))
            .await?;
        let page = CursorPage::from_search(&response);
        info!(
            count = page.items.len(),
            next_cursor = ?page.next_cursor,
            "Deal search complete"
        );
        Ok(page)
    }

    pub async fn add_product(
        &self,
        deal_id: i64,
        product: &NewDealProduct,
    ) -> ClientResult<Value> {
        validation::positive_id("deal_id", "deal ID", deal_id)?;
        let payload = product.build_payload()?;
        info!(deal_id, product_id = product.product_id, "Adding product to deal");
        debug!(deal_id, payload = %payload.redacted(), "add_product payload");

        let response = self
            .transport
            .request(ApiRequest::post(format!("/deals/{deal_id}/products")).payload(payload))
            .await?;
        Ok(response.data_object())
    }

    pub async fn update_product(
        &self,
        deal_id: i64,
        product_attachment_id: i64,
        update: &DealProductUpdate,
    ) -> ClientResult<Value> {
        validation::positive_id("deal_id", "deal ID", deal_id)?;
        validation::positive_id(
            "product_attachment_id",
            "product attachment ID",
            product_attachment_id,
        )?;
        let payload = update.build_payload()?;
        info!(deal_id, product_attachment_id, "Updating deal product");
        debug!(deal_id, payload = %payload.redacted(), "update_product payload");

        let response = self
            .transport
            .request(
                ApiRequest::patch(format!("/deals/{deal_id}/products/{product_attachment_id}"))
                    .payload(payload),
            )
            .await?;
        Ok(response.data_object())
    }

    pub async fn delete_product(
        &self,
        deal_id: i64,
        product_attachment_id: i64,
    ) -> ClientResult<Value> {
        validation::positive_id("deal_id", "deal ID", deal_id)?;
        validation::positive_id(
            "product_attachment_id",
            "product attachment ID",
            product_attachment_id,
        )?;
        info!(deal_id, product_attachment_id, "Removing product from deal");

        let response = self
            .transport
            .request(ApiRequest::delete(format!(
                "/deals/{deal_id}/products/{product_attachment_id}"
            )))
            .await?;
        Ok(delete_outcome(product_attachment_id, response))
    }

    pub async fn list_products(
        &self,
        deal_id: i64,
        limit: i64,
        cursor: Option<&str>,
    ) -> ClientResult<CursorPage> {
        validation::positive_id("deal_id", "deal ID", deal_id)?;
        validation::page_limit(limit)?;

        let mut query = QueryParams::new();
        query.push("limit", limit);
        query.push_opt("cursor", cursor);
        let response = self
            .transport
            .request(ApiRequest::get(format!("/deals/{deal_id}/products")).query(query))
            .await?;
        let page = CursorPage::from_list(&response);
        info!(deal_id, count = page.items.len(), "Listed deal products");
        Ok(page)
    }

    /// Label options of the `label` deal field.
    pub async fn list_labels(&self) -> ClientResult<Vec<Value>> {
        info!("Fetching deal labels from deal fields");
        let mut query = QueryParams::new();
        query.push("limit", DEAL_FIELDS_LIMIT);
        let response = self
            .transport
            .request(ApiRequest::get("/dealFields").query(query))
            .await?;

        let label_field = response.data_list().into_iter().find(|field| {
            ["key", "field_code"]
                .iter()
                .any(|k| field.get(*k).and_then(Value::as_str) == Some("label"))
        });
        match label_field {
            Some(field) => {
                let options = field
                    .get("options")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                info!(count = options.len(), "Found deal labels");
                Ok(options)
            }
            None => {
                warn!("No 'label' field found in deal fields");
                Ok(Vec::new())
            }
        }
    }

    /// Create a label option; returns the created option or `{}`.
    pub async fn create_label(&self, name: &str) -> ClientResult<Value> {
        let label = normalize_label_name(name)?;
        info!(%label, "Creating deal label");

        let response = self
            .transport
            .request(ApiRequest::post("/dealFields/label/options").json(json!([{ "label": label }])))
            .await?;
        let created = response
            .data_list()
            .into_iter()
            .next()
            .unwrap_or_else(|| json!({}));
        info!(label_id = ?created.get("id"), "Created deal label");
        Ok(created)
    }
}
