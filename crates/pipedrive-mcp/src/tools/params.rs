//! Parameter structs for all MCP tools.
//!
//! Identifiers arrive as decimal strings and are converted by the adapters.
//! The `lead_id` a note attaches to and comment ids are UUID strings and are
//! never converted to integers.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

// ── deal_create ──

/// Parameters for the `deal_create` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealCreateParams {
    #[schemars(description = "Deal title (required)")]
    pub title: String,
    #[schemars(description = "Monetary value of the deal")]
    pub value: Option<f64>,
    #[schemars(description = "Currency code, e.g. 'USD' (defaults to USD)")]
    pub currency: Option<String>,
    #[schemars(description = "ID of the person linked to the deal, e.g. '123'")]
    pub person_id: Option<String>,
    #[schemars(description = "ID of the organization linked to the deal")]
    pub org_id: Option<String>,
    #[schemars(description = "Deal status: open, won or lost (defaults to open)")]
    pub status: Option<String>,
    #[schemars(description = "Expected close date, YYYY-MM-DD")]
    pub expected_close_date: Option<String>,
    #[schemars(description = "ID of the user owning the deal")]
    pub owner_id: Option<String>,
    #[schemars(description = "ID of the stage the deal is placed in")]
    pub stage_id: Option<String>,
    #[schemars(description = "ID of the pipeline the deal belongs to")]
    pub pipeline_id: Option<String>,
    #[schemars(description = "Visibility group (1 owner, 3 owner's group, 5 entire company, 7 followers)")]
    pub visible_to: Option<i64>,
    #[schemars(description = "Success probability, 0-100")]
    pub probability: Option<i64>,
    #[schemars(description = "Custom field values keyed by field key")]
    pub custom_fields: Option<Map<String, Value>>,
}

// ── deal_get ──

/// Parameters for the `deal_get` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealGetParams {
    #[schemars(description = "Deal ID, e.g. '42'")]
    pub id: String,
    #[schemars(description = "Comma-separated optional fields to include, e.g. 'products_count,files_count'")]
    pub include_fields: Option<String>,
    #[schemars(description = "Comma-separated custom field keys to return")]
    pub custom_fields: Option<String>,
}

// ── deal_update ──

/// Parameters for the `deal_update` tool. Only supplied fields change.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealUpdateParams {
    #[schemars(description = "Deal ID to update")]
    pub id: String,
    #[schemars(description = "New title")]
    pub title: Option<String>,
    #[schemars(description = "New monetary value")]
    pub value: Option<f64>,
    #[schemars(description = "New currency code")]
    pub currency: Option<String>,
    #[schemars(description = "New person ID")]
    pub person_id: Option<String>,
    #[schemars(description = "New organization ID")]
    pub org_id: Option<String>,
    #[schemars(description = "New status: open, won or lost")]
    pub status: Option<String>,
    #[schemars(description = "New expected close date, YYYY-MM-DD")]
    pub expected_close_date: Option<String>,
    #[schemars(description = "New owner user ID")]
    pub owner_id: Option<String>,
    #[schemars(description = "New stage ID")]
    pub stage_id: Option<String>,
    #[schemars(description = "New pipeline ID")]
    pub pipeline_id: Option<String>,
    #[schemars(description = "New visibility group")]
    pub visible_to: Option<i64>,
    #[schemars(description = "New success probability, 0-100")]
    pub probability: Option<i64>,
    #[schemars(description = "Reason the deal was lost; only valid together with status 'lost'")]
    pub lost_reason: Option<String>,
    #[schemars(description = "Custom field values keyed by field key")]
    pub custom_fields: Option<Map<String, Value>>,
}

// ── deal_delete / note_get / note_delete / pipeline_get / stage_get / user_get ──

/// Parameters for tools addressing a single entity by numeric ID.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct EntityIdParams {
    #[schemars(description = "Numeric ID as a string, e.g. '42'")]
    pub id: String,
}

// ── deal_list ──

/// Parameters for the `deal_list` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealListToolParams {
    #[schemars(description = "Page size as a string, max '500' (default '100')")]
    pub limit: Option<String>,
    #[schemars(description = "Cursor from a previous response's next_cursor")]
    pub cursor: Option<String>,
    #[schemars(description = "Saved filter ID")]
    pub filter_id: Option<String>,
    #[schemars(description = "Only deals owned by this user ID")]
    pub owner_id: Option<String>,
    #[schemars(description = "Only deals linked to this person ID")]
    pub person_id: Option<String>,
    #[schemars(description = "Only deals linked to this organization ID")]
    pub org_id: Option<String>,
    #[schemars(description = "Only deals in this pipeline ID")]
    pub pipeline_id: Option<String>,
    #[schemars(description = "Only deals in this stage ID")]
    pub stage_id: Option<String>,
    #[schemars(description = "Only deals with this status: open, won or lost")]
    pub status: Option<String>,
    #[schemars(description = "Sort field: id, update_time or add_time")]
    pub sort_by: Option<String>,
    #[schemars(description = "Sort direction: asc or desc")]
    pub sort_direction: Option<String>,
    #[schemars(description = "Comma-separated optional fields to include")]
    pub include_fields: Option<String>,
    #[schemars(description = "Comma-separated custom field keys to return")]
    pub custom_fields: Option<String>,
    #[schemars(description = "Only deals updated at or after this RFC 3339 time")]
    pub updated_since: Option<String>,
    #[schemars(description = "Only deals updated before this RFC 3339 time")]
    pub updated_until: Option<String>,
}

// ── deal_search ──

/// Parameters for the `deal_search` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealSearchToolParams {
    #[schemars(description = "Search term; at least 2 characters unless exact_match is true")]
    pub term: String,
    #[schemars(description = "Comma-separated fields to search: title, notes, custom_fields")]
    pub fields: Option<String>,
    #[schemars(description = "Only return exact matches")]
    pub exact_match: Option<bool>,
    #[schemars(description = "Only deals linked to this person ID")]
    pub person_id: Option<String>,
    #[schemars(description = "Only deals linked to this organization ID")]
    pub organization_id: Option<String>,
    #[schemars(description = "Only deals with this status: open, won or lost")]
    pub status: Option<String>,
    #[schemars(description = "Comma-separated optional fields to include")]
    pub include_fields: Option<String>,
    #[schemars(description = "Page size as a string, max '500' (default '100')")]
    pub limit: Option<String>,
    #[schemars(description = "Cursor from a previous response's next_cursor")]
    pub cursor: Option<String>,
}

// ── deal_label_create ──

/// Parameters for the `deal_label_create` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealLabelCreateParams {
    #[schemars(description = "Label name, at most 255 characters")]
    pub label: String,
}

// ── deal_product_add ──

/// Parameters for the `deal_product_add` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealProductAddParams {
    #[schemars(description = "Deal ID")]
    pub deal_id: String,
    #[schemars(description = "Product ID")]
    pub product_id: String,
    #[schemars(description = "Unit price, non-negative")]
    pub item_price: f64,
    #[schemars(description = "Quantity, greater than zero")]
    pub quantity: i64,
    #[schemars(description = "Tax percentage, non-negative (default 0)")]
    pub tax: Option<f64>,
    #[schemars(description = "Free-form comments")]
    pub comments: Option<String>,
    #[schemars(description = "Discount value, non-negative (default 0)")]
    pub discount: Option<f64>,
    #[schemars(description = "Discount type: percentage or amount (default percentage)")]
    pub discount_type: Option<String>,
    #[schemars(description = "Tax method: inclusive, exclusive or none")]
    pub tax_method: Option<String>,
    #[schemars(description = "Product variation ID")]
    pub product_variation_id: Option<String>,
    #[schemars(description = "Billing frequency: one-time, weekly, monthly, quarterly, semi-annually, annually")]
    pub billing_frequency: Option<String>,
    #[schemars(description = "Number of billing cycles, 1-208; not allowed for one-time")]
    pub billing_frequency_cycles: Option<i64>,
    #[schemars(description = "First billing date, YYYY-MM-DD")]
    pub billing_start_date: Option<String>,
}

// ── deal_product_update ──

/// Parameters for the `deal_product_update` tool. Only supplied fields change.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealProductUpdateParams {
    #[schemars(description = "Deal ID")]
    pub deal_id: String,
    #[schemars(description = "ID of the product attachment on the deal")]
    pub product_attachment_id: String,
    #[schemars(description = "New unit price")]
    pub item_price: Option<f64>,
    #[schemars(description = "New quantity")]
    pub quantity: Option<i64>,
    #[schemars(description = "New tax percentage")]
    pub tax: Option<f64>,
    #[schemars(description = "New comments")]
    pub comments: Option<String>,
    #[schemars(description = "New discount value")]
    pub discount: Option<f64>,
    #[schemars(description = "New discount type: percentage or amount")]
    pub discount_type: Option<String>,
    #[schemars(description = "New tax method: inclusive, exclusive or none")]
    pub tax_method: Option<String>,
    #[schemars(description = "Enable or disable the product on the deal")]
    pub is_enabled: Option<bool>,
    #[schemars(description = "New product variation ID")]
    pub product_variation_id: Option<String>,
    #[schemars(description = "New billing frequency")]
    pub billing_frequency: Option<String>,
    #[schemars(description = "New number of billing cycles, 1-208")]
    pub billing_frequency_cycles: Option<i64>,
    #[schemars(description = "New first billing date, YYYY-MM-DD")]
    pub billing_start_date: Option<String>,
}

// ── deal_product_delete ──

/// Parameters for the `deal_product_delete` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealProductDeleteParams {
    #[schemars(description = "Deal ID")]
    pub deal_id: String,
    #[schemars(description = "ID of the product attachment to remove")]
    pub product_attachment_id: String,
}

// ── deal_product_list ──

/// Parameters for the `deal_product_list` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DealProductListParams {
    #[schemars(description = "Deal ID")]
    pub deal_id: String,
    #[schemars(description = "Page size as a string, max '500' (default '100')")]
    pub limit: Option<String>,
    #[schemars(description = "Cursor from a previous response's next_cursor")]
    pub cursor: Option<String>,
}

// ── note_create ──

/// Parameters for the `note_create` tool. Exactly one entity reference is required.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoteCreateParams {
    #[schemars(description = "HTML note content, at most 100KB")]
    pub content: String,
    #[schemars(description = "Lead UUID to attach the note to")]
    pub lead_id: Option<String>,
    #[schemars(description = "Deal ID to attach the note to")]
    pub deal_id: Option<String>,
    #[schemars(description = "Person ID to attach the note to")]
    pub person_id: Option<String>,
    #[schemars(description = "Organization ID to attach the note to")]
    pub org_id: Option<String>,
    #[schemars(description = "Project ID to attach the note to")]
    pub project_id: Option<String>,
    #[schemars(description = "ID of the user who will own the note")]
    pub user_id: Option<String>,
    #[schemars(description = "Pin the note to the entity it is attached to")]
    pub pinned: Option<bool>,
}

// ── note_update ──

/// Parameters for the `note_update` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoteUpdateParams {
    #[schemars(description = "Note ID to update")]
    pub id: String,
    #[schemars(description = "New HTML content")]
    pub content: Option<String>,
    #[schemars(description = "Re-attach to this lead UUID")]
    pub lead_id: Option<String>,
    #[schemars(description = "Re-attach to this deal ID")]
    pub deal_id: Option<String>,
    #[schemars(description = "Re-attach to this person ID")]
    pub person_id: Option<String>,
    #[schemars(description = "Re-attach to this organization ID")]
    pub org_id: Option<String>,
    #[schemars(description = "Re-attach to this project ID")]
    pub project_id: Option<String>,
    #[schemars(description = "Pin or unpin the note on the entity it is attached to")]
    pub pinned: Option<bool>,
}

// ── note_list ──

/// Parameters for the `note_list` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoteListToolParams {
    #[schemars(description = "Only notes owned by this user ID")]
    pub user_id: Option<String>,
    #[schemars(description = "Only notes on this deal ID")]
    pub deal_id: Option<String>,
    #[schemars(description = "Only notes on this person ID")]
    pub person_id: Option<String>,
    #[schemars(description = "Only notes on this organization ID")]
    pub org_id: Option<String>,
    #[schemars(description = "Only notes on this lead UUID")]
    pub lead_id: Option<String>,
    #[schemars(description = "Only notes pinned to the filtered entity (needs an entity filter)")]
    pub pinned_only: Option<bool>,
    #[schemars(description = "Pagination offset (default 0)")]
    pub start: Option<i64>,
    #[schemars(description = "Page size, 1-500 (default 100)")]
    pub limit: Option<i64>,
    #[schemars(description = "Sort: add_time, update_time, -add_time or -update_time")]
    pub sort: Option<String>,
    #[schemars(description = "Created on or after, YYYY-MM-DD")]
    pub start_date: Option<String>,
    #[schemars(description = "Created on or before, YYYY-MM-DD")]
    pub end_date: Option<String>,
}

// ── comment_add ──

/// Parameters for the `comment_add` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CommentAddParams {
    #[schemars(description = "ID of the note to comment on")]
    pub note_id: String,
    #[schemars(description = "HTML comment content")]
    pub content: String,
}

// ── comment_get / comment_delete ──

/// Parameters for tools addressing one comment on a note.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CommentRefParams {
    #[schemars(description = "ID of the note")]
    pub note_id: String,
    #[schemars(description = "Comment UUID")]
    pub comment_id: String,
}

// ── comment_update ──

/// Parameters for the `comment_update` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CommentUpdateParams {
    #[schemars(description = "ID of the note")]
    pub note_id: String,
    #[schemars(description = "Comment UUID")]
    pub comment_id: String,
    #[schemars(description = "New HTML comment content")]
    pub content: String,
}

// ── comment_list ──

/// Parameters for the `comment_list` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CommentListToolParams {
    #[schemars(description = "ID of the note")]
    pub note_id: String,
    #[schemars(description = "Pagination offset (default 0)")]
    pub start: Option<i64>,
    #[schemars(description = "Page size, 1-500 (default 100)")]
    pub limit: Option<i64>,
}

// ── pipeline_list ──

/// Parameters for the `pipeline_list` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct PipelineListToolParams {
    #[schemars(description = "Page size as a string, max '500' (default '100')")]
    pub limit: Option<String>,
    #[schemars(description = "Cursor from a previous response's next_cursor")]
    pub cursor: Option<String>,
    #[schemars(description = "Sort field: id, update_time or add_time")]
    pub sort_by: Option<String>,
    #[schemars(description = "Sort direction: asc or desc")]
    pub sort_direction: Option<String>,
}

// ── stage_list ──

/// Parameters for the `stage_list` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StageListToolParams {
    #[schemars(description = "Only stages of this pipeline ID")]
    pub pipeline_id: Option<String>,
    #[schemars(description = "Page size as a string, max '500' (default '100')")]
    pub limit: Option<String>,
    #[schemars(description = "Cursor from a previous response's next_cursor")]
    pub cursor: Option<String>,
    #[schemars(description = "Sort field: id, update_time, add_time or order_nr")]
    pub sort_by: Option<String>,
    #[schemars(description = "Sort direction: asc or desc")]
    pub sort_direction: Option<String>,
}
