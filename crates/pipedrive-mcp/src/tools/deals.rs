//! Deal tools: CRUD, listing, search, labels and attached products.

use serde_json::{json, Value};

use pipedrive_client::{
    DealListParams, DealProductUpdate, DealSearchField, DealSearchParams, DealUpdate, NewDeal,
    NewDealProduct, PipedriveClient,
};

use super::helpers::{
    found, non_blank, optional_id, page_size, parse_enum, require_id, split_list, ToolError,
    ToolResult,
};
use super::params::{
    DealCreateParams, DealGetParams, DealLabelCreateParams, DealListToolParams,
    DealProductAddParams, DealProductDeleteParams, DealProductListParams, DealProductUpdateParams,
    DealSearchToolParams, DealUpdateParams, EntityIdParams,
};

const DEFAULT_LIMIT: i64 = 100;

fn cursor_page(key: &str, items: Vec<Value>, next_cursor: Option<String>) -> Value {
    json!({ key: items, "next_cursor": next_cursor })
}

// ── deal_create ──

pub async fn deal_create(client: &PipedriveClient, params: DealCreateParams) -> ToolResult<Value> {
    let deal = NewDeal {
        value: params.value,
        currency: non_blank(params.currency.as_deref()),
        person_id: optional_id(params.person_id.as_deref(), "person_id")?,
        org_id: optional_id(params.org_id.as_deref(), "org_id")?,
        status: parse_enum(params.status.as_deref())?,
        expected_close_date: non_blank(params.expected_close_date.as_deref()),
        owner_id: optional_id(params.owner_id.as_deref(), "owner_id")?,
        stage_id: optional_id(params.stage_id.as_deref(), "stage_id")?,
        pipeline_id: optional_id(params.pipeline_id.as_deref(), "pipeline_id")?,
        visible_to: params.visible_to,
        probability: params.probability,
        custom_fields: params.custom_fields,
        ..NewDeal::new(params.title)
    };
    Ok(client.create_deal(&deal).await?)
}

// ── deal_get ──

pub async fn deal_get(client: &PipedriveClient, params: DealGetParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "id")?;
    let include_fields = split_list(params.include_fields.as_deref());
    let custom_fields = split_list(params.custom_fields.as_deref());
    let deal = client.get_deal(id, &include_fields, &custom_fields).await?;
    found("Deal", id, deal)
}

// ── deal_update ──

pub async fn deal_update(client: &PipedriveClient, params: DealUpdateParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "id")?;
    let update = DealUpdate {
        title: params.title,
        value: params.value,
        currency: non_blank(params.currency.as_deref()),
        person_id: optional_id(params.person_id.as_deref(), "person_id")?,
        org_id: optional_id(params.org_id.as_deref(), "org_id")?,
        status: parse_enum(params.status.as_deref())?,
        expected_close_date: non_blank(params.expected_close_date.as_deref()),
        owner_id: optional_id(params.owner_id.as_deref(), "owner_id")?,
        stage_id: optional_id(params.stage_id.as_deref(), "stage_id")?,
        pipeline_id: optional_id(params.pipeline_id.as_deref(), "pipeline_id")?,
        visible_to: params.visible_to,
        probability: params.probability,
        lost_reason: params.lost_reason,
        custom_fields: params.custom_fields,
    };
    Ok(client.update_deal(id, &update).await?)
}

// ── deal_delete ──

pub async fn deal_delete(client: &PipedriveClient, params: EntityIdParams) -> ToolResult<Value> {
    let id = require_id(&params.id, "id")?;
    Ok(client.delete_deal(id).await?)
}

// ── deal_list ──

pub async fn deal_list(client: &PipedriveClient, params: DealListToolParams) -> ToolResult<Value> {
    let query = DealListParams {
        limit: page_size(params.limit.as_deref(), DEFAULT_LIMIT)?,
        cursor: non_blank(params.cursor.as_deref()),
        filter_id: optional_id(params.filter_id.as_deref(), "filter_id")?,
        owner_id: optional_id(params.owner_id.as_deref(), "owner_id")?,
        person_id: optional_id(params.person_id.as_deref(), "person_id")?,
        org_id: optional_id(params.org_id.as_deref(), "org_id")?,
        pipeline_id: optional_id(params.pipeline_id.as_deref(), "pipeline_id")?,
        stage_id: optional_id(params.stage_id.as_deref(), "stage_id")?,
        status: parse_enum(params.status.as_deref())?,
        sort_by: parse_enum(params.sort_by.as_deref())?,
        sort_direction: parse_enum(params.sort_direction.as_deref())?,
        include_fields: split_list(params.include_fields.as_deref()),
        custom_fields_keys: split_list(params.custom_fields.as_deref()),
        updated_since: non_blank(params.updated_since.as_deref()),
        updated_until: non_blank(params.updated_until.as_deref()),
    };
    let page = client.list_deals(&query).await?;
    Ok(cursor_page("deals", page.items, page.next_cursor))
}

// ── deal_search ──

pub async fn deal_search(
    client: &PipedriveClient,
    params: DealSearchToolParams,
) -> ToolResult<Value> {
    let fields = split_list(params.fields.as_deref())
        .iter()
        .map(|field| field.parse::<DealSearchField>())
        .collect::<Result<Vec<_>, _>>()?;

    let query = DealSearchParams {
        fields,
        exact_match: params.exact_match.unwrap_or(false),
        person_id: optional_id(params.person_id.as_deref(), "person_id")?,
        organization_id: optional_id(params.organization_id.as_deref(), "organization_id")?,
        status: parse_enum(params.status.as_deref())?,
        include_fields: split_list(params.include_fields.as_deref()),
        limit: page_size(params.limit.as_deref(), DEFAULT_LIMIT)?,
        cursor: non_blank(params.cursor.as_deref()),
        ..DealSearchParams::new(params.term.trim())
    };
    let page = client.search_deals(&query).await?;
    Ok(cursor_page("items", page.items, page.next_cursor))
}

// ── deal_label_list ──

pub async fn deal_label_list(client: &PipedriveClient) -> ToolResult<Value> {
    Ok(Value::Array(client.list_deal_labels().await?))
}

// ── deal_label_create ──

pub async fn deal_label_create(
    client: &PipedriveClient,
    params: DealLabelCreateParams,
) -> ToolResult<Value> {
    if params.label.trim().is_empty() {
        return Err(ToolError::Input(
            "Label name is required and cannot be empty".to_string(),
        ));
    }
    let created = client.create_deal_label(&params.label).await?;
    if super::helpers::is_empty_data(&created) {
        return Err(ToolError::Failed(
            "Label was not created: empty response from API".to_string(),
        ));
    }
    Ok(created)
}

// ── deal_product_add ──

pub async fn deal_product_add(
    client: &PipedriveClient,
    params: DealProductAddParams,
) -> ToolResult<Value> {
    let deal_id = require_id(&params.deal_id, "deal_id")?;
    let product_id = require_id(&params.product_id, "product_id")?;

    let mut product = NewDealProduct::new(product_id, params.item_price, params.quantity);
    product.tax = params.tax.unwrap_or(product.tax);
    product.comments = non_blank(params.comments.as_deref());
    product.discount = params.discount.unwrap_or(product.discount);
    if let Some(discount_type) = parse_enum(params.discount_type.as_deref())? {
        product.discount_type = discount_type;
    }
    product.tax_method = parse_enum(params.tax_method.as_deref())?;
    product.product_variation_id =
        optional_id(params.product_variation_id.as_deref(), "product_variation_id")?;
    if let Some(frequency) = parse_enum(params.billing_frequency.as_deref())? {
        product.billing_frequency = frequency;
    }
    product.billing_frequency_cycles = params.billing_frequency_cycles;
    product.billing_start_date = non_blank(params.billing_start_date.as_deref());

    Ok(client.add_product_to_deal(deal_id, &product).await?)
}

// ── deal_product_update ──

pub async fn deal_product_update(
    client: &PipedriveClient,
    params: DealProductUpdateParams,
) -> ToolResult<Value> {
    let deal_id = require_id(&params.deal_id, "deal_id")?;
    let attachment_id = require_id(&params.product_attachment_id, "product_attachment_id")?;
    let update = DealProductUpdate {
        item_price: params.item_price,
        quantity: params.quantity,
        tax: params.tax,
        comments: params.comments,
        discount: params.discount,
        discount_type: parse_enum(params.discount_type.as_deref())?,
        tax_method: parse_enum(params.tax_method.as_deref())?,
        is_enabled: params.is_enabled,
        product_variation_id: optional_id(
            params.product_variation_id.as_deref(),
            "product_variation_id",
        )?,
        billing_frequency: parse_enum(params.billing_frequency.as_deref())?,
        billing_frequency_cycles: params.billing_frequency_cycles,
        billing_start_date: non_blank(params.billing_start_date.as_deref()),
    };
    Ok(client
        .update_product_in_deal(deal_id, attachment_id, &update)
        .await?)
}

// ── deal_product_delete ──

pub async fn deal_product_delete(
    client: &PipedriveClient,
    params: DealProductDeleteParams,
) -> ToolResult<Value> {
    let deal_id = require_id(&params.deal_id, "deal_id")?;
    let attachment_id = require_id(&params.product_attachment_id, "product_attachment_id")?;
    Ok(client
        .delete_product_from_deal(deal_id, attachment_id)
        .await?)
}

// ── deal_product_list ──

pub async fn deal_product_list(
    client: &PipedriveClient,
    params: DealProductListParams,
) -> ToolResult<Value> {
    let deal_id = require_id(&params.deal_id, "deal_id")?;
    let limit = page_size(params.limit.as_deref(), DEFAULT_LIMIT)?;
    let cursor = non_blank(params.cursor.as_deref());
    let page = client
        .list_deal_products(deal_id, limit, cursor.as_deref())
        .await?;
    Ok(cursor_page("products", page.items, page.next_cursor))
}
