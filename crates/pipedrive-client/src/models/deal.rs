//! Deal, deal-product and deal-label request models.
//!
//! Each model is a plain struct of optional fields plus a pure builder that
//! validates it and produces the sparse payload or query the API expects.
//! Builders never touch the network, so every rule here is testable alone.

use crate::error::ValidationError;
use crate::payload::{CustomFields, Payload, QueryParams};
use crate::validation::{
    self, BillingFrequency, DealSearchField, DealStatus, DiscountType, SortDirection, SortField,
    TaxMethod,
};

/// Default currency for new deals.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default page size for deal listings and searches.
pub const DEFAULT_DEAL_PAGE_LIMIT: i64 = 100;

/// Maximum deal label length, in characters.
pub const MAX_LABEL_LENGTH: usize = 255;

/// Fields for creating a deal. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDeal {
    pub title: String,
    pub value: Option<f64>,
    /// Three-letter currency code; `USD` when unset
    pub currency: Option<String>,
    pub person_id: Option<i64>,
    pub org_id: Option<i64>,
    /// `open` when unset
    pub status: Option<DealStatus>,
    /// `YYYY-MM-DD`
    pub expected_close_date: Option<String>,
    pub owner_id: Option<i64>,
    pub stage_id: Option<i64>,
    pub pipeline_id: Option<i64>,
    pub visible_to: Option<i64>,
    pub probability: Option<i64>,
    pub custom_fields: Option<CustomFields>,
}

impl NewDeal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn build_payload(&self) -> Result<Payload, ValidationError> {
        validation::non_blank("title", &self.title, "Deal title cannot be empty")?;
        if let Some(p) = self.probability {
            validation::probability(p)?;
        }
        if let Some(date) = &self.expected_close_date {
            validation::iso_date("expected_close_date", date)?;
        }

        let mut payload = Payload::new();
        payload.insert("title", self.title.as_str());
        payload.insert_opt("value", self.value);
        payload.insert(
            "currency",
            self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
        );
        payload.insert_opt("person_id", self.person_id);
        payload.insert_opt("org_id", self.org_id);
        payload.insert("status", self.status.unwrap_or_default().as_str());
        payload.insert_opt("expected_close_date", self.expected_close_date.as_deref());
        payload.insert_opt("owner_id", self.owner_id);
        payload.insert_opt("stage_id", self.stage_id);
        payload.insert_opt("pipeline_id", self.pipeline_id);
        payload.insert_opt("visible_to", self.visible_to);
        payload.insert_opt("probability", self.probability);
        payload.merge_custom_fields(self.custom_fields.as_ref());
        Ok(payload)
    }
}

/// Partial update of a deal; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealUpdate {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub person_id: Option<i64>,
    pub org_id: Option<i64>,
    pub status: Option<DealStatus>,
    pub expected_close_date: Option<String>,
    pub owner_id: Option<i64>,
    pub stage_id: Option<i64>,
    pub pipeline_id: Option<i64>,
    pub visible_to: Option<i64>,
    pub probability: Option<i64>,
    /// Only legal together with `status = lost`
    pub lost_reason: Option<String>,
    pub custom_fields: Option<CustomFields>,
}

impl DealUpdate {
    pub fn build_payload(&self) -> Result<Payload, ValidationError> {
        let mut payload = Payload::new();
        payload.insert_opt("title", self.title.as_deref());
        payload.insert_opt("value", self.value);
        payload.insert_opt("currency", self.currency.as_deref());
        payload.insert_opt("person_id", self.person_id);
        payload.insert_opt("org_id", self.org_id);
        payload.insert_opt("status", self.status.map(|s| s.as_str()));
        payload.insert_opt("expected_close_date", self.expected_close_date.as_deref());
        payload.insert_opt("owner_id", self.owner_id);
        payload.insert_opt("stage_id", self.stage_id);
        payload.insert_opt("pipeline_id", self.pipeline_id);
        payload.insert_opt("visible_to", self.visible_to);
        payload.insert_opt("probability", self.probability);
        payload.insert_opt("lost_reason", self.lost_reason.as_deref());
        payload.merge_custom_fields(self.custom_fields.as_ref());

        if payload.is_empty() {
            return Err(ValidationError::new(
                "payload",
                "At least one field must be provided for updating a deal.",
            ));
        }

        if let Some(title) = &self.title {
            validation::non_blank("title", title, "Deal title cannot be empty")?;
        }
        if self.lost_reason.is_some() && self.status != Some(DealStatus::Lost) {
            return Err(ValidationError::new(
                "lost_reason",
                "Lost reason can only be set when status is 'lost'",
            ));
        }
        if let Some(p) = self.probability {
            validation::probability(p)?;
        }
        if let Some(date) = &self.expected_close_date {
            validation::iso_date("expected_close_date", date)?;
        }
        Ok(payload)
    }
}

/// Filters and paging for `GET /deals`.
#[derive(Debug, Clone, PartialEq)]
pub struct DealListParams {
    pub limit: i64,
    pub cursor: Option<String>,
    pub filter_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub person_id: Option<i64>,
    pub org_id: Option<i64>,
    pub pipeline_id: Option<i64>,
    pub stage_id: Option<i64>,
    pub status: Option<DealStatus>,
    pub sort_by: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
    pub include_fields: Vec<String>,
    pub custom_fields_keys: Vec<String>,
    /// RFC 3339 timestamp
    pub updated_since: Option<String>,
    pub updated_until: Option<String>,
}

impl Default for DealListParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_DEAL_PAGE_LIMIT,
            cursor: None,
            filter_id: None,
            owner_id: None,
            person_id: None,
            org_id: None,
            pipeline_id: None,
            stage_id: None,
            status: None,
            sort_by: None,
            sort_direction: None,
            include_fields: Vec::new(),
            custom_fields_keys: Vec::new(),
            updated_since: None,
            updated_until: None,
        }
    }
}

impl DealListParams {
    pub fn build_query(&self) -> Result<QueryParams, ValidationError> {
        validation::page_limit(self.limit)?;

        let mut query = QueryParams::new();
        query.push("limit", self.limit);
        query.push_opt("cursor", self.cursor.as_deref());
        query.push_opt("filter_id", self.filter_id);
        query.push_opt("owner_id", self.owner_id);
        query.push_opt("person_id", self.person_id);
        query.push_opt("org_id", self.org_id);
        query.push_opt("pipeline_id", self.pipeline_id);
        query.push_opt("stage_id", self.stage_id);
        query.push_opt("status", self.status);
        query.push_opt("sort_by", self.sort_by);
        query.push_opt("sort_direction", self.sort_direction);
        query.push_opt("updated_since", self.updated_since.as_deref());
        query.push_opt("updated_until", self.updated_until.as_deref());
        query.push_list("include_fields", &self.include_fields);
        query.push_list("custom_fields", &self.custom_fields_keys);
        Ok(query)
    }
}

/// Term and filters for `GET /deals/search`.
#[derive(Debug, Clone, PartialEq)]
pub struct DealSearchParams {
    pub term: String,
    pub fields: Vec<DealSearchField>,
    pub exact_match: bool,
    pub person_id: Option<i64>,
    pub organization_id: Option<i64>,
    pub status: Option<DealStatus>,
    pub include_fields: Vec<String>,
    pub limit: i64,
    pub cursor: Option<String>,
}

impl DealSearchParams {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            fields: Vec::new(),
            exact_match: false,
            person_id: None,
            organization_id: None,
            status: None,
            include_fields: Vec::new(),
            limit: DEFAULT_DEAL_PAGE_LIMIT,
            cursor: None,
        }
    }

    pub fn build_query(&self) -> Result<QueryParams, ValidationError> {
        let term_len = self.term.chars().count();
        if self.term.is_empty() {
            return Err(ValidationError::new("term", "Search term cannot be empty"));
        }
        if !self.exact_match && term_len < 2 {
            return Err(ValidationError::new(
                "term",
                "Search term must be at least 2 characters long when exact_match is false",
            ));
        }
        validation::page_limit(self.limit)?;

        let mut query = QueryParams::new();
        query.push("term", &self.term);
        query.push("exact_match", self.exact_match);
        query.push("limit", self.limit);
        query.push_opt("cursor", self.cursor.as_deref());
        query.push_opt("person_id", self.person_id);
        query.push_opt("organization_id", self.organization_id);
        query.push_opt("status", self.status);
        let fields: Vec<&str> = self.fields.iter().map(|f| f.as_str()).collect();
        query.push_list("fields", &fields);
        query.push_list("include_fields", &self.include_fields);
        Ok(query)
    }
}

/// A product line to attach to a deal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDealProduct {
    pub product_id: i64,
    pub item_price: f64,
    pub quantity: i64,
    pub tax: f64,
    pub comments: Option<String>,
    pub discount: f64,
    pub discount_type: DiscountType,
    pub tax_method: Option<TaxMethod>,
    pub product_variation_id: Option<i64>,
    pub billing_frequency: BillingFrequency,
    pub billing_frequency_cycles: Option<i64>,
    /// `YYYY-MM-DD`
    pub billing_start_date: Option<String>,
}

impl NewDealProduct {
    pub fn new(product_id: i64, item_price: f64, quantity: i64) -> Self {
        Self {
            product_id,
            item_price,
            quantity,
            tax: 0.0,
            comments: None,
            discount: 0.0,
            discount_type: DiscountType::default(),
            tax_method: None,
            product_variation_id: None,
            billing_frequency: BillingFrequency::default(),
            billing_frequency_cycles: None,
            billing_start_date: None,
        }
    }

    pub fn build_payload(&self) -> Result<Payload, ValidationError> {
        validation::positive_id("product_id", "product ID", self.product_id)?;
        validation::non_negative("item_price", "item price", self.item_price)?;
        validation::positive_quantity(self.quantity)?;
        validation::non_negative("tax", "tax value", self.tax)?;
        validation::non_negative("discount", "discount value", self.discount)?;
        if let Some(id) = self.product_variation_id {
            validation::positive_id("product_variation_id", "product variation ID", id)?;
        }
        if let Some(cycles) = self.billing_frequency_cycles {
            validation::billing_cycles(cycles)?;
        }
        if let Some(date) = &self.billing_start_date {
            validation::iso_date("billing_start_date", date)?;
        }

        let mut payload = Payload::new();
        payload.insert("product_id", self.product_id);
        payload.insert("item_price", self.item_price);
        payload.insert("quantity", self.quantity);
        payload.insert("tax", self.tax);
        payload.insert_opt(
            "comments",
            self.comments.as_deref().filter(|c| !c.is_empty()),
        );
        payload.insert("discount", self.discount);
        payload.insert("discount_type", self.discount_type.as_str());
        payload.insert_opt("tax_method", self.tax_method.map(|m| m.as_str()));
        payload.insert_opt("product_variation_id", self.product_variation_id);
        payload.insert("billing_frequency", self.billing_frequency.as_str());
        payload.insert_opt("billing_frequency_cycles", self.billing_frequency_cycles);
        payload.insert_opt("billing_start_date", self.billing_start_date.as_deref());
        Ok(payload)
    }
}

/// Partial update of an attached deal product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealProductUpdate {
    pub item_price: Option<f64>,
    pub quantity: Option<i64>,
    pub tax: Option<f64>,
    pub comments: Option<String>,
    pub discount: Option<f64>,
    pub discount_type: Option<DiscountType>,
    pub tax_method: Option<TaxMethod>,
    pub is_enabled: Option<bool>,
    pub product_variation_id: Option<i64>,
    pub billing_frequency: Option<BillingFrequency>,
    pub billing_frequency_cycles: Option<i64>,
    pub billing_start_date: Option<String>,
}

impl DealProductUpdate {
    pub fn build_payload(&self) -> Result<Payload, ValidationError> {
        if let Some(price) = self.item_price {
            validation::non_negative("item_price", "item price", price)?;
        }
        if let Some(quantity) = self.quantity {
            validation::positive_quantity(quantity)?;
        }
        if let Some(tax) = self.tax {
            validation::non_negative("tax", "tax value", tax)?;
        }
        if let Some(discount) = self.discount {
            validation::non_negative("discount", "discount value", discount)?;
        }
        if let Some(id) = self.product_variation_id {
            validation::positive_id("product_variation_id", "product variation ID", id)?;
        }
        if let Some(cycles) = self.billing_frequency_cycles {
            validation::billing_cycles(cycles)?;
        }
        if let Some(date) = &self.billing_start_date {
            validation::iso_date("billing_start_date", date)?;
        }

        let mut payload = Payload::new();
        payload.insert_opt("item_price", self.item_price);
        payload.insert_opt("quantity", self.quantity);
        payload.insert_opt("tax", self.tax);
        payload.insert_opt("comments", self.comments.as_deref());
        payload.insert_opt("discount", self.discount);
        payload.insert_opt("discount_type", self.discount_type.map(|d| d.as_str()));
        payload.insert_opt("tax_method", self.tax_method.map(|m| m.as_str()));
        payload.insert_opt("is_enabled", self.is_enabled);
        payload.insert_opt("product_variation_id", self.product_variation_id);
        payload.insert_opt(
            "billing_frequency",
            self.billing_frequency.map(|b| b.as_str()),
        );
        payload.insert_opt("billing_frequency_cycles", self.billing_frequency_cycles);
        payload.insert_opt("billing_start_date", self.billing_start_date.as_deref());

        if payload.is_empty() {
            return Err(ValidationError::new(
                "payload",
                "At least one field must be provided for updating a product in a deal.",
            ));
        }
        Ok(payload)
    }
}

/// Trim a label name and enforce the length bound.
pub fn normalize_label_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::new("label", "Label name cannot be empty"));
    }
    if name.chars().count() > MAX_LABEL_LENGTH {
        return Err(ValidationError::new(
            "label",
            format!("Label name must be {MAX_LABEL_LENGTH} characters or fewer"),
        ));
    }
    Ok(name.to_string())
}
