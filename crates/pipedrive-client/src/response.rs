//! Decoded response envelopes and page types.
//!
//! Pipedrive wraps every payload as `{success, data, additional_data?}`.
//! Cursor-paged endpoints report `additional_data.next_cursor`; offset-paged
//! endpoints report `additional_data.pagination.more_items_in_collection`.
//! The two page shapes are kept as separate types.

use serde::Serialize;
use serde_json::{json, Value};

/// Raw response envelope with accessors for the pieces resource clients need.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    raw: Value,
}

impl ApiResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The envelope's `success` flag; absent counts as failure.
    pub fn success(&self) -> bool {
        self.raw
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// `data` as returned, or an empty object when absent or null.
    pub fn data_object(&self) -> Value {
        match self.raw.get("data") {
            None | Some(Value::Null) => json!({}),
            Some(data) => data.clone(),
        }
    }

    /// `data` as a list; anything but an array yields an empty list.
    pub fn data_list(&self) -> Vec<Value> {
        self.raw
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    /// Search results nest one level deeper, under `data.items`.
    pub fn search_items(&self) -> Vec<Value> {
        self.raw
            .get("data")
            .and_then(|data| data.get("items"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    pub fn next_cursor(&self) -> Option<String> {
        self.raw
            .get("additional_data")
            .and_then(|extra| extra.get("next_cursor"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn more_items_in_collection(&self) -> bool {
        self.raw
            .pointer("/additional_data/pagination/more_items_in_collection")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }
}

/// One page from a cursor-paginated endpoint. `next_cursor` is `None` on the last page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CursorPage {
    pub items: Vec<Value>,
    pub next_cursor: Option<String>,
}

impl CursorPage {
    pub fn from_list(response: &ApiResponse) -> Self {
        Self {
            items: response.data_list(),
            next_cursor: response.next_cursor(),
        }
    }

    pub fn from_search(response: &ApiResponse) -> Self {
        Self {
            items: response.search_items(),
            next_cursor: response.next_cursor(),
        }
    }
}

/// One page from an offset-paginated endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OffsetPage {
    pub items: Vec<Value>,
    pub has_more: bool,
}

impl OffsetPage {
    pub fn from_list(response: &ApiResponse) -> Self {
        Self {
            items: response.data_list(),
            has_more: response.more_items_in_collection(),
        }
    }
}
