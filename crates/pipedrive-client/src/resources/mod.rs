//! Per-entity resource clients.
//!
//! Each client owns one entity's endpoints. Builders validate input before
//! any request is issued; responses are unwrapped from the envelope here so
//! callers only see `data`.

pub mod comments;
pub mod deals;
pub mod notes;
pub mod pipelines;
pub mod users;

use serde_json::{json, Value};

use crate::response::ApiResponse;

pub use comments::CommentClient;
pub use deals::DealClient;
pub use notes::NoteClient;
pub use pipelines::PipelineClient;
pub use users::UserClient;

/// Deletes report failure in-band: a `success: false` envelope becomes
/// `{id, error_details}` instead of an error.
pub(crate) fn delete_outcome(id: i64, response: ApiResponse) -> Value {
    if response.success() {
        response.data_object()
    } else {
        json!({ "id": id, "error_details": response.into_value() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_outcome_success_returns_data() {
        let response = ApiResponse::new(json!({"success": true, "data": {"id": 4}}));
        assert_eq!(delete_outcome(4, response), json!({"id": 4}));
    }

    #[test]
    fn test_delete_outcome_failure_wraps_raw_response() {
        let raw = json!({"success": false, "error": "Item locked"});
        let outcome = delete_outcome(4, ApiResponse::new(raw.clone()));
        assert_eq!(outcome, json!({"id": 4, "error_details": raw}));
    }
}
