//! Comments on notes.

use crate::error::ValidationError;
use crate::payload::{Payload, QueryParams};
use crate::validation;

pub const DEFAULT_COMMENT_PAGE_LIMIT: i64 = 100;

/// Body for creating or replacing a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody {
    pub content: String,
}

impl CommentBody {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn build_payload(&self) -> Result<Payload, ValidationError> {
        validation::non_blank("content", &self.content, "Comment content cannot be empty")?;
        let mut payload = Payload::new();
        payload.insert("content", self.content.as_str());
        Ok(payload)
    }
}

/// Offset paging for `GET /notes/{id}/comments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentListParams {
    pub start: i64,
    pub limit: i64,
}

impl Default for CommentListParams {
    fn default() -> Self {
        Self {
            start: 0,
            limit: DEFAULT_COMMENT_PAGE_LIMIT,
        }
    }
}

impl CommentListParams {
    pub fn build_query(&self) -> Result<QueryParams, ValidationError> {
        validation::page_start(self.start)?;
        validation::page_limit(self.limit)?;
        let mut query = QueryParams::new();
        query.push("start", self.start);
        query.push("limit", self.limit);
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comment_payload() {
        let payload = CommentBody::new("Agreed").build_payload().unwrap();
        assert_eq!(payload.into_value(), json!({"content": "Agreed"}));
    }

    #[test]
    fn test_blank_comment_rejected() {
        let err = CommentBody::new(" \n ").build_payload().unwrap_err();
        assert_eq!(err.message, "Comment content cannot be empty");
    }

    #[test]
    fn test_list_defaults_and_bounds() {
        let query = CommentListParams::default().build_query().unwrap();
        assert_eq!(query.to_string(), "start=0&limit=100");
        assert!(CommentListParams { start: 0, limit: 0 }.build_query().is_err());
        assert!(CommentListParams { start: -5, limit: 10 }.build_query().is_err());
    }
}
