//! Sparse request bodies and flattened query strings.
//!
//! Both builders only record values the caller actually supplied, so an
//! unset optional never reaches the wire as `null`. Absence means "leave
//! unchanged" for PATCH/PUT bodies and "no filter" for list queries.

use std::fmt;

use serde_json::{Map, Value};

/// Caller-supplied custom field values keyed by Pipedrive field hash.
pub type CustomFields = Map<String, Value>;

/// Fields whose values are masked in debug logs.
const REDACTED_FIELDS: &[&str] = &["value", "item_price"];

/// Ordered JSON object containing only explicitly supplied fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Insert only when a value is present.
    pub fn insert_opt<T: Into<Value>>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Merge custom fields last; a custom key that collides with a named field wins.
    pub fn merge_custom_fields(&mut self, fields: Option<&CustomFields>) {
        if let Some(fields) = fields {
            for (key, value) in fields {
                self.0.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copy of the payload with monetary values masked, for logging.
    pub fn redacted(&self) -> Value {
        let mut masked = self.0.clone();
        for field in REDACTED_FIELDS {
            if let Some(slot) = masked.get_mut(*field) {
                *slot = Value::String("[REDACTED]".to_string());
            }
        }
        Value::Object(masked)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Query string pairs for GET requests, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl fmt::Display) {
        self.0.push((key.to_string(), value.to_string()));
    }

    pub fn push_opt<T: fmt::Display>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Comma-join a list filter; empty lists are omitted.
    pub fn push_list<T: AsRef<str>>(&mut self, key: &str, values: &[T]) {
        if values.is_empty() {
            return;
        }
        let joined = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.push(key, joined);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_opt_skips_none() {
        let mut payload = Payload::new();
        payload.insert("title", "Big deal");
        payload.insert_opt("value", None::<f64>);
        payload.insert_opt("owner_id", Some(7_i64));

        assert_eq!(payload.len(), 2);
        assert!(!payload.contains_key("value"));
        assert_eq!(
            payload.into_value(),
            json!({"title": "Big deal", "owner_id": 7})
        );
    }

    #[test]
    fn test_payload_preserves_insertion_order() {
        let mut payload = Payload::new();
        payload.insert("title", "t");
        payload.insert("currency", "EUR");
        payload.insert("status", "open");
        let keys: Vec<&str> = payload.keys().collect();
        assert_eq!(keys, vec!["title", "currency", "status"]);
    }

    #[test]
    fn test_custom_fields_win_on_collision() {
        let mut payload = Payload::new();
        payload.insert("title", "named");
        let mut custom = CustomFields::new();
        custom.insert("title".into(), json!("custom"));
        custom.insert("abc123".into(), json!(42));
        payload.merge_custom_fields(Some(&custom));

        assert_eq!(payload.get("title"), Some(&json!("custom")));
        assert_eq!(payload.get("abc123"), Some(&json!(42)));
    }

    #[test]
    fn test_redacted_masks_monetary_fields() {
        let mut payload = Payload::new();
        payload.insert("title", "t");
        payload.insert("value", 1500.0);
        payload.insert("item_price", 9.99);

        let masked = payload.redacted();
        assert_eq!(masked["value"], json!("[REDACTED]"));
        assert_eq!(masked["item_price"], json!("[REDACTED]"));
        assert_eq!(masked["title"], json!("t"));
        // original untouched
        assert_eq!(payload.get("value"), Some(&json!(1500.0)));
    }

    #[test]
    fn test_query_list_is_comma_joined() {
        let mut query = QueryParams::new();
        query.push_list("fields", &["title", "notes"]);
        query.push_list::<&str>("include_fields", &[]);
        assert_eq!(query.get("fields"), Some("title,notes"));
        assert!(query.get("include_fields").is_none());
    }

    #[test]
    fn test_query_push_opt_and_display() {
        let mut query = QueryParams::new();
        query.push("limit", 100);
        query.push_opt("cursor", None::<&str>);
        query.push_opt("status", Some("open"));
        assert_eq!(query.len(), 2);
        assert_eq!(query.to_string(), "limit=100&status=open");
    }
}
