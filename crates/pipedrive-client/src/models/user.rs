//! Pipedrive user records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn default_active() -> bool {
    true
}

/// Accepts `true`/`false` as well as the `0`/`1` some accounts return.
fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        _ => None,
    })
}

/// A company user. Unknown response fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_active")]
    pub active_flag: bool,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub timezone_name: Option<String>,
    #[serde(default)]
    pub timezone_offset: Option<String>,
    #[serde(default)]
    pub lang: Option<i64>,
}

impl User {
    pub fn from_api(data: &Value) -> serde_json::Result<Self> {
        User::deserialize(data)
    }
}
