//! Shared helper functions for MCP tool implementations.
//!
//! Every tool answers with the same envelope:
//! `{"success": true, "data": ...}` or `{"success": false, "error": "...", "data"?: ...}`.
//! [`respond`] is the one place adapter results and errors become that envelope.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

use pipedrive_client::validation::MAX_PAGE_LIMIT;
use pipedrive_client::{ClientError, ValidationError};

/// Why a tool call did not produce data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A string parameter could not be converted.
    #[error("{0}")]
    Input(String),
    /// The API answered but returned nothing for the requested id.
    #[error("{0}")]
    NotFound(String),
    /// The call completed without the expected result.
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<ValidationError> for ToolError {
    fn from(e: ValidationError) -> Self {
        ToolError::Client(ClientError::Validation(e))
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Build the envelope JSON string.
pub fn format_tool_response(success: bool, data: Option<Value>, error: Option<&str>) -> String {
    let mut envelope = Map::new();
    envelope.insert("success".to_string(), Value::Bool(success));
    if success {
        envelope.insert("data".to_string(), data.unwrap_or(Value::Null));
    } else {
        envelope.insert(
            "error".to_string(),
            Value::String(error.unwrap_or("Unknown error").to_string()),
        );
        if let Some(data) = data {
            envelope.insert("data".to_string(), data);
        }
    }
    Value::Object(envelope).to_string()
}

/// Translate an adapter result into the envelope, logging failures.
pub fn respond(tool: &str, result: ToolResult<Value>) -> String {
    match result {
        Ok(data) => format_tool_response(true, Some(data), None),
        Err(ToolError::Input(message)) | Err(ToolError::Failed(message)) => {
            error!(tool, %message, "Tool call rejected");
            format_tool_response(false, None, Some(&message))
        }
        Err(ToolError::NotFound(message)) => {
            warn!(tool, %message, "Entity not found");
            format_tool_response(false, None, Some(&message))
        }
        Err(ToolError::Client(e)) => client_error_response(tool, e),
    }
}

fn client_error_response(tool: &str, e: ClientError) -> String {
    match e {
        ClientError::Validation(v) => {
            error!(tool, field = %v.field, message = %v.message, "Validation failed");
            format_tool_response(false, None, Some(&format!("Validation error: {v}")))
        }
        ClientError::Api {
            status,
            message,
            body,
        } => {
            error!(tool, status, %message, response = %body, "Pipedrive API error");
            format_tool_response(
                false,
                Some(body),
                Some(&format!("Pipedrive API error: {message}")),
            )
        }
        other => {
            error!(tool, error = ?other, "Unexpected error");
            format_tool_response(
                false,
                None,
                Some(&format!("An unexpected error occurred: {other}")),
            )
        }
    }
}

/// Parse a decimal id string. Blank input is reported as missing.
pub fn convert_id_string(raw: &str, field: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| format!("{field} must be a numeric string, got '{trimmed}'"))
}

/// Like [`convert_id_string`], but absent or blank means "not given".
pub fn parse_optional_id(raw: Option<&str>, field: &str) -> Result<Option<i64>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => convert_id_string(value, field).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn require_id(raw: &str, field: &str) -> ToolResult<i64> {
    convert_id_string(raw, field).map_err(ToolError::Input)
}

pub(crate) fn optional_id(raw: Option<&str>, field: &str) -> ToolResult<Option<i64>> {
    parse_optional_id(raw, field).map_err(ToolError::Input)
}

/// Trimmed value, `None` when absent or blank.
pub(crate) fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an optional wire enumeration; blank means "not given".
pub(crate) fn parse_enum<T>(raw: Option<&str>) -> ToolResult<Option<T>>
where
    T: FromStr<Err = ValidationError>,
{
    match non_blank(raw) {
        Some(value) => value.parse::<T>().map(Some).map_err(ToolError::from),
        None => Ok(None),
    }
}

/// Page size given as a string; capped at the API maximum.
pub(crate) fn page_size(raw: Option<&str>, default: i64) -> ToolResult<i64> {
    Ok(optional_id(raw, "limit")?
        .unwrap_or(default)
        .min(MAX_PAGE_LIMIT))
}

/// Comma-separated list parameter.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

pub(crate) fn is_empty_data(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Pass through a fetched entity, or report it missing.
pub(crate) fn found(entity: &str, id: impl fmt::Display, data: Value) -> ToolResult<Value> {
    if is_empty_data(&data) {
        Err(ToolError::NotFound(format!("{entity} with ID {id} not found")))
    } else {
        Ok(data)
    }
}
