//! Response handling, separated from transport so it can be tested
//! against plain JSON values.

use serde_json::Value;

use lowshot_core::errors::ApiError;
use lowshot_core::models::LabelRecord;

fn field_string(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Error message precedence: `trace`, then `Error`, then a fallback.
pub(crate) fn service_error_message(body: &Value) -> String {
    field_string(body, "trace")
        .or_else(|| field_string(body, "Error"))
        .unwrap_or_else(|| "unknown error".to_string())
}

pub(crate) fn is_empty_body(body: &Value) -> bool {
    body.is_null() || body.as_object().is_some_and(|obj| obj.is_empty())
}

pub(crate) fn ensure_success(status: u16, body: &Value) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(ApiError::Server {
        status,
        message: service_error_message(body),
    })
}

/// Pull `field` out of the body and decode it.
pub(crate) fn decode_field<T: serde::de::DeserializeOwned>(
    body: &Value,
    field: &str,
) -> Result<T, ApiError> {
    let value = body.get(field).ok_or_else(|| ApiError::Protocol {
        message: format!("response is missing `{field}`"),
    })?;
    serde_json::from_value(value.clone()).map_err(|e| ApiError::Protocol {
        message: format!("malformed `{field}` payload: {e}"),
    })
}

pub(crate) fn parse_task_list(status: u16, body: &Value) -> Result<Vec<String>, ApiError> {
    if is_empty_body(body) {
        return Err(ApiError::EmptyResponse);
    }
    ensure_success(status, body)?;
    decode_field(body, "tasks")
}

/// Seed labels have their own failure contract: a rejected request is
/// logged and yields no labels, but a success that omits `Labels` is a
/// protocol violation carrying the service's own message.
pub(crate) fn parse_seed_labels(status: u16, body: &Value) -> Result<Vec<LabelRecord>, ApiError> {
    if !(200..300).contains(&status) {
        tracing::error!(
            "api: seed label request failed with http {status}: {}",
            service_error_message(body)
        );
        return Ok(Vec::new());
    }
    if body.get("Labels").is_none() {
        return Err(ApiError::Protocol {
            message: service_error_message(body),
        });
    }
    decode_field(body, "Labels")
}

/// A rejected submission is logged, never fatal.
pub(crate) fn handle_submit(status: u16, body: &Value) -> Result<(), ApiError> {
    if !(200..300).contains(&status) {
        tracing::error!(
            "api: prediction submission rejected with http {status}: {}",
            service_error_message(body)
        );
    }
    Ok(())
}
