// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Validate request parsing

use serde_json::Value;

use crate::api::errors::ApiError;

/// Card/PIN pair typed in by the user, already trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateRequest {
    pub card: String,
    pub pin: String,
}

impl ValidateRequest {
    /// Parse a raw request body
    ///
    /// The body must be a JSON object. Missing or `null` fields become
    /// empty strings; numbers are taken as their JSON text and booleans as
    /// `True`/`False`.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::InternalError(format!("Invalid JSON body: {}", e)))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, ApiError> {
        let object = value.as_object().ok_or_else(|| {
            ApiError::InternalError("Request body must be a JSON object".to_string())
        })?;

        Ok(Self {
            card: field_text(object.get("card")),
            pin: field_text(object.get("pin")),
        })
    }
}

/// `application/json` or an `application/*+json` type, parameters ignored
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}
