// Common DTOs for the public API
//
// These types are shared across multiple API endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
/// The `error` field is either a fixed message string or, for validation
/// failures, a map of field name to message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// What went wrong. Fixed per failure kind, never echoes internals.
    #[schema(value_type = Object, example = "invalid email or password")]
    pub error: serde_json::Value,
}

impl ErrorResponse {
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            error: serde_json::Value::String(msg.into()),
        }
    }

    pub fn fields(errors: ValidationErrors) -> Self {
        Self {
            error: serde_json::to_value(errors.0).unwrap_or_default(),
        }
    }
}

/// Per-field validation failures, keyed by the JSON field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `Err(self)` if any field failed, so DTO validators can end
    /// with `errors.into_result()`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}
