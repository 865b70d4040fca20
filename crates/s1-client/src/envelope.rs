//! Common response envelope.
//!
//! Every management API response wraps its payload in the same shape:
//!
//! ```text
//! {
//!   "errors":     [{"code": 4000010, "title": "Validation Error", "detail": "..."}],
//!   "pagination": {"nextCursor": "...", "totalItems": 12},
//!   "data":       <resource-specific payload>
//! }
//! ```
//!
//! The payload is kept as an opaque JSON value until the caller decodes it
//! into the resource type it expects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::{S1Error, S1Result};

/// Decoded response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    /// Platform-reported errors
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<ApiErrorEntry>,

    /// Pagination metadata for list endpoints
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: Pagination,

    /// Resource payload, decoded later by the caller
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Check if the platform reported any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Decode the payload into a resource type.
    ///
    /// `context` names the payload in the error message.
    pub fn into_data<T>(self, context: &str) -> S1Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(self.data).map_err(|e| S1Error::decode(context, e))
    }
}

/// A single platform-reported error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorEntry {
    /// Numeric platform error code
    #[serde(default)]
    pub code: u64,

    /// Short title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Optional detail message
    #[serde(default)]
    pub detail: Option<String>,
}

impl fmt::Display for ApiErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail.as_deref() {
            Some(detail) if !detail.is_empty() => write!(f, "{}: {}", self.title, detail),
            _ => f.write_str(&self.title),
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Cursor for the next page, if there is one
    #[serde(default)]
    pub next_cursor: Option<String>,

    /// Total number of matching items
    #[serde(default)]
    pub total_items: u64,
}

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
