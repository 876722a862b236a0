//! Domain DTOs for the record service.
//!
//! # Design
//! `Item` and `ItemUpdate` are the only shapes the client owns. Filters and
//! response envelopes are dictated by the service, so they stay as opaque
//! `serde_json` values and the client never over-constrains fields it does
//! not read. The request wrappers borrow their contents; they only live long
//! enough to be serialized.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Status string the `/about` endpoint reports for a healthy node.
pub const OPERATIONAL: &str = "operational";

/// A single inventory record. The id is assigned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price: f64,
    pub location: String,
}

/// Partial update for an existing item. Only the fields present are sent;
/// merging them into the stored record is up to the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Field-to-value predicate, interpreted entirely by the service. Empty
/// means "match all".
pub type Filter = Map<String, Value>;

/// Top-level JSON object returned by every endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ServiceResponse {
    /// The status indicator when the service sent it as a string.
    pub fn status_str(&self) -> Option<&str> {
        self.status.as_str()
    }

    pub fn is_success(&self) -> bool {
        self.status_str() == Some("success")
    }

    /// Pass a success envelope through; any other status becomes
    /// `ApiError::Rejected` naming `operation`.
    pub fn accepted(self, operation: &'static str) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                operation,
                envelope: self,
            })
        }
    }

    /// Deserialize one payload entry, e.g. `field::<Item>("record")`.
    /// Returns `Ok(None)` when the key is absent or null.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ApiError::DeserializationError(format!("field {key:?}: {e}"))),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InsertRequest<'a> {
    pub database: &'a str,
    pub collection: &'a str,
    pub record: &'a Item,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub database: &'a str,
    pub collection: &'a str,
    pub query: &'a Filter,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRequest<'a> {
    pub database: &'a str,
    pub collection: &'a str,
    pub id: &'a str,
    pub update: &'a ItemUpdate,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteRequest<'a> {
    pub database: &'a str,
    pub collection: &'a str,
    pub id: &'a str,
}
