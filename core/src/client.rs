//! Stateless HTTP request builder and response parser for the record service.
//!
//! # Design
//! `RecordClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each operation has a `build_*` method producing an
//! `HttpRequest`; responses go through `parse_envelope`, or `parse_health`
//! for the liveness check. The caller executes the round-trip in between, so
//! everything here is deterministic and free of I/O.

use serde::Serialize;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    DeleteRequest, Filter, InsertRequest, Item, ItemUpdate, QueryRequest, ServiceResponse,
    UpdateRequest, OPERATIONAL,
};

/// Synchronous, stateless client for the record service.
#[derive(Debug, Clone)]
pub struct RecordClient {
    config: ClientConfig,
}

impl RecordClient {
    pub fn new(config: ClientConfig) -> Self {
        let config = ClientConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_health_check(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/about", self.config.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    pub fn build_create_item(&self, item: &Item) -> Result<HttpRequest, ApiError> {
        let payload = InsertRequest {
            database: &self.config.database,
            collection: &self.config.collection,
            record: item,
        };
        self.json_request(HttpMethod::Post, "/insert-record", &payload)
    }

    pub fn build_get_item(&self, id: &str) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("database", &self.config.database)
            .append_pair("collection", &self.config.collection)
            .append_pair("id", id)
            .finish();
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/get-record?{query}", self.config.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_query_items(&self, filter: &Filter) -> Result<HttpRequest, ApiError> {
        let payload = QueryRequest {
            database: &self.config.database,
            collection: &self.config.collection,
            query: filter,
        };
        self.json_request(HttpMethod::Post, "/query-records", &payload)
    }

    pub fn build_update_item(&self, id: &str, update: &ItemUpdate) -> Result<HttpRequest, ApiError> {
        let payload = UpdateRequest {
            database: &self.config.database,
            collection: &self.config.collection,
            id,
            update,
        };
        self.json_request(HttpMethod::Put, "/update-record", &payload)
    }

    pub fn build_delete_item(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let payload = DeleteRequest {
            database: &self.config.database,
            collection: &self.config.collection,
            id,
        };
        self.json_request(HttpMethod::Delete, "/delete-record", &payload)
    }

    /// Decode any endpoint's JSON envelope.
    ///
    /// The HTTP status is ignored when the body is valid JSON; the envelope
    /// is the service's answer either way.
    pub fn parse_envelope(&self, response: HttpResponse) -> Result<ServiceResponse, ApiError> {
        match serde_json::from_str(&response.body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !(200..300).contains(&response.status) => Err(ApiError::HttpError {
                status: response.status,
                body: response.body,
            }),
            Err(e) => Err(ApiError::DeserializationError(e.to_string())),
        }
    }

    /// `Ok(true)` only when `/about` reports `"operational"`; any other
    /// status is `ApiError::NotOperational`.
    pub fn parse_health_check(&self, response: HttpResponse) -> Result<bool, ApiError> {
        let envelope = self.parse_envelope(response)?;
        match envelope.status_str() {
            Some(OPERATIONAL) => Ok(true),
            Some(other) => Err(self.not_operational(other.to_string())),
            None => Err(self.not_operational(envelope.status.to_string())),
        }
    }

    fn not_operational(&self, status: String) -> ApiError {
        ApiError::NotOperational {
            node_id: self.config.node_id.clone(),
            status,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.config.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}
