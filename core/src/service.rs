//! One method per record operation, each a build → execute → parse pass
//! through `RecordService::call`.
//!
//! `call` is the only place that logs a failure; every operation inherits
//! the same "log with the operation name, then propagate" behaviour.

use tracing::{error, info};

use crate::client::RecordClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Filter, Item, ItemUpdate, ServiceResponse};

/// Record operations bound to a `Transport`.
#[derive(Debug, Clone)]
pub struct RecordService<T> {
    client: RecordClient,
    transport: T,
}

impl<T: Transport> RecordService<T> {
    /// Validates `config` up front so a bad base URL is reported as
    /// `ApiError::Config` rather than as a transport failure on first use.
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, ApiError> {
        config.validate()?;
        Ok(Self {
            client: RecordClient::new(config),
            transport,
        })
    }

    pub fn client(&self) -> &RecordClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `Ok(true)` when the service reports itself operational.
    pub fn health_check(&self) -> Result<bool, ApiError> {
        let node_id = &self.client.config().node_id;
        info!(node_id = %node_id, "checking service health");
        let healthy = self.call("health_check", Ok(self.client.build_health_check()), |c, r| {
            c.parse_health_check(r)
        })?;
        info!(node_id = %node_id, "service is operational");
        Ok(healthy)
    }

    pub fn create_item(&self, item: &Item) -> Result<ServiceResponse, ApiError> {
        self.envelope_call("create_item", self.client.build_create_item(item))
    }

    pub fn get_item(&self, id: &str) -> Result<ServiceResponse, ApiError> {
        self.envelope_call("get_item", Ok(self.client.build_get_item(id)))
    }

    /// `None` queries with an empty filter, which matches every record.
    pub fn query_items(&self, filter: Option<&Filter>) -> Result<ServiceResponse, ApiError> {
        let empty = Filter::new();
        let filter = filter.unwrap_or(&empty);
        self.envelope_call("query_items", self.client.build_query_items(filter))
    }

    pub fn update_item(&self, id: &str, update: &ItemUpdate) -> Result<ServiceResponse, ApiError> {
        self.envelope_call("update_item", self.client.build_update_item(id, update))
    }

    pub fn delete_item(&self, id: &str) -> Result<ServiceResponse, ApiError> {
        self.envelope_call("delete_item", self.client.build_delete_item(id))
    }

    fn envelope_call(
        &self,
        operation: &'static str,
        request: Result<HttpRequest, ApiError>,
    ) -> Result<ServiceResponse, ApiError> {
        let envelope = self.call(operation, request, |c, r| c.parse_envelope(r))?;
        info!(operation, status = %envelope.status, envelope = ?envelope.fields, "service responded");
        Ok(envelope)
    }

    fn call<R>(
        &self,
        operation: &'static str,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&RecordClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let result = request
            .and_then(|req| self.transport.execute(req))
            .and_then(|resp| parse(&self.client, resp));
        if let Err(err) = &result {
            error!(operation, error = %err, "record service call failed");
        }
        result
    }
}
