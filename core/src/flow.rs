//! The fixed demonstration flow: health check, create, read, update, read,
//! delete, all against one hard-coded item.
//!
//! There is exactly one path. The first failing step is logged and ends the
//! flow; earlier steps are not compensated. Writes (create, update, delete)
//! also fail when the service answers with a non-success envelope, so a
//! refused insert never leads to touching a record someone else owns. `run_demo_flow` never returns an
//! error, it reports where the flow stopped.

use std::fmt;

use tracing::{error, info};

use crate::error::ApiError;
use crate::http::Transport;
use crate::service::RecordService;
use crate::types::{Item, ItemUpdate};

pub const DEMO_ITEM_ID: &str = "12345";

/// The item the flow creates.
pub fn demo_item() -> Item {
    Item {
        id: DEMO_ITEM_ID.to_string(),
        name: "Laptop".to_string(),
        category: "Electronics".to_string(),
        quantity: 50,
        price: 99.99,
        location: "Warehouse A".to_string(),
    }
}

/// The partial change the flow applies: quantity and price only.
pub fn demo_update() -> ItemUpdate {
    ItemUpdate {
        quantity: Some(45),
        price: Some(89.99),
        ..ItemUpdate::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    HealthCheck,
    Create,
    Read,
    Update,
    ReadAfterUpdate,
    Delete,
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStep::HealthCheck => "health check",
            FlowStep::Create => "create",
            FlowStep::Read => "read",
            FlowStep::Update => "update",
            FlowStep::ReadAfterUpdate => "read after update",
            FlowStep::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum FlowOutcome {
    Completed,
    Aborted { step: FlowStep, error: ApiError },
}

impl FlowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FlowOutcome::Completed)
    }
}

pub fn run_demo_flow<T: Transport>(service: &RecordService<T>) -> FlowOutcome {
    match run_steps(service) {
        Ok(()) => {
            info!(id = DEMO_ITEM_ID, "demo flow completed");
            FlowOutcome::Completed
        }
        Err((step, err)) => {
            error!(%step, error = %err, "demo flow aborted");
            FlowOutcome::Aborted { step, error: err }
        }
    }
}

fn run_steps<T: Transport>(service: &RecordService<T>) -> Result<(), (FlowStep, ApiError)> {
    service.health_check().map_err(at(FlowStep::HealthCheck))?;

    let created = service
        .create_item(&demo_item())
        .and_then(|envelope| envelope.accepted("create_item"))
        .map_err(at(FlowStep::Create))?;
    info!(id = DEMO_ITEM_ID, status = %created.status, "item created");

    let fetched = service.get_item(DEMO_ITEM_ID).map_err(at(FlowStep::Read))?;
    info!(id = DEMO_ITEM_ID, record = ?fetched.fields.get("record"), "item fetched");

    let updated = service
        .update_item(DEMO_ITEM_ID, &demo_update())
        .and_then(|envelope| envelope.accepted("update_item"))
        .map_err(at(FlowStep::Update))?;
    info!(id = DEMO_ITEM_ID, status = %updated.status, "item updated");

    let refetched = service
        .get_item(DEMO_ITEM_ID)
        .map_err(at(FlowStep::ReadAfterUpdate))?;
    info!(id = DEMO_ITEM_ID, record = ?refetched.fields.get("record"), "item fetched after update");

    service
        .delete_item(DEMO_ITEM_ID)
        .and_then(|envelope| envelope.accepted("delete_item"))
        .map_err(at(FlowStep::Delete))?;
    info!(id = DEMO_ITEM_ID, "item deleted");

    Ok(())
}

fn at(step: FlowStep) -> impl FnOnce(ApiError) -> (FlowStep, ApiError) {
    move |err| (step, err)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::{json, Value};

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Answers every request with a success envelope. The `fail_at`-th
    /// request (zero-based) fails with a transport error; the `reject_at`-th
    /// is answered with a 409 error envelope.
    struct Recording {
        fail_at: Option<usize>,
        reject_at: Option<usize>,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl Recording {
        fn new(fail_at: Option<usize>) -> Self {
            Self {
                fail_at,
                reject_at: None,
                sent: RefCell::new(Vec::new()),
            }
        }

        fn rejecting(index: usize) -> Self {
            Self {
                reject_at: Some(index),
                ..Self::new(None)
            }
        }

        fn calls(&self) -> Vec<(HttpMethod, String)> {
            self.sent
                .borrow()
                .iter()
                .map(|r| {
                    let path = r.url.trim_start_matches("http://localhost:3000");
                    let path = path.split('?').next().unwrap_or_default();
                    (r.method, path.to_string())
                })
                .collect()
        }

        fn body(&self, index: usize) -> Value {
            serde_json::from_str(self.sent.borrow()[index].body.as_deref().unwrap()).unwrap()
        }
    }

    impl Transport for Recording {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let index = self.sent.borrow().len();
            let is_health = request.url.ends_with("/about");
            self.sent.borrow_mut().push(request);
            if self.fail_at == Some(index) {
                return Err(ApiError::Transport("simulated failure".to_string()));
            }
            if self.reject_at == Some(index) {
                return Ok(HttpResponse {
                    status: 409,
                    headers: Vec::new(),
                    body: r#"{"status":"error","message":"record already exists"}"#.to_string(),
                });
            }
            let body = if is_health {
                r#"{"status":"operational"}"#
            } else {
                r#"{"status":"success"}"#
            };
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: body.to_string(),
            })
        }
    }

    fn expected_calls() -> Vec<(HttpMethod, String)> {
        vec![
            (HttpMethod::Get, "/about".to_string()),
            (HttpMethod::Post, "/insert-record".to_string()),
            (HttpMethod::Get, "/get-record".to_string()),
            (HttpMethod::Put, "/update-record".to_string()),
            (HttpMethod::Get, "/get-record".to_string()),
            (HttpMethod::Delete, "/delete-record".to_string()),
        ]
    }

    #[test]
    fn full_flow_issues_calls_in_order_with_exact_payloads() {
        let service = RecordService::new(ClientConfig::default(), Recording::new(None)).unwrap();
        let outcome = run_demo_flow(&service);
        assert!(outcome.is_completed());

        let transport = service.transport();
        assert_eq!(transport.calls(), expected_calls());

        assert_eq!(
            transport.body(1)["record"],
            json!({
                "id": "12345", "name": "Laptop", "category": "Electronics",
                "quantity": 50, "price": 99.99, "location": "Warehouse A"
            })
        );
        assert!(transport.sent.borrow()[2].url.ends_with("&id=12345"));
        assert_eq!(transport.body(3)["id"], "12345");
        assert_eq!(transport.body(3)["update"], json!({"quantity": 45, "price": 89.99}));
        assert!(transport.sent.borrow()[4].url.ends_with("&id=12345"));
        assert_eq!(transport.body(5)["id"], "12345");
    }

    #[test]
    fn no_call_is_made_after_a_failure() {
        let steps = [
            FlowStep::HealthCheck,
            FlowStep::Create,
            FlowStep::Read,
            FlowStep::Update,
            FlowStep::ReadAfterUpdate,
            FlowStep::Delete,
        ];
        for (index, expected_step) in steps.into_iter().enumerate() {
            let service = RecordService::new(ClientConfig::default(), Recording::new(Some(index))).unwrap();
            match run_demo_flow(&service) {
                FlowOutcome::Aborted { step, error } => {
                    assert_eq!(step, expected_step);
                    assert!(matches!(error, ApiError::Transport(_)));
                }
                FlowOutcome::Completed => panic!("flow should abort at {expected_step}"),
            }
            assert_eq!(service.transport().calls(), expected_calls()[..=index].to_vec());
        }
    }

    #[test]
    fn refused_create_stops_the_flow() {
        let service = RecordService::new(ClientConfig::default(), Recording::rejecting(1)).unwrap();
        match run_demo_flow(&service) {
            FlowOutcome::Aborted {
                step: FlowStep::Create,
                error: ApiError::Rejected { operation, envelope },
            } => {
                assert_eq!(operation, "create_item");
                assert_eq!(envelope.fields["message"], "record already exists");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(service.transport().calls(), expected_calls()[..2].to_vec());
    }

    #[test]
    fn refused_writes_stop_the_flow_at_their_step() {
        for (index, expected_step) in [(3, FlowStep::Update), (5, FlowStep::Delete)] {
            let service =
                RecordService::new(ClientConfig::default(), Recording::rejecting(index)).unwrap();
            match run_demo_flow(&service) {
                FlowOutcome::Aborted { step, error } => {
                    assert_eq!(step, expected_step);
                    assert!(matches!(error, ApiError::Rejected { .. }));
                }
                FlowOutcome::Completed => panic!("flow should abort at {expected_step}"),
            }
            assert_eq!(service.transport().calls(), expected_calls()[..=index].to_vec());
        }
    }

    #[test]
    fn non_operational_service_stops_before_create() {
        struct Degraded(RefCell<usize>);
        impl Transport for Degraded {
            fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
                *self.0.borrow_mut() += 1;
                Ok(HttpResponse {
                    status: 200,
                    headers: Vec::new(),
                    body: r#"{"status":"degraded"}"#.to_string(),
                })
            }
        }

        let service = RecordService::new(ClientConfig::default(), Degraded(RefCell::new(0))).unwrap();
        let outcome = run_demo_flow(&service);
        assert!(matches!(
            outcome,
            FlowOutcome::Aborted {
                step: FlowStep::HealthCheck,
                error: ApiError::NotOperational { .. }
            }
        ));
        assert_eq!(*service.transport().0.borrow(), 1);
    }
}
