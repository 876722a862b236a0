//! Blocking client core for an inventory record service.
//!
//! # Overview
//! Wraps the service's six JSON endpoints (health, insert, get, query,
//! update, delete) and runs a fixed create/read/update/read/delete
//! demonstration flow against one collection.
//!
//! # Design
//! - `RecordClient` is stateless: it turns operations into `HttpRequest`
//!   values and `HttpResponse` values into envelopes, never touching the
//!   network.
//! - `RecordService` pairs a client with a `Transport` and funnels every
//!   operation through one execute-and-log helper.
//! - `UreqTransport` is the production transport; tests substitute their own.
//! - Response envelopes and filters stay opaque `serde_json` values.

pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use client::RecordClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use flow::{run_demo_flow, FlowOutcome, FlowStep};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use service::RecordService;
pub use transport::UreqTransport;
pub use types::{Filter, Item, ItemUpdate, ServiceResponse};
