//! In-memory stand-in for the record service.
//!
//! Records are schemaless JSON objects keyed by their string `id`, stored
//! per database/collection pair. Every response is a JSON envelope with a
//! `status` field; failures use `"error"` plus a `message`.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use axum::Router;

pub type Record = Map<String, Value>;

/// `(database, collection)` → records ordered by id.
pub type Db = Arc<RwLock<HashMap<(String, String), BTreeMap<String, Record>>>>;

#[derive(Clone)]
pub struct AppState {
    about_status: Arc<str>,
    db: Db,
}

#[derive(Deserialize)]
pub struct InsertRecord {
    pub database: String,
    pub collection: String,
    pub record: Record,
}

#[derive(Deserialize)]
pub struct GetRecord {
    pub database: String,
    pub collection: String,
    pub id: String,
}

#[derive(Deserialize)]
pub struct QueryRecords {
    pub database: String,
    pub collection: String,
    #[serde(default)]
    pub query: Record,
}

#[derive(Deserialize)]
pub struct UpdateRecord {
    pub database: String,
    pub collection: String,
    pub id: String,
    pub update: Record,
}

#[derive(Deserialize)]
pub struct DeleteRecord {
    pub database: String,
    pub collection: String,
    pub id: String,
}

type Reply = (StatusCode, Json<Value>);

/// A service whose `/about` reports `"operational"`.
pub fn app() -> Router {
    app_with_status("operational")
}

/// A service whose `/about` reports `about_status`; used to simulate an
/// unhealthy node.
pub fn app_with_status(about_status: &str) -> Router {
    let state = AppState {
        about_status: Arc::from(about_status),
        db: Db::default(),
    };
    Router::new()
        .route("/about", get(about))
        .route("/insert-record", post(insert_record))
        .route("/get-record", get(get_record))
        .route("/query-records", post(query_records))
        .route("/update-record", put(update_record))
        .route("/delete-record", delete(delete_record))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// True when every filter entry equals the record's top-level field.
pub fn matches_filter(record: &Record, filter: &Record) -> bool {
    filter.iter().all(|(key, expected)| record.get(key) == Some(expected))
}

fn success(status: StatusCode, mut payload: Value) -> Reply {
    if let Value::Object(fields) = &mut payload {
        fields.insert("status".to_string(), json!("success"));
    }
    (status, Json(payload))
}

fn failure(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "status": "error", "message": message })))
}

fn not_found(id: &str) -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": "record not found", "id": id })),
    )
}

async fn about(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": &*state.about_status,
        "service": "mock-record-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn insert_record(State(state): State<AppState>, Json(input): Json<InsertRecord>) -> Reply {
    let Some(id) = input.record.get("id").and_then(Value::as_str).map(str::to_string) else {
        return failure(StatusCode::BAD_REQUEST, "record must carry a string id");
    };
    let mut db = state.db.write().await;
    let records = db.entry((input.database, input.collection)).or_default();
    if records.contains_key(&id) {
        return failure(StatusCode::CONFLICT, "record already exists");
    }
    tracing::debug!(%id, "inserting record");
    records.insert(id.clone(), input.record.clone());
    success(StatusCode::CREATED, json!({ "id": id, "record": input.record }))
}

async fn get_record(State(state): State<AppState>, Query(params): Query<GetRecord>) -> Reply {
    let db = state.db.read().await;
    let record = db
        .get(&(params.database, params.collection))
        .and_then(|records| records.get(&params.id));
    match record {
        Some(record) => success(StatusCode::OK, json!({ "record": record })),
        None => not_found(&params.id),
    }
}

async fn query_records(State(state): State<AppState>, Json(input): Json<QueryRecords>) -> Reply {
    let db = state.db.read().await;
    let records: Vec<&Record> = db
        .get(&(input.database, input.collection))
        .map(|records| {
            records
                .values()
                .filter(|record| matches_filter(record, &input.query))
                .collect()
        })
        .unwrap_or_default();
    success(StatusCode::OK, json!({ "count": records.len(), "records": records }))
}

async fn update_record(State(state): State<AppState>, Json(input): Json<UpdateRecord>) -> Reply {
    let mut db = state.db.write().await;
    let Some(record) = db
        .get_mut(&(input.database, input.collection))
        .and_then(|records| records.get_mut(&input.id))
    else {
        return not_found(&input.id);
    };
    for (key, value) in input.update {
        // The id is the storage key and cannot be changed.
        if key != "id" {
            record.insert(key, value);
        }
    }
    success(StatusCode::OK, json!({ "record": record }))
}

async fn delete_record(State(state): State<AppState>, Json(input): Json<DeleteRecord>) -> Reply {
    let mut db = state.db.write().await;
    let removed = db
        .get_mut(&(input.database, input.collection))
        .and_then(|records| records.remove(&input.id));
    match removed {
        Some(_) => success(StatusCode::OK, json!({ "deleted": input.id })),
        None => not_found(&input.id),
    }
}
