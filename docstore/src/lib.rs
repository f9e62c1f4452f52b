//! Schemaless document store served over HTTP.
//!
//! # Design
//! Documents are flat JSON objects grouped into collections, and collections
//! are namespaced by database name. The store assigns document ids on insert
//! and remembers insertion order, so an ordered scan is stable when several
//! documents share the same sort key. State lives in memory for the lifetime
//! of the process.
//!
//! Routes (all under `/v1/databases/{database}/collections/{collection}`):
//!
//! | method | path               | result |
//! |--------|--------------------|--------|
//! | GET    | `/documents`       | every document, `?order_by=<field>` sorts by that field |
//! | POST   | `/documents`       | 201 with the stored document and its new id |
//! | GET    | `/documents/{id}`  | the document or 404 |
//! | PATCH  | `/documents/{id}`  | top-level merge, 404 when missing (no upsert) |
//! | DELETE | `/documents/{id}`  | 204 or 404 |

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub type Fields = Map<String, Value>;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<Document>,
}

/// Request body for POST and PATCH.
#[derive(Debug, Deserialize)]
pub struct WriteDocument {
    pub fields: Fields,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub order_by: Option<String>,
}

#[derive(Debug)]
struct StoredDocument {
    seq: u64,
    fields: Fields,
}

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    documents: HashMap<String, StoredDocument>,
}

impl Collection {
    fn insert(&mut self, id: String, fields: Fields) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.documents.insert(id, StoredDocument { seq, fields });
    }

    fn scan(&self, order_by: Option<&str>) -> Vec<Document> {
        let mut entries: Vec<(&String, &StoredDocument)> = self.documents.iter().collect();
        match order_by {
            Some(field) => entries.sort_by(|(_, a), (_, b)| {
                compare_values(a.fields.get(field), b.fields.get(field)).then(a.seq.cmp(&b.seq))
            }),
            None => entries.sort_by_key(|(_, stored)| stored.seq),
        }
        entries
            .into_iter()
            .map(|(id, stored)| Document {
                id: id.clone(),
                fields: stored.fields.clone(),
            })
            .collect()
    }
}

/// All collections of all databases, keyed by `(database, collection)`.
#[derive(Debug, Default)]
pub struct Store {
    collections: HashMap<(String, String), Collection>,
}

type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::default();
    Router::new()
        .route(
            "/v1/databases/{database}/collections/{collection}/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/v1/databases/{database}/collections/{collection}/documents/{id}",
            get(get_document)
                .patch(update_document)
                .delete(delete_document),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

static NULL: Value = Value::Null;

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order used by ordered scans: null < bool < number < string < array
/// < object. A missing field compares as null.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&NULL);
    let b = b.unwrap_or(&NULL);
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(x, y)| compare_values(Some(x), Some(y)))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

async fn list_documents(
    State(db): State<Db>,
    Path((database, collection)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
) -> Json<DocumentList> {
    let store = db.read().await;
    let documents = store
        .collections
        .get(&(database, collection))
        .map(|c| c.scan(query.order_by.as_deref()))
        .unwrap_or_default();
    Json(DocumentList { documents })
}

async fn create_document(
    State(db): State<Db>,
    Path((database, collection)): Path<(String, String)>,
    Json(input): Json<WriteDocument>,
) -> (StatusCode, Json<Document>) {
    let id = Uuid::new_v4().simple().to_string();
    let mut store = db.write().await;
    store
        .collections
        .entry((database, collection))
        .or_default()
        .insert(id.clone(), input.fields.clone());
    tracing::debug!(%id, "document created");
    (
        StatusCode::CREATED,
        Json(Document {
            id,
            fields: input.fields,
        }),
    )
}

async fn get_document(
    State(db): State<Db>,
    Path((database, collection, id)): Path<(String, String, String)>,
) -> Result<Json<Document>, StatusCode> {
    let store = db.read().await;
    store
        .collections
        .get(&(database, collection))
        .and_then(|c| c.documents.get(&id))
        .map(|stored| {
            Json(Document {
                id,
                fields: stored.fields.clone(),
            })
        })
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_document(
    State(db): State<Db>,
    Path((database, collection, id)): Path<(String, String, String)>,
    Json(input): Json<WriteDocument>,
) -> Result<Json<Document>, StatusCode> {
    let mut store = db.write().await;
    let stored = store
        .collections
        .get_mut(&(database, collection))
        .and_then(|c| c.documents.get_mut(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    stored.fields.extend(input.fields);
    Ok(Json(Document {
        id,
        fields: stored.fields.clone(),
    }))
}

async fn delete_document(
    State(db): State<Db>,
    Path((database, collection, id)): Path<(String, String, String)>,
) -> StatusCode {
    let mut store = db.write().await;
    let removed = store
        .collections
        .get_mut(&(database, collection))
        .and_then(|c| c.documents.remove(&id));
    match removed {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}
