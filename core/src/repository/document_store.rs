use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TodoRepository;
use crate::client::DocumentClient;
use crate::document::{Document, Fields};
use crate::error::StoreError;
use crate::timestamp;
use crate::transport::Transport;
use crate::types::{NewTodo, TodoEntity, TodoPatch};

/// Collection holding one document per todo; document id == todo id.
pub const COLLECTION: &str = "todos";

const ORDER_FIELD: &str = "created_at";

/// Stored shape of a todo. Decoding is lenient about the content fields and
/// strict about timestamps.
#[derive(Debug, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: bool,
    #[serde(with = "timestamp::micros")]
    created_at: DateTime<Utc>,
    #[serde(with = "timestamp::micros")]
    updated_at: DateTime<Utc>,
}

/// Durable repository backed by the remote document store.
///
/// `update` is read-then-write without a concurrency token: it reads the
/// snapshot, patches the present fields, and returns the snapshot merged with
/// the patch. Two concurrent updates of the same todo race and the later
/// write wins; a field written by the other request in between is not
/// reflected in the returned entity.
#[derive(Clone)]
pub struct DocumentStoreTodoRepository {
    client: DocumentClient,
    transport: Arc<dyn Transport>,
}

impl DocumentStoreTodoRepository {
    pub fn new(client: DocumentClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }
}

impl TodoRepository for DocumentStoreTodoRepository {
    fn list(&self) -> Result<Vec<TodoEntity>, StoreError> {
        let request = self.client.build_list_documents(COLLECTION, Some(ORDER_FIELD));
        let documents = self
            .client
            .parse_list_documents(self.transport.execute(request)?)?;
        documents.into_iter().map(to_entity).collect()
    }

    fn get(&self, id: &str) -> Result<Option<TodoEntity>, StoreError> {
        let request = self.client.build_get_document(COLLECTION, id);
        match self
            .client
            .parse_get_document(self.transport.execute(request)?)
        {
            Ok(document) => to_entity(document).map(Some),
            Err(StoreError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn create(&self, todo: NewTodo, now: DateTime<Utc>) -> Result<TodoEntity, StoreError> {
        let fields = to_fields(&TodoDocument {
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: now,
            updated_at: now,
        })?;
        let request = self.client.build_create_document(COLLECTION, &fields)?;
        let document = self
            .client
            .parse_create_document(self.transport.execute(request)?)?;
        to_entity(document)
    }

    fn update(
        &self,
        id: &str,
        patch: TodoPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<TodoEntity>, StoreError> {
        let Some(mut todo) = self.get(id)? else {
            return Ok(None);
        };

        let mut fields = to_fields(&patch)?;
        fields.insert(
            "updated_at".to_string(),
            Value::String(timestamp::format(&now)),
        );
        let request = self.client.build_update_document(COLLECTION, id, &fields)?;
        match self
            .client
            .parse_update_document(self.transport.execute(request)?)
        {
            Ok(_) => {}
            // Deleted between the read and the write.
            Err(StoreError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        }

        patch.apply_to(&mut todo);
        todo.updated_at = now;
        Ok(Some(todo))
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let request = self.client.build_delete_document(COLLECTION, id);
        match self
            .client
            .parse_delete_document(self.transport.execute(request)?)
        {
            Ok(()) => Ok(true),
            Err(StoreError::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(StoreError::SerializationError(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(StoreError::SerializationError(e.to_string())),
    }
}

fn to_entity(document: Document) -> Result<TodoEntity, StoreError> {
    let stored: TodoDocument = serde_json::from_value(Value::Object(document.fields))
        .map_err(|e| {
            StoreError::DeserializationError(format!("document {}: {e}", document.id))
        })?;
    Ok(TodoEntity {
        id: document.id,
        title: stored.title,
        description: stored.description,
        completed: stored.completed,
        created_at: stored.created_at,
        updated_at: stored.updated_at,
    })
}
