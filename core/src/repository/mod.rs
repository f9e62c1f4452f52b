//! Storage contract for todos and its two implementations.
//!
//! # Design
//! `TodoRepository` is the seam between the service and the backing store.
//! `DocumentStoreTodoRepository` is the durable variant,
//! `InMemoryTodoRepository` the test double. Which one runs is decided where
//! the service is constructed; nothing else in the crate knows.
//!
//! Calls are blocking. Async callers should move them off the reactor (for
//! example with `tokio::task::spawn_blocking`).

mod document_store;
mod memory;

use chrono::{DateTime, Utc};

pub use document_store::{DocumentStoreTodoRepository, COLLECTION};
pub use memory::InMemoryTodoRepository;

use crate::error::StoreError;
use crate::types::{NewTodo, TodoEntity, TodoPatch};

pub trait TodoRepository: Send + Sync {
    /// Every todo, ascending by `created_at`; ties keep insertion order.
    fn list(&self) -> Result<Vec<TodoEntity>, StoreError>;

    /// `None` when the id is unknown.
    fn get(&self, id: &str) -> Result<Option<TodoEntity>, StoreError>;

    /// Store a new todo under a fresh id with both timestamps set to `now`.
    fn create(&self, todo: NewTodo, now: DateTime<Utc>) -> Result<TodoEntity, StoreError>;

    /// Merge the present fields of `patch` and set `updated_at = now`.
    /// `None` when the id is unknown; never creates.
    fn update(
        &self,
        id: &str,
        patch: TodoPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<TodoEntity>, StoreError>;

    /// Hard delete. `false` when the id is unknown.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;
}
