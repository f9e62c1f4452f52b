//! Thin orchestration over a `TodoRepository`.
//!
//! The service reads the clock once per mutation and passes that instant
//! down, so a todo's timestamps all come from a single reading. Everything
//! else is forwarded as is.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::repository::TodoRepository;
use crate::timestamp;
use crate::types::{NewTodo, TodoEntity, TodoPatch};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
    clock: Clock,
}

impl fmt::Debug for TodoService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoService").finish_non_exhaustive()
    }
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self::with_clock(repository, Arc::new(timestamp::now))
    }

    pub fn with_clock(repository: Arc<dyn TodoRepository>, clock: Clock) -> Self {
        Self { repository, clock }
    }

    pub fn list_todos(&self) -> Result<Vec<TodoEntity>, StoreError> {
        self.repository.list()
    }

    pub fn get_todo(&self, id: &str) -> Result<Option<TodoEntity>, StoreError> {
        self.repository.get(id)
    }

    pub fn create_todo(&self, todo: NewTodo) -> Result<TodoEntity, StoreError> {
        let created = self.repository.create(todo, (self.clock)())?;
        tracing::debug!(id = %created.id, "todo created");
        Ok(created)
    }

    pub fn update_todo(&self, id: &str, patch: TodoPatch) -> Result<Option<TodoEntity>, StoreError> {
        let updated = self.repository.update(id, patch, (self.clock)())?;
        tracing::debug!(%id, found = updated.is_some(), "todo updated");
        Ok(updated)
    }

    pub fn delete_todo(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = self.repository.delete(id)?;
        tracing::debug!(%id, deleted, "todo deleted");
        Ok(deleted)
    }
}
