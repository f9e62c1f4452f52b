use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::TodoRepository;
use crate::error::StoreError;
use crate::types::{NewTodo, TodoEntity, TodoPatch};

/// Process-local repository for tests and `TODO_STORAGE=memory` runs.
///
/// The vector is kept in insertion order, so a stable sort on `created_at`
/// breaks ties the same way the document store does.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<Vec<TodoEntity>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn todos(&self) -> MutexGuard<'_, Vec<TodoEntity>> {
        self.todos.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn list(&self) -> Result<Vec<TodoEntity>, StoreError> {
        let mut todos = self.todos().clone();
        todos.sort_by_key(|todo| todo.created_at);
        Ok(todos)
    }

    fn get(&self, id: &str) -> Result<Option<TodoEntity>, StoreError> {
        Ok(self.todos().iter().find(|todo| todo.id == id).cloned())
    }

    fn create(&self, todo: NewTodo, now: DateTime<Utc>) -> Result<TodoEntity, StoreError> {
        let entity = TodoEntity {
            id: Uuid::new_v4().simple().to_string(),
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: now,
            updated_at: now,
        };
        self.todos().push(entity.clone());
        Ok(entity)
    }

    fn update(
        &self,
        id: &str,
        patch: TodoPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<TodoEntity>, StoreError> {
        let mut todos = self.todos();
        let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(None);
        };
        patch.apply_to(todo);
        todo.updated_at = now;
        Ok(Some(todo.clone()))
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut todos = self.todos();
        match todos.iter().position(|todo| todo.id == id) {
            Some(index) => {
                todos.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn titles(repo: &InMemoryTodoRepository) -> Vec<String> {
        repo.list().unwrap().into_iter().map(|t| t.title).collect()
    }

    #[test]
    fn list_is_empty_initially() {
        assert!(InMemoryTodoRepository::new().list().unwrap().is_empty());
    }

    #[test]
    fn created_todo_is_retrievable_and_listed() {
        let repo = InMemoryTodoRepository::new();
        let created = repo.create(NewTodo::new("Buy milk"), at(0)).unwrap();

        assert_eq!(created.created_at, at(0));
        assert_eq!(created.updated_at, at(0));
        assert!(!created.completed);
        assert_eq!(repo.get(&created.id).unwrap(), Some(created.clone()));
        assert_eq!(repo.list().unwrap(), vec![created]);
    }

    #[test]
    fn ids_are_unique() {
        let repo = InMemoryTodoRepository::new();
        let a = repo.create(NewTodo::new("a"), at(0)).unwrap();
        let b = repo.create(NewTodo::new("b"), at(0)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn list_orders_by_created_at_then_insertion() {
        let repo = InMemoryTodoRepository::new();
        repo.create(NewTodo::new("late"), at(5)).unwrap();
        repo.create(NewTodo::new("tie-first"), at(1)).unwrap();
        repo.create(NewTodo::new("tie-second"), at(1)).unwrap();
        repo.create(NewTodo::new("early"), at(0)).unwrap();

        assert_eq!(titles(&repo), ["early", "tie-first", "tie-second", "late"]);
    }

    #[test]
    fn list_stays_sorted_across_mutations() {
        let repo = InMemoryTodoRepository::new();
        let mut ids = Vec::new();
        // Interleave creates at scattered times with updates and deletes.
        for step in 0..30i64 {
            let created = repo
                .create(NewTodo::new(format!("t{step}")), at((step * 7) % 11))
                .unwrap();
            ids.push(created.id);
            if step % 3 == 0 {
                let target = &ids[(step as usize) / 2];
                repo.update(target, TodoPatch::default(), at(20 + step)).unwrap();
            }
            if step % 4 == 0 {
                let target = ids.remove(0);
                repo.delete(&target).unwrap();
            }
            let listed = repo.list().unwrap();
            assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        }
    }

    #[test]
    fn empty_patch_only_refreshes_updated_at() {
        let repo = InMemoryTodoRepository::new();
        let created = repo.create(NewTodo::new("keep"), at(0)).unwrap();

        let updated = repo
            .update(&created.id, TodoPatch::default(), at(3))
            .unwrap()
            .unwrap();
        assert_eq!(updated.updated_at, at(3));
        assert_eq!(
            TodoEntity {
                updated_at: created.updated_at,
                ..updated
            },
            created
        );
    }

    #[test]
    fn update_merges_present_fields() {
        let repo = InMemoryTodoRepository::new();
        let created = repo
            .create(
                NewTodo {
                    title: "Walk dog".to_string(),
                    description: Some("park".to_string()),
                    completed: false,
                },
                at(0),
            )
            .unwrap();

        let patch = TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        };
        let updated = repo.update(&created.id, patch, at(1)).unwrap().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Walk dog");
        assert_eq!(updated.description.as_deref(), Some("park"));
        assert_eq!(repo.get(&created.id).unwrap(), Some(updated));
    }

    #[test]
    fn update_unknown_id_does_not_create() {
        let repo = InMemoryTodoRepository::new();
        assert_eq!(
            repo.update("missing", TodoPatch::default(), at(0)).unwrap(),
            None
        );
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn deleted_todo_is_gone_for_every_operation() {
        let repo = InMemoryTodoRepository::new();
        let created = repo.create(NewTodo::new("gone"), at(0)).unwrap();

        assert!(repo.delete(&created.id).unwrap());
        assert_eq!(repo.get(&created.id).unwrap(), None);
        assert_eq!(
            repo.update(&created.id, TodoPatch::default(), at(1)).unwrap(),
            None
        );
        assert!(!repo.delete(&created.id).unwrap());
    }
}
