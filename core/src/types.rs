//! Domain types for todo items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single todo item as stored and returned by the API.
///
/// `id` is assigned by the store and never changes. `created_at` is fixed at
/// creation, `updated_at` moves forward on every mutation, so
/// `created_at <= updated_at` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoEntity {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
        }
    }
}

/// Partial update. Only the fields present are written; omitted fields stay
/// as they are.
///
/// `description` is tri-state: absent (`None`) leaves it untouched, JSON
/// `null` (`Some(None)`) clears it, a string (`Some(Some(_))`) replaces it.
/// A `null` title or completed flag counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Shallow-merge the present fields into `entity`. Timestamps are left to
    /// the caller.
    pub fn apply_to(&self, entity: &mut TodoEntity) {
        if let Some(title) = &self.title {
            entity.title = title.clone();
        }
        if let Some(description) = &self.description {
            entity.description = description.clone();
        }
        if let Some(completed) = self.completed {
            entity.completed = completed;
        }
    }
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
