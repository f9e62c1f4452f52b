//! Cursor pagination over the full ordered listing.
//!
//! # Design
//! A cursor is the `created_at` of the last item on the previous page, in the
//! fixed-width form from [`crate::timestamp`]. Each page rescans the whole
//! listing, so cost is O(n) per page. That is acceptable for collections of a
//! few thousand items, not beyond.
//!
//! Known behaviors, kept as they are:
//! - `next_cursor` is only emitted for an exactly full page. A short page
//!   ends the walk.
//! - The next page starts strictly after the cursor, so an item sharing the
//!   cursor's timestamp across a page boundary is skipped.
//! - A cursor that fails to parse, or that lies past the last item, restarts
//!   from the first item instead of erroring.

use serde::{Deserialize, Serialize};

use crate::timestamp;
use crate::types::TodoEntity;

pub const DEFAULT_PAGE_LIMIT: usize = 20;
pub const MAX_PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub limit: Option<i64>,
    pub completed: Option<bool>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub items: Vec<TodoEntity>,
    pub next_cursor: Option<String>,
}

/// Missing limit means the default; anything else is clamped to `[1, 100]`.
pub fn clamp_limit(limit: Option<i64>) -> usize {
    match limit {
        None => DEFAULT_PAGE_LIMIT,
        Some(n) => n.clamp(1, MAX_PAGE_LIMIT as i64) as usize,
    }
}

/// Cut one page out of `todos`, which must already be ordered by `created_at`.
pub fn paginate(todos: Vec<TodoEntity>, request: &PageRequest) -> Page {
    let limit = clamp_limit(request.limit);
    let filtered: Vec<TodoEntity> = match request.completed {
        Some(completed) => todos
            .into_iter()
            .filter(|todo| todo.completed == completed)
            .collect(),
        None => todos,
    };

    let start = request
        .after
        .as_deref()
        .and_then(timestamp::parse)
        .and_then(|cursor| filtered.iter().position(|todo| todo.created_at > cursor))
        .unwrap_or(0);

    let items: Vec<TodoEntity> = filtered.into_iter().skip(start).take(limit).collect();
    let next_cursor = if items.len() == limit {
        items.last().map(|todo| timestamp::format(&todo.created_at))
    } else {
        None
    };

    Page { items, next_cursor }
}
