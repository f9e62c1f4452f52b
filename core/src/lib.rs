//! Domain core of the todo backend.
//!
//! # Overview
//! Todo entities, the repository contract with a document-store and an
//! in-memory implementation, the service that stamps mutations with the
//! current time, and cursor pagination over the ordered listing.
//!
//! # Design
//! - `DocumentClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO). A `Transport`
//!   executes the round-trip; `UreqTransport` is the blocking production one.
//! - `TodoRepository` is the only abstraction boundary. The service holds an
//!   `Arc<dyn TodoRepository>` chosen by whoever constructs it.
//! - All repository calls are synchronous and make exactly one or two store
//!   round-trips. There are no retries and no caching.

pub mod client;
pub mod document;
pub mod error;
pub mod http;
pub mod pagination;
pub mod repository;
pub mod service;
pub mod timestamp;
pub mod transport;
pub mod types;

pub use client::DocumentClient;
pub use error::StoreError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pagination::{paginate, Page, PageRequest};
pub use repository::{DocumentStoreTodoRepository, InMemoryTodoRepository, TodoRepository};
pub use service::{Clock, TodoService};
pub use transport::{Transport, UreqTransport};
pub use types::{NewTodo, TodoEntity, TodoPatch};
