//! Executes `HttpRequest` values against the network.
//!
//! `Transport` is the I/O seam under `DocumentStoreTodoRepository`: production
//! code uses `UreqTransport`, tests script responses with their own
//! implementation.

use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport: Send + Sync {
    /// Perform one blocking round-trip. Non-2xx statuses are returned as
    /// data; only connection-level failures are errors.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, StoreError>;
}

/// Blocking transport over a shared `ureq::Agent`.
///
/// The agent owns the connection pool. Build one per process and pass it to
/// the repository; clones share the same pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        // Status codes are interpreted by `DocumentClient`, not by ureq.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, StoreError> {
        let HttpRequest {
            method, path, body, ..
        } = request;
        let body = body.unwrap_or_default();

        let result = match method {
            HttpMethod::Get => self.agent.get(&path).call(),
            HttpMethod::Delete => self.agent.delete(&path).call(),
            HttpMethod::Post => self
                .agent
                .post(&path)
                .content_type("application/json")
                .send(body.as_bytes()),
            HttpMethod::Patch => self
                .agent
                .patch(&path)
                .content_type("application/json")
                .send(body.as_bytes()),
        };
        let mut response = result.map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        tracing::trace!(?method, %path, status, "document store round-trip");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
