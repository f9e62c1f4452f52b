//! Error types for document-store access.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the repository turns a missing
//! document into `None` or `false` rather than a failure. Every other variant
//! means the store could not be used and surfaces as a server error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered 404 for the requested document.
    #[error("document not found")]
    NotFound,

    /// The store could not be reached or the connection failed mid-request.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The store returned a status other than the expected one or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A response or stored document could not be decoded.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A request payload could not be encoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
