//! Wire DTOs for the document store.
//!
//! # Design
//! These mirror the `docstore` crate's schema but are defined independently,
//! so the client does not depend on the server's internals. The integration
//! tests catch schema drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Fields = Map<String, Value>;

/// A stored document: store-assigned id plus a flat JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<Document>,
}

/// Body of a create (full field set) or a patch (fields to merge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteDocument {
    pub fields: Fields,
}
