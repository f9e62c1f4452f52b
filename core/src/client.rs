//! Stateless HTTP request builder and response parser for the document store.
//!
//! # Design
//! `DocumentClient` holds only the store's base URL and database name and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. A `Transport` performs the round-trip in
//! between, keeping this module deterministic and free of I/O.

use crate::document::{Document, DocumentList, Fields, WriteDocument};
use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Clone)]
pub struct DocumentClient {
    base_url: String,
    database: String,
}

impl DocumentClient {
    pub fn new(base_url: &str, database: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            database: database.to_string(),
        }
    }

    fn documents_path(&self, collection: &str) -> String {
        format!(
            "{}/v1/databases/{}/collections/{}/documents",
            self.base_url,
            urlencoding::encode(&self.database),
            urlencoding::encode(collection),
        )
    }

    fn document_path(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.documents_path(collection),
            urlencoding::encode(id)
        )
    }

    /// Full-collection scan, sorted by `order_by` when given.
    pub fn build_list_documents(&self, collection: &str, order_by: Option<&str>) -> HttpRequest {
        let mut path = self.documents_path(collection);
        if let Some(field) = order_by {
            path.push_str("?order_by=");
            path.push_str(&urlencoding::encode(field));
        }
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_document(&self, collection: &str, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.document_path(collection, id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_document(
        &self,
        collection: &str,
        fields: &Fields,
    ) -> Result<HttpRequest, StoreError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.documents_path(collection),
            headers: json_headers(),
            body: Some(write_body(fields)?),
        })
    }

    /// Merge `fields` into an existing document. The store answers 404
    /// instead of creating it.
    pub fn build_update_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Fields,
    ) -> Result<HttpRequest, StoreError> {
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: self.document_path(collection, id),
            headers: json_headers(),
            body: Some(write_body(fields)?),
        })
    }

    pub fn build_delete_document(&self, collection: &str, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.document_path(collection, id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_documents(&self, response: HttpResponse) -> Result<Vec<Document>, StoreError> {
        check_status(&response, 200)?;
        let list: DocumentList = decode(&response.body)?;
        Ok(list.documents)
    }

    pub fn parse_get_document(&self, response: HttpResponse) -> Result<Document, StoreError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_create_document(&self, response: HttpResponse) -> Result<Document, StoreError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    pub fn parse_update_document(&self, response: HttpResponse) -> Result<Document, StoreError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_delete_document(&self, response: HttpResponse) -> Result<(), StoreError> {
        check_status(&response, 204)?;
        Ok(())
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn write_body(fields: &Fields) -> Result<String, StoreError> {
    let body = WriteDocument {
        fields: fields.clone(),
    };
    serde_json::to_string(&body).map_err(|e| StoreError::SerializationError(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `StoreError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), StoreError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(StoreError::NotFound);
    }
    Err(StoreError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> DocumentClient {
        DocumentClient::new("http://localhost:8081", "default")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn build_list_documents_produces_correct_request() {
        let req = client().build_list_documents("todos", None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:8081/v1/databases/default/collections/todos/documents"
        );
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_documents_with_order_adds_query() {
        let req = client().build_list_documents("todos", Some("created_at"));
        assert_eq!(
            req.path,
            "http://localhost:8081/v1/databases/default/collections/todos/documents?order_by=created_at"
        );
    }

    #[test]
    fn build_get_document_encodes_id() {
        let req = client().build_get_document("todos", "a/b c");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:8081/v1/databases/default/collections/todos/documents/a%2Fb%20c"
        );
    }

    #[test]
    fn build_create_document_produces_correct_request() {
        let req = client()
            .build_create_document("todos", &fields(json!({"title": "Buy milk"})))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"fields": {"title": "Buy milk"}}));
    }

    #[test]
    fn build_update_document_uses_patch() {
        let req = client()
            .build_update_document("todos", "abc", &fields(json!({"completed": true})))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert!(req.path.ends_with("/documents/abc"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["fields"]["completed"], true);
        assert!(body["fields"].get("title").is_none());
    }

    #[test]
    fn build_delete_document_produces_correct_request() {
        let req = client().build_delete_document("todos", "abc");
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = DocumentClient::new("http://localhost:8081/", "default");
        let req = client.build_list_documents("todos", None);
        assert_eq!(
            req.path,
            "http://localhost:8081/v1/databases/default/collections/todos/documents"
        );
    }

    #[test]
    fn parse_list_documents_success() {
        let docs = client()
            .parse_list_documents(response(
                200,
                r#"{"documents":[{"id":"a","fields":{"title":"Test"}}]}"#,
            ))
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["title"], "Test");
    }

    #[test]
    fn parse_list_documents_bad_json() {
        let err = client()
            .parse_list_documents(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DeserializationError(_)));
    }

    #[test]
    fn parse_get_document_not_found() {
        let err = client().parse_get_document(response(404, "")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn parse_create_document_wrong_status() {
        let err = client()
            .parse_create_document(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, StoreError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_update_document_success() {
        let doc = client()
            .parse_update_document(response(200, r#"{"id":"a","fields":{"completed":true}}"#))
            .unwrap();
        assert_eq!(doc.id, "a");
        assert_eq!(doc.fields["completed"], true);
    }

    #[test]
    fn parse_delete_document_statuses() {
        assert!(client().parse_delete_document(response(204, "")).is_ok());
        let err = client().parse_delete_document(response(404, "")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
