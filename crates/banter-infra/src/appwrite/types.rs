//! Wire types for the hosted backend's REST API.
//!
//! These are backend-specific request/response structures used for HTTP
//! communication only. They are NOT the domain types from banter-types;
//! the core parses documents into those behind the trait boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use banter_core::backend::{Document, DocumentQuery};

/// Body for `POST /account`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest<'a> {
    /// `"unique()"` asks the server to assign the account id.
    pub user_id: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// Body for `POST /account/sessions/email`.
#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// A session object as returned by the account endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    #[serde(rename = "$id")]
    pub id: String,
    /// Session token for subsequent requests. Present on session creation;
    /// empty or absent elsewhere.
    #[serde(default)]
    pub secret: String,
}

/// An account object as returned by `GET /account` and `POST /account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Body for `POST .../documents`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest<'a> {
    /// `"unique()"` asks the server to assign the document id.
    pub document_id: &'a str,
    pub data: &'a Map<String, Value>,
    pub permissions: Vec<String>,
}

/// A document as returned by the document endpoints. System attributes are
/// prefixed with `$`; everything else lands in `data` via flatten.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentResponse {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl From<DocumentResponse> for Document {
    fn from(response: DocumentResponse) -> Self {
        Document {
            id: response.id,
            created_at: response.created_at,
            data: response.data,
        }
    }
}

/// Response for `GET .../documents`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentListResponse {
    pub total: u64,
    pub documents: Vec<DocumentResponse>,
}

/// Error body the backend returns on failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Encode a query directive in the backend's JSON query syntax, one per
/// `queries[]` request parameter.
pub fn encode_query(query: &DocumentQuery) -> String {
    let value = match query {
        DocumentQuery::Contains { attribute, value } => json!({
            "method": "contains",
            "attribute": attribute,
            "values": [value],
        }),
        DocumentQuery::Equal { attribute, value } => json!({
            "method": "equal",
            "attribute": attribute,
            "values": [value],
        }),
        DocumentQuery::OrderDesc { attribute } => json!({
            "method": "orderDesc",
            "attribute": attribute,
        }),
    };
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_contains_query() {
        let encoded = encode_query(&DocumentQuery::Contains {
            attribute: "members".to_string(),
            value: "a@x.com".to_string(),
        });
        let parsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed["method"], "contains");
        assert_eq!(parsed["attribute"], "members");
        assert_eq!(parsed["values"], json!(["a@x.com"]));
    }

    #[test]
    fn encode_order_desc_query() {
        let encoded = encode_query(&DocumentQuery::OrderDesc {
            attribute: "$createdAt".to_string(),
        });
        let parsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed["method"], "orderDesc");
        assert_eq!(parsed["attribute"], "$createdAt");
        assert!(parsed.get("values").is_none());
    }

    #[test]
    fn document_response_splits_system_and_user_attributes() {
        let raw = r#"{
            "$id": "c1",
            "$createdAt": "2025-01-14T10:00:00.000+00:00",
            "$updatedAt": "2025-01-14T10:00:00.000+00:00",
            "members": ["a@x.com", "b@x.com"],
            "lastMessage": ""
        }"#;
        let response: DocumentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.id, "c1");
        assert_eq!(
            response.created_at.as_deref(),
            Some("2025-01-14T10:00:00.000+00:00")
        );
        let document = Document::from(response);
        assert_eq!(
            document.string_array("members").unwrap(),
            vec!["a@x.com".to_string(), "b@x.com".to_string()]
        );
        assert_eq!(document.string("lastMessage"), Some(""));
    }

    #[test]
    fn document_list_response_deserializes() {
        let raw = r#"{
            "total": 1,
            "documents": [{"$id": "m1", "$createdAt": "2025-01-14T10:00:00.000+00:00", "text": "hi"}]
        }"#;
        let response: DocumentListResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.documents[0].id, "m1");
    }

    #[test]
    fn session_response_defaults_missing_secret_to_empty() {
        let raw = r#"{"$id": "sess_1"}"#;
        let response: SessionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.id, "sess_1");
        assert!(response.secret.is_empty());
    }

    #[test]
    fn create_document_request_serializes_camel_case() {
        let data = Map::new();
        let request = CreateDocumentRequest {
            document_id: "unique()",
            data: &data,
            permissions: vec!["read(\"user:a@x.com\")".to_string()],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["documentId"], "unique()");
        assert!(value["permissions"].is_array());
    }
}
