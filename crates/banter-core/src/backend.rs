//! Backend API traits and the wire-adjacent value types they exchange.
//!
//! The hosted service is a document-oriented REST backend with an account
//! subsystem. These traits are the only seam between core logic and the
//! network; implementations live in banter-infra. Uses native async fn in
//! traits (RPITIT, Rust 2024 edition).

use std::fmt;
use std::future::Future;

use secrecy::SecretString;
use serde_json::{Map, Value};

use banter_types::error::BackendError;
use banter_types::identity::Identity;

/// Sentinel session identifier understood by the backend as "the session
/// attached to this client". A protocol constant, not business logic.
pub const CURRENT_SESSION: &str = "current";

/// A server-tracked login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session id; the backend may return an empty id for a dead session.
    pub id: String,
}

/// A schema-flexible document returned by the document store.
///
/// Typed parsing into [`banter_types::chat`] entities happens in the chat
/// repository, so malformed records surface as data-shape errors there
/// rather than as deserialization failures at the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Server-assigned document id.
    pub id: String,
    /// Server-side creation timestamp as an ISO-8601 string, when present.
    pub created_at: Option<String>,
    /// The document's attributes.
    pub data: Map<String, Value>,
}

impl Document {
    /// Read a string attribute, `None` if absent or not a string.
    pub fn string(&self, attribute: &str) -> Option<&str> {
        self.data.get(attribute).and_then(Value::as_str)
    }

    /// Read a string-array attribute, `None` if absent or ill-formed.
    pub fn string_array(&self, attribute: &str) -> Option<Vec<String>> {
        self.data
            .get(attribute)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

/// The two chat collections. Infra maps each to its configured collection id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentCollection {
    Conversations,
    Messages,
}

/// Query directives for document listing, mirroring the backend's query
/// language. Encoding to the wire format is an infra concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentQuery {
    /// Array attribute contains the given value.
    Contains { attribute: String, value: String },
    /// Scalar attribute equals the given value.
    Equal { attribute: String, value: String },
    /// Order results descending by the given attribute.
    OrderDesc { attribute: String },
}

/// A read or write capability scoped to one member, attached to created
/// documents. Renders in the backend's grant syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    Read(String),
    Write(String),
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Read(member) => write!(f, "read(\"user:{member}\")"),
            Permission::Write(member) => write!(f, "write(\"user:{member}\")"),
        }
    }
}

/// One read + one write grant per member, in member order.
pub fn member_grants(members: &[String]) -> Vec<Permission> {
    let mut grants = Vec::with_capacity(members.len() * 2);
    for member in members {
        grants.push(Permission::Read(member.clone()));
        grants.push(Permission::Write(member.clone()));
    }
    grants
}

/// Account and session operations against the backend's identity service.
pub trait AccountApi: Send + Sync {
    /// Look up a session by id (typically [`CURRENT_SESSION`]).
    fn get_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<SessionRecord, BackendError>> + Send;

    /// Create a new account. Returns the identity of the created account.
    fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<Identity, BackendError>> + Send;

    /// Create an email/password session for an existing account.
    fn create_email_session(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<SessionRecord, BackendError>> + Send;

    /// Delete a session by id (typically [`CURRENT_SESSION`]).
    fn delete_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Fetch the identity behind the current session.
    fn get_account(&self) -> impl Future<Output = Result<Identity, BackendError>> + Send;
}

/// Document CRUD against the backend's document store.
pub trait DocumentsApi: Send + Sync {
    /// List documents in a collection, filtered and ordered by `queries`.
    fn list_documents(
        &self,
        collection: DocumentCollection,
        queries: &[DocumentQuery],
    ) -> impl Future<Output = Result<Vec<Document>, BackendError>> + Send;

    /// Create a document with the given attributes and permission grants.
    fn create_document(
        &self,
        collection: DocumentCollection,
        data: Map<String, Value>,
        permissions: &[Permission],
    ) -> impl Future<Output = Result<Document, BackendError>> + Send;

    /// Fetch a single document by id.
    fn get_document(
        &self,
        collection: DocumentCollection,
        document_id: &str,
    ) -> impl Future<Output = Result<Document, BackendError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn permission_renders_grant_syntax() {
        assert_eq!(
            Permission::Read("alice@x.com".to_string()).to_string(),
            "read(\"user:alice@x.com\")"
        );
        assert_eq!(
            Permission::Write("alice@x.com".to_string()).to_string(),
            "write(\"user:alice@x.com\")"
        );
    }

    #[test]
    fn member_grants_yields_read_write_pair_per_member() {
        let members = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let grants = member_grants(&members);
        assert_eq!(
            grants,
            vec![
                Permission::Read("a@x.com".to_string()),
                Permission::Write("a@x.com".to_string()),
                Permission::Read("b@x.com".to_string()),
                Permission::Write("b@x.com".to_string()),
            ]
        );
    }

    #[test]
    fn document_string_array_rejects_mixed_types() {
        let mut data = Map::new();
        data.insert("members".to_string(), json!(["a@x.com", 42]));
        let doc = Document {
            id: "c1".to_string(),
            created_at: None,
            data,
        };
        assert!(doc.string_array("members").is_none());
    }

    #[test]
    fn document_string_returns_none_for_non_string() {
        let mut data = Map::new();
        data.insert("text".to_string(), json!(7));
        let doc = Document {
            id: "m1".to_string(),
            created_at: None,
            data,
        };
        assert!(doc.string("text").is_none());
        assert!(doc.string("missing").is_none());
    }
}
