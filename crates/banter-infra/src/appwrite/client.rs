//! AppwriteClient -- concrete backend client for the hosted document
//! service's REST API.
//!
//! Authenticates requests with the project id header plus, once a session
//! exists, the session token header. The session token is wrapped in
//! [`secrecy::SecretString`] and is never logged or included in `Debug`
//! output.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use banter_core::backend::{
    AccountApi, Document, DocumentCollection, DocumentQuery, DocumentsApi, Permission,
    SessionRecord,
};
use banter_types::config::BackendConfig;
use banter_types::error::BackendError;
use banter_types::identity::Identity;

use super::types::{
    AccountResponse, CreateAccountRequest, CreateDocumentRequest, CreateSessionRequest,
    DocumentListResponse, DocumentResponse, ErrorResponse, SessionResponse, encode_query,
};

/// Placeholder id telling the server to assign a unique one.
const ID_UNIQUE: &str = "unique()";

/// HTTP client for the hosted backend.
///
/// Holds the session token behind a lock so the same instance can serve
/// the session store and the chat repository concurrently.
pub struct AppwriteClient {
    http: reqwest::Client,
    config: BackendConfig,
    session: RwLock<Option<SecretString>>,
}

// No Debug derive: the session token must never end up in logs.

impl AppwriteClient {
    /// Create a client for the given backend deployment.
    pub fn new(config: BackendConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            http,
            config,
            session: RwLock::new(None),
        }
    }

    /// Install a session token, e.g. one persisted from a previous run.
    pub fn set_session_secret(&self, secret: SecretString) {
        *self.session.write().expect("session lock poisoned") = Some(secret);
    }

    /// The current session token, if any. The CLI persists this across runs.
    pub fn session_secret(&self) -> Option<SecretString> {
        self.session.read().expect("session lock poisoned").clone()
    }

    fn clear_session_secret(&self) {
        *self.session.write().expect("session lock poisoned") = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    fn documents_path(&self, collection: DocumentCollection) -> String {
        let collection_id = match collection {
            DocumentCollection::Conversations => &self.config.conversation_collection_id,
            DocumentCollection::Messages => &self.config.message_collection_id,
        };
        format!(
            "/databases/{}/collections/{}/documents",
            self.config.database_id, collection_id
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, self.url(path))
            .header("x-appwrite-project", &self.config.project_id)
            .header("content-type", "application/json");
        if let Some(secret) = self.session.read().expect("session lock poisoned").as_ref() {
            request = request.header("x-appwrite-session", secret.expose_secret());
        }
        request
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(match status {
            StatusCode::UNAUTHORIZED => BackendError::Unauthorized,
            StatusCode::NOT_FOUND => BackendError::NotFound,
            _ => BackendError::Service {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Deserialization(e.to_string()))
    }
}

impl AccountApi for AppwriteClient {
    async fn get_session(&self, session_id: &str) -> Result<SessionRecord, BackendError> {
        let response: SessionResponse = self
            .send_json(self.request(Method::GET, &format!("/account/sessions/{session_id}")))
            .await?;
        Ok(SessionRecord { id: response.id })
    }

    async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, BackendError> {
        let body = CreateAccountRequest {
            user_id: ID_UNIQUE,
            email,
            password: password.expose_secret(),
            name,
        };
        let response: AccountResponse = self
            .send_json(self.request(Method::POST, "/account").json(&body))
            .await?;
        debug!(account_id = %response.id, "account created");
        Ok(Identity::new(response.id, response.name, response.email))
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionRecord, BackendError> {
        let body = CreateSessionRequest {
            email,
            password: password.expose_secret(),
        };
        let response: SessionResponse = self
            .send_json(self.request(Method::POST, "/account/sessions/email").json(&body))
            .await?;

        // Keep the token so subsequent requests ride this session.
        if !response.secret.is_empty() {
            self.set_session_secret(SecretString::from(response.secret));
        }
        debug!(session_id = %response.id, "session created");
        Ok(SessionRecord { id: response.id })
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), BackendError> {
        self.send(self.request(Method::DELETE, &format!("/account/sessions/{session_id}")))
            .await?;
        self.clear_session_secret();
        debug!("session deleted");
        Ok(())
    }

    async fn get_account(&self) -> Result<Identity, BackendError> {
        let response: AccountResponse =
            self.send_json(self.request(Method::GET, "/account")).await?;
        Ok(Identity::new(response.id, response.name, response.email))
    }
}

impl DocumentsApi for AppwriteClient {
    async fn list_documents(
        &self,
        collection: DocumentCollection,
        queries: &[DocumentQuery],
    ) -> Result<Vec<Document>, BackendError> {
        let mut request = self.request(Method::GET, &self.documents_path(collection));
        for query in queries {
            request = request.query(&[("queries[]", encode_query(query))]);
        }

        let response: DocumentListResponse = self.send_json(request).await?;
        debug!(total = response.total, ?collection, "documents listed");
        Ok(response.documents.into_iter().map(Document::from).collect())
    }

    async fn create_document(
        &self,
        collection: DocumentCollection,
        data: serde_json::Map<String, serde_json::Value>,
        permissions: &[Permission],
    ) -> Result<Document, BackendError> {
        let body = CreateDocumentRequest {
            document_id: ID_UNIQUE,
            data: &data,
            permissions: permissions.iter().map(Permission::to_string).collect(),
        };
        let response: DocumentResponse = self
            .send_json(
                self.request(Method::POST, &self.documents_path(collection))
                    .json(&body),
            )
            .await?;
        Ok(response.into())
    }

    async fn get_document(
        &self,
        collection: DocumentCollection,
        document_id: &str,
    ) -> Result<Document, BackendError> {
        let path = format!("{}/{document_id}", self.documents_path(collection));
        let response: DocumentResponse = self.send_json(self.request(Method::GET, &path)).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AppwriteClient {
        AppwriteClient::new(BackendConfig {
            endpoint: "https://backend.test/v1".to_string(),
            project_id: "proj".to_string(),
            database_id: "db".to_string(),
            conversation_collection_id: "convs".to_string(),
            message_collection_id: "msgs".to_string(),
        })
    }

    #[test]
    fn documents_path_selects_the_configured_collection() {
        let client = client();
        assert_eq!(
            client.documents_path(DocumentCollection::Conversations),
            "/databases/db/collections/convs/documents"
        );
        assert_eq!(
            client.documents_path(DocumentCollection::Messages),
            "/databases/db/collections/msgs/documents"
        );
    }

    #[test]
    fn session_secret_round_trip() {
        let client = client();
        assert!(client.session_secret().is_none());

        client.set_session_secret(SecretString::from("tok"));
        assert_eq!(
            client.session_secret().unwrap().expose_secret(),
            "tok"
        );

        client.clear_session_secret();
        assert!(client.session_secret().is_none());
    }

    #[test]
    fn url_joins_endpoint_and_path() {
        let client = client();
        assert_eq!(client.url("/account"), "https://backend.test/v1/account");
    }
}
