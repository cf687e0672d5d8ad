//! Backend configuration shape.
//!
//! Deserialized from `config.toml` in the data directory by banter-infra.
//! The endpoint and the project/database/collection identifiers are static
//! deployment facts, not business logic.

use serde::{Deserialize, Serialize};

/// Connection settings for the hosted document backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend REST API.
    pub endpoint: String,
    /// Project identifier sent with every request.
    pub project_id: String,
    /// Database holding the two chat collections.
    pub database_id: String,
    /// Collection of conversation documents.
    pub conversation_collection_id: String,
    /// Collection of message documents.
    pub message_collection_id: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            database_id: String::new(),
            conversation_collection_id: String::new(),
            message_collection_id: String::new(),
        }
    }
}
