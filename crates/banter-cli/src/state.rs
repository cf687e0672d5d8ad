//! Application state shared by the CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};

use banter_core::chat::ChatRepository;
use banter_core::session::SessionStore;
use banter_infra::AppwriteClient;
use banter_infra::config::{data_dir, load_backend_config};
use banter_types::identity::Identity;

use crate::session_file;

/// One backend client instance shared by the session store and the chat
/// repository; no global singletons.
pub struct AppState {
    pub data_dir: PathBuf,
    pub client: Arc<AppwriteClient>,
    pub session: SessionStore<AppwriteClient>,
    pub chat: ChatRepository<AppwriteClient>,
}

impl AppState {
    /// Load configuration, build the client, and restore a persisted
    /// session token if one exists.
    pub async fn init() -> Result<Self> {
        let data_dir = data_dir();
        let config = load_backend_config(&data_dir).await;
        let client = Arc::new(AppwriteClient::new(config));

        if let Some(secret) = session_file::load(&data_dir).await? {
            client.set_session_secret(secret);
        }

        let session = SessionStore::new(client.clone());
        let chat = ChatRepository::new(client.clone());

        Ok(Self {
            data_dir,
            client,
            session,
            chat,
        })
    }

    /// Resolve the logged-in identity, checking the backend for a live
    /// session first. Fails with a login hint when there is none.
    pub async fn require_identity(&self) -> Result<Identity> {
        self.session.check_existing_session().await;
        match self.session.identity() {
            Some(identity) => Ok(identity),
            None => bail!("not logged in; run `banter login <email>` first"),
        }
    }
}
