//! Session token persistence.
//!
//! The hosted backend tracks sessions server-side; the client keeps only
//! the session token. The original platform SDK stored it in a cookie jar;
//! here it lives in `{data_dir}/session`, owner-readable only.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

const SESSION_FILE: &str = "session";

/// Load the persisted session token, if any. An empty file counts as none.
pub async fn load(data_dir: &Path) -> Result<Option<SecretString>> {
    let path = data_dir.join(SESSION_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            let token = content.trim();
            if token.is_empty() {
                Ok(None)
            } else {
                Ok(Some(SecretString::from(token.to_string())))
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Persist the session token for the next run.
pub async fn store(data_dir: &Path, secret: &SecretString) -> Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let path = data_dir.join(SESSION_FILE);
    tokio::fs::write(&path, secret.expose_secret())
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&path, perms)
            .await
            .with_context(|| format!("failed to restrict {}", path.display()))?;
    }

    Ok(())
}

/// Remove the persisted session token. Missing file is fine.
pub async fn clear(data_dir: &Path) -> Result<()> {
    let path = data_dir.join(SESSION_FILE);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn round_trip() {
        let tmp = TempDir::new().unwrap();
        assert!(load(tmp.path()).await.unwrap().is_none());

        store(tmp.path(), &SecretString::from("tok")).await.unwrap();
        let loaded = load(tmp.path()).await.unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "tok");

        clear(tmp.path()).await.unwrap();
        assert!(load(tmp.path()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        clear(tmp.path()).await.unwrap();
    }

    #[tokio::test]
    async fn empty_file_counts_as_no_session() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(SESSION_FILE), "\n")
            .await
            .unwrap();
        assert!(load(tmp.path()).await.unwrap().is_none());
    }
}
