use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    session_token: String,
}

/// One key-value entry holding the current session token, persisted as a
/// small JSON file. Absent file means no session.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A corrupt file is treated as no session rather than an error, so a
    /// bad cache never locks the user out.
    pub async fn load(&self) -> anyhow::Result<Option<String>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("read session file"),
        };
        match serde_json::from_slice::<StoredSession>(&bytes) {
            Ok(stored) => Ok(Some(stored.session_token)),
            Err(e) => {
                warn!(error = %e, "session file unreadable, ignoring");
                Ok(None)
            }
        }
    }

    pub async fn save(&self, token: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create session dir")?;
        }
        let bytes = serde_json::to_vec(&StoredSession {
            session_token: token.to_string(),
        })
        .context("serialize session file")?;
        tokio::fs::write(&self.path, bytes)
            .await
            .context("write session file")?;
        Ok(())
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("remove session file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> TokenStore {
        TokenStore::new(std::env::temp_dir().join(format!("fitstart-test-{}.json", Uuid::new_v4())))
    }

    #[tokio::test]
    async fn save_load_clear_roundtrip() {
        let store = temp_store();
        assert_eq!(store.load().await.unwrap(), None);

        store.save("tok-123").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("tok-123"));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = temp_store();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_no_session() {
        let path = std::env::temp_dir().join(format!("fitstart-test-{}.json", Uuid::new_v4()));
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = TokenStore::new(&path);
        assert_eq!(store.load().await.unwrap(), None);

        store.clear().await.unwrap();
    }
}
