//! File-based session storage implementation
//!
//! Stores the session as a single JSON blob on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::model::Session;
use super::patch::SessionPatch;
use super::store::{SessionStore, SESSION_KEY};
use crate::{Error, Result};

/// File-based session store using JSON
pub struct FileSessionStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of the persisted session
    cache: RwLock<Option<Session>>,
}

impl FileSessionStore {
    /// Create a new FileSessionStore backed by `path`
    ///
    /// A missing or unreadable file starts the store empty.
    pub async fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = read_session(&path).await;
        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    /// Create a store under the fixed session key inside `data_dir`
    pub async fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(format!("{}.json", SESSION_KEY))).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the session to disk
    async fn persist(&self, session: &Session) -> Result<()> {
        let content = serde_json::to_string_pretty(session)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Replace the file in one rename so readers never see half a blob
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to replace session file: {}", e)))?;
        Ok(())
    }
}

async fn read_session(path: &Path) -> Option<Session> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), "Failed to read session file: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(path = %path.display(), "Discarding corrupt session file: {}", e);
            None
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, session: &Session) -> Result<()> {
        let mut cache = self.cache.write().await;
        self.persist(session).await?;
        *cache = Some(session.clone());
        debug!(user = %session.user.id, "Session saved");
        Ok(())
    }

    async fn load(&self) -> Option<Session> {
        self.cache.read().await.clone()
    }

    async fn patch(&self, patch: SessionPatch) -> Result<Option<Session>> {
        let mut cache = self.cache.write().await;
        let Some(current) = cache.as_ref() else {
            debug!(patch = patch.kind(), "No session to patch");
            return Ok(None);
        };

        let mut updated = current.clone();
        patch.apply(&mut updated);
        self.persist(&updated).await?;
        *cache = Some(updated.clone());
        debug!(patch = patch.kind(), "Session patched");
        Ok(Some(updated))
    }

    async fn clear(&self) -> Result<()> {
        let mut cache = self.cache.write().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *cache = None;
        debug!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemberOrg, OwnedOrg, UserIdentity};
    use tempfile::TempDir;

    async fn create_test_store() -> (FileSessionStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::in_dir(temp_dir.path()).await;
        (store, temp_dir)
    }

    fn sample_session() -> Session {
        Session::new(UserIdentity::new("ada", "Ada").with_can_create_task(true))
            .with_owned_org(OwnedOrg::new(5, "Rook").with_description("Chess club"))
            .with_member_org(MemberOrg::new(5, "Rook"))
    }

    #[tokio::test]
    async fn test_load_without_file_is_absent() {
        let (store, _temp) = create_test_store().await;
        assert!(store.load().await.is_none());
        assert!(store.path().ends_with("urquest_session.json"));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let (store, _temp) = create_test_store().await;
        let session = sample_session();

        store.save(&session).await.unwrap();
        assert_eq!(store.load().await, Some(session));
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let session = sample_session();

        {
            let store = FileSessionStore::in_dir(temp_dir.path()).await;
            store.save(&session).await.unwrap();
        }

        {
            let store = FileSessionStore::in_dir(temp_dir.path()).await;
            assert_eq!(store.load().await, Some(session));
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("urquest_session.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = FileSessionStore::new(&path).await;
        assert!(store.load().await.is_none());

        // A fresh save replaces the corrupt blob
        store.save(&sample_session()).await.unwrap();
        let reopened = FileSessionStore::new(&path).await;
        assert_eq!(reopened.load().await, Some(sample_session()));
    }

    #[tokio::test]
    async fn test_wrong_shape_loads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("urquest_session.json");
        tokio::fs::write(&path, r#"{"status":"success"}"#).await.unwrap();

        let store = FileSessionStore::new(&path).await;
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_patch_persists_full_session() {
        let temp_dir = TempDir::new().unwrap();
        let member = Session::new(UserIdentity::new("bo", "Bo").with_role("Scout", true))
            .with_member_org(MemberOrg::new(5, "Rook"));

        {
            let store = FileSessionStore::in_dir(temp_dir.path()).await;
            store.save(&member).await.unwrap();
            let patched = store.patch(SessionPatch::LeftOrg).await.unwrap().unwrap();
            assert!(patched.member_org.is_none());
        }

        let store = FileSessionStore::in_dir(temp_dir.path()).await;
        let reloaded = store.load().await.unwrap();
        assert!(reloaded.member_org.is_none());
        assert!(reloaded.user.role_name.is_none());
        assert!(!reloaded.user.can_create_task);
    }

    #[tokio::test]
    async fn test_patch_without_session_writes_nothing() {
        let (store, _temp) = create_test_store().await;

        let result = store.patch(SessionPatch::LeftOrg).await.unwrap();
        assert!(result.is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let (store, _temp) = create_test_store().await;
        store.save(&sample_session()).await.unwrap();
        assert!(store.path().exists());

        store.clear().await.unwrap();
        assert!(store.load().await.is_none());
        assert!(!store.path().exists());

        // Clearing twice is fine
        store.clear().await.unwrap();
    }
}
