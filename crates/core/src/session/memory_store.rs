//! Process-local session store

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::Session;
use super::patch::SessionPatch;
use super::store::SessionStore;
use crate::Result;

/// Session store that lives only as long as the process
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a session already saved
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> Result<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn load(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn patch(&self, patch: SessionPatch) -> Result<Option<Session>> {
        let mut guard = self.session.write().await;
        Ok(guard.as_mut().map(|session| {
            patch.apply(session);
            session.clone()
        }))
    }

    async fn clear(&self) -> Result<()> {
        *self.session.write().await = None;
        Ok(())
    }
}
