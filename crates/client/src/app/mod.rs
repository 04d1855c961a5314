//! Application controller
//!
//! [`QuestApp`] turns user intents into capability checks, remote calls and
//! session patches. Operations are grouped by area in the submodules.

mod auth;
mod org;
mod player;
mod quests;
mod reviews;
mod roles;

use std::sync::Arc;
use tracing::{error, warn};

use urquest_core::authz::Capability;
use urquest_core::session::{FileSessionStore, OrgId};
use urquest_core::{Capabilities, Session, SessionPatch, SessionStore};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::notify::Notifier;
use crate::remote::RemoteService;

pub struct QuestApp {
    store: Arc<dyn SessionStore>,
    remote: RemoteService,
    notifier: Notifier,
}

impl QuestApp {
    pub fn new(store: Arc<dyn SessionStore>, remote: RemoteService, notifier: Notifier) -> Self {
        Self {
            store,
            remote,
            notifier,
        }
    }

    /// Build an app over the configured data directory and backend
    pub async fn from_config(config: &ClientConfig) -> Self {
        let store = FileSessionStore::in_dir(&config.data_dir).await;
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Self {
        let notifier = Notifier::new(config.notify_ttl);
        let remote = RemoteService::new(config, notifier.clone());
        Self::new(store, remote, notifier)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Current session snapshot
    pub async fn session(&self) -> Option<Session> {
        self.store.load().await
    }

    pub async fn capabilities(&self) -> Capabilities {
        Capabilities::derive(self.session().await.as_ref())
    }

    /// Report a local failure and hand it back
    fn reject(&self, error: ClientError) -> ClientError {
        self.notifier.error(error.to_string());
        error
    }

    fn check(&self, outcome: urquest_core::Result<()>) -> Result<()> {
        outcome.map_err(|e| self.reject(e.into()))
    }

    /// Surface a session storage failure like any other error
    fn stored<T>(&self, outcome: urquest_core::Result<T>) -> Result<T> {
        outcome.map_err(|e| {
            error!("Session storage failed: {}", e);
            self.reject(e.into())
        })
    }

    async fn authenticated(&self) -> Result<Session> {
        self.session()
            .await
            .ok_or_else(|| self.reject(ClientError::NotAuthenticated))
    }

    /// Session that grants `capability`
    async fn authorized(&self, capability: Capability) -> Result<Session> {
        let session = self.authenticated().await?;
        if !Capabilities::derive(Some(&session)).allows(capability) {
            return Err(self.reject(ClientError::NotPermitted(capability.denial().to_string())));
        }
        Ok(session)
    }

    /// Session that grants `capability`, plus the organization it acts in
    async fn org_scope(&self, capability: Option<Capability>) -> Result<(Session, OrgId)> {
        let session = match capability {
            Some(capability) => self.authorized(capability).await?,
            None => self.authenticated().await?,
        };
        match session.org_id() {
            Some(org_id) => Ok((session, org_id)),
            None => Err(self.reject(ClientError::NotPermitted(
                "JOIN AN ORGANIZATION FIRST".to_string(),
            ))),
        }
    }

    /// Record a confirmed server-side change in the local session
    async fn apply_patch(&self, patch: SessionPatch) -> Result<Session> {
        let kind = patch.kind();
        match self.stored(self.store.patch(patch).await)? {
            Some(session) => Ok(session),
            None => {
                warn!(patch = kind, "Session vanished before patch could be applied");
                Err(self.reject(ClientError::NotAuthenticated))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::notify::NoticeLevel;
    use crate::test_support::StubBackend;
    use reqwest::Method;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_capabilities_follow_session() {
        let backend = StubBackend::new().start().await;
        let harness = Harness::new(&backend.base_url, Some(owner())).await;

        let caps = harness.app.capabilities().await;
        assert!(caps.can_transfer_ownership);
        assert!(!caps.can_leave_org);

        let harness = Harness::new(&backend.base_url, None).await;
        assert_eq!(harness.app.capabilities().await, Capabilities::default());
    }

    #[tokio::test]
    async fn test_denied_capability_reports_once() {
        let backend = StubBackend::new().start().await;
        let mut harness = Harness::new(&backend.base_url, Some(member(false))).await;

        let error = harness
            .app
            .authorized(Capability::TransferOwnership)
            .await
            .unwrap_err();
        assert!(matches!(error, ClientError::NotPermitted(_)));

        let notices = harness.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "ONLY THE OWNER CAN TRANSFER OWNERSHIP");
    }

    #[tokio::test]
    async fn test_org_scope_requires_membership() {
        let backend = StubBackend::new().start().await;
        let harness = Harness::new(&backend.base_url, Some(player())).await;

        let error = harness.app.org_scope(None).await.unwrap_err();
        assert_eq!(error.to_string(), "JOIN AN ORGANIZATION FIRST");

        let harness = Harness::new(&backend.base_url, Some(member(false))).await;
        let (_, org_id) = harness.app.org_scope(None).await.unwrap();
        assert_eq!(org_id, 5);
    }

    #[tokio::test]
    async fn test_patch_write_failure_after_remote_success_is_reported() {
        let backend = StubBackend::new()
            .respond(Method::POST, "/org/leave", 200, json!({"status": "success"}))
            .start()
            .await;
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let store = FileSessionStore::in_dir(&data_dir).await;
        store.save(&member(false)).await.unwrap();

        // The data directory turns into a plain file, so the next write fails
        std::fs::remove_dir_all(&data_dir).unwrap();
        std::fs::write(&data_dir, "blocked").unwrap();

        let config = ClientConfig::default().with_api_base_url(&backend.base_url);
        let app = QuestApp::with_store(&config, Arc::new(store));
        let mut notices = app.notifier().subscribe();

        let error = app.leave_org().await.unwrap_err();
        assert!(matches!(error, ClientError::Session(_)));
        assert_eq!(backend.requests().len(), 1);

        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.starts_with("Session storage error"));
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_patch_without_session_is_not_authenticated() {
        let backend = StubBackend::new().start().await;
        let harness = Harness::new(&backend.base_url, None).await;

        let error = harness.app.apply_patch(SessionPatch::LeftOrg).await.unwrap_err();
        assert!(matches!(error, ClientError::NotAuthenticated));
    }
}
