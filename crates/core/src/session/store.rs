//! Session store trait
//!
//! Defines the interface for persisting the session aggregate.

use async_trait::async_trait;

use super::model::Session;
use super::patch::SessionPatch;
use crate::Result;

/// Fixed key the session blob is stored under
pub const SESSION_KEY: &str = "urquest_session";

/// Durable cache of the authenticated session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the full session, replacing any prior value
    async fn save(&self, session: &Session) -> Result<()>;

    /// Last saved session, or `None` if never saved, cleared, or unreadable
    async fn load(&self) -> Option<Session>;

    /// Apply a patch and persist the result in one step
    ///
    /// Returns `None` without writing when there is no session.
    async fn patch(&self, patch: SessionPatch) -> Result<Option<Session>>;

    /// Remove the persisted session
    async fn clear(&self) -> Result<()>;
}
