//! URQuest client
//!
//! Talks to the URQuest backend on behalf of one user: HTTP calls with a
//! normalized error contract, transient notices, and the [`QuestApp`]
//! controller that keeps the cached session in step with the server.

pub mod app;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod notify;
pub mod remote;
pub mod wire;

#[cfg(test)]
mod test_support;

pub use app::QuestApp;
pub use config::ClientConfig;
pub use error::{ApiError, ClientError, Result};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use remote::RemoteService;
