//! Core library for the URQuest client
//!
//! This crate contains the client-side state model, including:
//! - Session persistence and local patches
//! - Authorization (organization role and capabilities)
//! - Typed projections of server-owned entities (quests, organizations,
//!   submissions, profiles)

pub mod authz;
pub mod error;
pub mod org;
pub mod profile;
pub mod quest;
pub mod session;
pub mod submission;

pub use authz::{Capabilities, OrganizationRole};
pub use error::Error;
pub use session::{Session, SessionPatch, SessionStore};
pub type Result<T> = std::result::Result<T, Error>;
