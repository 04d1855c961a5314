//! Session module
//!
//! The cached identity and organization snapshot, the patches that edit it,
//! and the stores that persist it.

mod file_store;
mod memory_store;
mod model;
mod patch;
mod store;

pub use file_store::FileSessionStore;
pub use memory_store::MemorySessionStore;
pub use model::*;
pub use patch::SessionPatch;
pub use store::{SessionStore, SESSION_KEY};
