//! Authorization module
//!
//! Pure derivation of what the current user may do from a session snapshot.

mod capabilities;

pub use capabilities::{Capabilities, Capability, OrganizationRole};
