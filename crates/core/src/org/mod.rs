//! Organization module
//!
//! Read-only projections of organizations, members and roles, plus the
//! inputs the owner sends to change them.

mod model;

pub use model::*;
