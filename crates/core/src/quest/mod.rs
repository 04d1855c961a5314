//! Quest module
//!
//! This module contains quest (task) types as seen by the client.

mod model;

pub use model::*;
