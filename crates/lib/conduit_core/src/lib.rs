//! # conduit_core
//!
//! Core authentication domain logic for Conduit.

pub mod auth;
pub mod hello;
pub mod migrate;
pub mod models;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
