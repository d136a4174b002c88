//! Domain models shared across the Conduit crates.

pub mod auth;
