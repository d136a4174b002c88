//! Greeting served from the index page.

/// Returns a greeting string with the crate version.
pub fn hello_world() -> String {
    format!("Hello, CodeOne! (conduit_core v{})", super::version())
}
