/// HTTP server for the String Analyzer daemon.
///
/// This module provides the [`Server`] which builds the axum routes and
/// dispatches requests to a [`StringRegistry`](crate::engine::StringRegistry).
pub mod router;

pub use router::Server;
