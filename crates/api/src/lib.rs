//! TubeWatch API service library
//!
//! Route handlers and application state for the HTTP read API.

pub mod routes;

pub use routes::{configure, AppState};
