//! HTTP middleware and extractors for the API.
//!
//! Authentication is extractor-based: handlers take [`RequireAuth`] or
//! [`RequireAdmin`] instead of a router-level layer, so public and
//! protected routes can share a router.

pub mod auth;

pub use auth::{RequireAdmin, RequireAuth};
