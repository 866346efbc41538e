//! Publish API models
//!
//! JSON bodies of the `/api/github/deploy-site/{siteId}` endpoint.

pub mod models;

pub use models::*;
