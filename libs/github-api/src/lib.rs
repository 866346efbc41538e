//! GitHub REST API models
//!
//! Only the fields sitepub reads or writes are modelled; everything else in
//! the GitHub payloads is ignored on deserialization.

pub mod models;

pub use models::*;
