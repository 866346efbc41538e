//! GitHub REST client

pub mod client;
pub mod commits;
pub mod contents;
pub mod deployments;
pub mod repository;
