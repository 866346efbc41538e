//! sitepub library
//!
//! Publishes generated site pages into a GitHub repository and reports their
//! GitHub Pages deployment status.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod repo;
pub mod server;
pub mod sites;
pub mod storage;
pub mod utils;
pub mod workers;
