//! Site registry module

pub mod registry;
