//! Deployment module

pub mod reconciler;
pub mod status;
