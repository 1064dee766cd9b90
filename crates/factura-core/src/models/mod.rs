//! Data models: canonical invoice and pipeline configuration.

pub mod config;
pub mod invoice;
