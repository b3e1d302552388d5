//! Data models: the extracted vehicle record and pipeline configuration.

pub mod config;
pub mod vehicle;
