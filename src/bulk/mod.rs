//! Bulk generation: fan a run of ordinals out over parallel workers

pub mod config;
pub mod main;

pub use config::BulkConfig;
pub use main::{ordinal_range, run, RunSummary};
