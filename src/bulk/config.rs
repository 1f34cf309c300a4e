use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use std::time::{Duration, UNIX_EPOCH};

use crate::output::OutputFormat;
use crate::render::Dialect;

// 2016-01-01T00:00:00Z
const DEFAULT_START_SECS: u64 = 1_451_606_400;

#[derive(Debug, Clone, Args)]
pub struct BulkConfig {
    /// Start of the benchmark interval (RFC3339)
    #[arg(long, default_value = "2016-01-01T00:00:00Z")]
    pub start: DateTime<Utc>,

    /// End of the benchmark interval, exclusive (RFC3339)
    #[arg(long, default_value = "2016-01-02T00:00:00Z")]
    pub end: DateTime<Utc>,

    /// Simulated fleet size
    #[arg(short, long, default_value = "100")]
    pub scale: usize,

    /// Number of queries to generate
    #[arg(short = 'n', long, default_value = "1000")]
    pub count: u64,

    /// Number of parallel workers
    #[arg(short, long, default_value = "1")]
    pub workers: usize,

    /// Seed for reproducible output; worker i uses seed + i
    #[arg(long)]
    pub seed: Option<u64>,

    /// Target query language
    #[arg(short, long, value_enum, default_value_t = Dialect::Ioql)]
    pub dialect: Dialect,

    /// Generate only this scenario instead of cycling through the catalog
    #[arg(long)]
    pub scenario: Option<String>,

    /// Output file; queries go to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Binary)]
    pub format: OutputFormat,

    /// Encoded bytes a worker buffers before handing them to the writer
    #[arg(long, default_value = "65536")]
    pub batch_bytes: usize,
}

impl Default for BulkConfig {
    fn default() -> Self {
        BulkConfig {
            start: DateTime::<Utc>::from(UNIX_EPOCH + Duration::from_secs(DEFAULT_START_SECS)),
            end: DateTime::<Utc>::from(
                UNIX_EPOCH + Duration::from_secs(DEFAULT_START_SECS + 86_400),
            ),
            scale: 100,
            count: 1000,
            workers: 1,
            seed: None,
            dialect: Dialect::Ioql,
            scenario: None,
            output: None,
            format: OutputFormat::Binary,
            batch_bytes: 65536,
        }
    }
}

impl BulkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        if self.scale == 0 {
            bail!("scale must be at least 1");
        }
        if self.batch_bytes == 0 {
            bail!("batch-bytes must be at least 1");
        }
        Ok(())
    }
}
