//! Query files: framed binary carriers with a metadata trailer, or plain text

pub mod reader;
pub mod writer;

pub use reader::QueryReader;
pub use writer::QueryWriter;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::query::QueryCarrier;
use crate::render::Dialect;

/// End marker and metadata magic of binary query files
pub const QUERY_FILE_MAGIC: u32 = 0x5153_4731;
pub const QUERY_FILE_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Length-prefixed bincode frames followed by a metadata trailer
    #[default]
    Binary,
    /// Human readable: description comment, query text, blank line
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFileMetadata {
    pub magic: u32,
    pub version: u8,
    pub dialect: Dialect,
    pub total_queries: u64,
    /// Per-scenario counts in registry order
    pub scenario_counts: Vec<(String, u64)>,
}

impl QueryFileMetadata {
    pub fn new(dialect: Dialect) -> Self {
        QueryFileMetadata {
            magic: QUERY_FILE_MAGIC,
            version: QUERY_FILE_VERSION,
            dialect,
            total_queries: 0,
            scenario_counts: Vec::new(),
        }
    }
}

/// Append one carrier to `buf` in the given format.
pub fn encode_query(format: OutputFormat, carrier: &QueryCarrier, buf: &mut Vec<u8>) -> Result<()> {
    match format {
        OutputFormat::Binary => {
            let len = bincode::serialized_size(carrier)?;
            buf.extend_from_slice(&(len as u32).to_le_bytes());
            bincode::serialize_into(&mut *buf, carrier)?;
        }
        OutputFormat::Text => {
            writeln!(buf, "-- {}", carrier.human_description)?;
            buf.extend_from_slice(carrier.query.as_bytes());
            buf.extend_from_slice(b"\n\n");
        }
    }
    Ok(())
}
