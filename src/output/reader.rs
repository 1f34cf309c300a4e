use anyhow::{anyhow, Result};
use std::fs;

use super::{QueryFileMetadata, QUERY_FILE_MAGIC, QUERY_FILE_VERSION};
use crate::query::QueryCarrier;

/// Loads a binary query file written by [`super::QueryWriter`].
pub struct QueryReader {
    metadata: QueryFileMetadata,
    queries: Vec<QueryCarrier>,
}

impl QueryReader {
    pub fn open(path: &str) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(anyhow!("file too small"));
        }

        let end_marker_pos = data.len() - 4;
        let end_marker = read_u32(data, end_marker_pos);
        if end_marker != QUERY_FILE_MAGIC {
            return Err(anyhow!("invalid file format: missing end marker"));
        }

        let metadata_len_pos = end_marker_pos - 4;
        let metadata_len = read_u32(data, metadata_len_pos) as usize;
        if metadata_len_pos < metadata_len {
            return Err(anyhow!("metadata length exceeds file size"));
        }

        let metadata_start = metadata_len_pos - metadata_len;
        let metadata: QueryFileMetadata =
            bincode::deserialize(&data[metadata_start..metadata_len_pos])?;
        if metadata.version != QUERY_FILE_VERSION {
            return Err(anyhow!("unsupported query file version {}", metadata.version));
        }

        // every frame carries at least its 4 byte length prefix
        let capacity = (metadata.total_queries as usize).min(metadata_start / 4);
        let mut queries = Vec::with_capacity(capacity);
        let mut offset = 0;
        while offset < metadata_start {
            if offset + 4 > metadata_start {
                return Err(anyhow!("truncated frame header at offset {}", offset));
            }
            let len = read_u32(data, offset) as usize;
            offset += 4;

            if offset + len > metadata_start {
                return Err(anyhow!("truncated frame at offset {}", offset));
            }
            queries.push(bincode::deserialize(&data[offset..offset + len])?);
            offset += len;
        }

        if queries.len() as u64 != metadata.total_queries {
            return Err(anyhow!(
                "metadata announces {} queries, found {}",
                metadata.total_queries,
                queries.len()
            ));
        }

        Ok(QueryReader { metadata, queries })
    }

    pub fn metadata(&self) -> &QueryFileMetadata {
        &self.metadata
    }

    pub fn queries(&self) -> &[QueryCarrier] {
        &self.queries
    }
}

fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}
