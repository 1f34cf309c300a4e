use anyhow::Result;
use std::fs::File;
use std::io::{BufWriter, Write};

use super::{encode_query, OutputFormat, QueryFileMetadata, QUERY_FILE_MAGIC};
use crate::query::QueryCarrier;
use crate::render::Dialect;

pub struct QueryWriter {
    out: BufWriter<Box<dyn Write + Send>>,
    format: OutputFormat,
    metadata: QueryFileMetadata,
    scenario_counts: Vec<u64>,
    scratch: Vec<u8>,
}

impl QueryWriter {
    pub fn create(path: &str, format: OutputFormat, dialect: Dialect) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(Box::new(file), format, dialect))
    }

    pub fn stdout(format: OutputFormat, dialect: Dialect) -> Self {
        Self::from_writer(Box::new(std::io::stdout()), format, dialect)
    }

    pub fn from_writer(out: Box<dyn Write + Send>, format: OutputFormat, dialect: Dialect) -> Self {
        QueryWriter {
            out: BufWriter::new(out),
            format,
            metadata: QueryFileMetadata::new(dialect),
            scenario_counts: Vec::new(),
            scratch: Vec::new(),
        }
    }

    pub fn queries_written(&self) -> u64 {
        self.metadata.total_queries
    }

    pub fn write_query(&mut self, carrier: &QueryCarrier) -> Result<()> {
        self.scratch.clear();
        encode_query(self.format, carrier, &mut self.scratch)?;
        self.out.write_all(&self.scratch)?;

        self.metadata.total_queries += 1;
        let index = carrier.scenario as usize;
        if self.scenario_counts.len() <= index {
            self.scenario_counts.resize(index + 1, 0);
        }
        self.scenario_counts[index] += 1;

        Ok(())
    }

    /// Write a buffer of already encoded queries.
    ///
    /// `counts[i]` is the number of queries of scenario `i` inside `encoded`.
    pub fn write_batch(&mut self, encoded: &[u8], counts: &[u64]) -> Result<()> {
        self.out.write_all(encoded)?;

        if self.scenario_counts.len() < counts.len() {
            self.scenario_counts.resize(counts.len(), 0);
        }
        for (total, count) in self.scenario_counts.iter_mut().zip(counts) {
            *total += count;
        }
        self.metadata.total_queries += counts.iter().sum::<u64>();

        Ok(())
    }

    /// Flush all queries and, for binary output, append the metadata trailer.
    ///
    /// `scenario_names` labels the per-scenario counts, in registry order.
    pub fn finish(mut self, scenario_names: &[&str]) -> Result<QueryFileMetadata> {
        self.scenario_counts.resize(scenario_names.len().max(self.scenario_counts.len()), 0);
        self.metadata.scenario_counts = self
            .scenario_counts
            .iter()
            .enumerate()
            .map(|(i, count)| {
                let name = scenario_names.get(i).copied().unwrap_or("unknown");
                (name.to_string(), *count)
            })
            .collect();

        if self.format == OutputFormat::Binary {
            // Trailer layout: [metadata][metadata_len: u32][end marker: u32]
            let encoded = bincode::serialize(&self.metadata)?;
            self.out.write_all(&encoded)?;
            self.out.write_all(&(encoded.len() as u32).to_le_bytes())?;
            self.out.write_all(&QUERY_FILE_MAGIC.to_le_bytes())?;
        }

        self.out.flush()?;
        Ok(self.metadata)
    }

    /// Flush what was written and stop without a trailer, leaving binary output unreadable.
    pub fn abandon(mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
