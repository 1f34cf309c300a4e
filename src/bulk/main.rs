//! Generate command: parallel workers feeding a single writer

use anyhow::{anyhow, Context, Result};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use super::BulkConfig;
use crate::generator::{DevopsGenerator, QueryWorker};
use crate::output::{encode_query, OutputFormat, QueryFileMetadata, QueryWriter};

const PROGRESS_EVERY: u64 = 100_000;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: u64,
    /// Per-scenario counts in registry order
    pub scenario_counts: Vec<(String, u64)>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total as f64 / secs
        } else {
            0.0
        }
    }
}

/// Encoded queries from one worker, with per-scenario counts.
struct Batch {
    bytes: Vec<u8>,
    counts: Vec<u64>,
}

impl Batch {
    fn new(capacity: usize, scenarios: usize) -> Self {
        Batch {
            bytes: Vec::with_capacity(capacity),
            counts: vec![0; scenarios],
        }
    }
}

/// Contiguous share of `0..count` handled by `worker` out of `workers`.
pub fn ordinal_range(count: u64, workers: usize, worker: usize) -> Range<u64> {
    let split = |i: usize| (count as u128 * i as u128 / workers as u128) as u64;
    split(worker)..split(worker + 1)
}

pub async fn run(config: BulkConfig) -> Result<RunSummary> {
    config.validate()?;
    tracing::info!(
        "Starting generation: count={}, scale={}, workers={}, dialect={}",
        config.count,
        config.scale,
        config.workers,
        config.dialect
    );

    let generator = Arc::new(DevopsGenerator::new(config.start, config.end, config.dialect)?);
    let names = generator.list_scenarios();

    let scenario = match &config.scenario {
        Some(name) => Some(generator.registry().by_name(name)?.1.name),
        None => None,
    };

    let writer = match &config.output {
        Some(path) => QueryWriter::create(path, config.format, config.dialect)
            .with_context(|| format!("failed to create output file {}", path))?,
        None => QueryWriter::stdout(config.format, config.dialect),
    };

    let start = Instant::now();
    let (tx, rx) = mpsc::channel::<Batch>(config.workers * 4);
    let failed = Arc::new(AtomicBool::new(false));

    // Phase 1: single writer draining worker batches
    let writer_handle = {
        let names = names.clone();
        let failed = Arc::clone(&failed);
        tokio::task::spawn_blocking(move || write_batches(writer, rx, &names, &failed))
    };

    // Phase 2: one blocking worker per ordinal range, each with its own rng and pool
    let mut worker_handles = Vec::with_capacity(config.workers);
    for worker_id in 0..config.workers {
        let ordinals = ordinal_range(config.count, config.workers, worker_id);
        if ordinals.is_empty() {
            continue;
        }

        let worker = match config.seed {
            Some(seed) => {
                QueryWorker::seeded(Arc::clone(&generator), seed.wrapping_add(worker_id as u64))
            }
            None => QueryWorker::from_entropy(Arc::clone(&generator)),
        };
        let job = WorkerJob {
            worker_id,
            ordinals,
            scale: config.scale,
            scenario,
            format: config.format,
            batch_bytes: config.batch_bytes,
            scenarios: names.len(),
        };
        let tx = tx.clone();
        let failed = Arc::clone(&failed);

        worker_handles.push(tokio::task::spawn_blocking(move || {
            let result = job.run(worker, &tx, &failed);
            // raised while `tx` is alive, so the writer sees it before the channel closes
            if result.is_err() {
                failed.store(true, Ordering::SeqCst);
            }
            result
        }));
    }
    drop(tx);

    // Phase 3: wait for workers, keeping the first failure
    let mut first_error = None;
    for handle in worker_handles {
        if let Err(e) = handle.await? {
            tracing::warn!("{:#}", e);
            first_error.get_or_insert(e);
        }
    }

    let written = writer_handle.await?;
    let metadata = match (first_error, written) {
        (None, Ok(metadata)) => metadata,
        (Some(e), _) | (None, Err(e)) => {
            if let Some(path) = &config.output {
                discard_output(path);
            }
            return Err(e);
        }
    };

    let summary = RunSummary {
        total: metadata.total_queries,
        scenario_counts: metadata.scenario_counts,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        "Generation complete: {} queries in {:.2}s ({:.0} queries/sec)",
        summary.total,
        summary.elapsed.as_secs_f64(),
        summary.throughput()
    );

    Ok(summary)
}

/// Remove a partially written output file so a failed run leaves nothing readable behind.
fn discard_output(path: &str) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::warn!("Removed incomplete output file {}", path),
        Err(e) => tracing::warn!("Failed to remove incomplete output file {}: {}", path, e),
    }
}

fn write_batches(
    mut writer: QueryWriter,
    mut rx: mpsc::Receiver<Batch>,
    names: &[&str],
    failed: &AtomicBool,
) -> Result<QueryFileMetadata> {
    let mut next_report = PROGRESS_EVERY;

    while let Some(batch) = rx.blocking_recv() {
        // keep draining so no worker blocks on a full channel
        if failed.load(Ordering::Relaxed) {
            continue;
        }
        writer.write_batch(&batch.bytes, &batch.counts)?;

        if writer.queries_written() >= next_report {
            tracing::info!("Generated {} queries", writer.queries_written());
            next_report = writer.queries_written() + PROGRESS_EVERY;
        }
    }

    if failed.load(Ordering::SeqCst) {
        writer.abandon()?;
        return Err(anyhow!("generation aborted, no trailer written"));
    }

    writer.finish(names)
}

struct WorkerJob {
    worker_id: usize,
    ordinals: Range<u64>,
    scale: usize,
    scenario: Option<&'static str>,
    format: OutputFormat,
    batch_bytes: usize,
    scenarios: usize,
}

impl WorkerJob {
    fn run(
        self,
        mut worker: QueryWorker,
        tx: &mpsc::Sender<Batch>,
        failed: &AtomicBool,
    ) -> Result<()> {
        tracing::debug!("Worker {} handling ordinals {:?}", self.worker_id, self.ordinals);
        let closed = || anyhow!("writer closed before worker {} finished", self.worker_id);

        let mut batch = Batch::new(self.batch_bytes, self.scenarios);
        for ordinal in self.ordinals.clone() {
            if failed.load(Ordering::Relaxed) {
                tracing::debug!("Worker {} stopping, another worker failed", self.worker_id);
                return Ok(());
            }

            let carrier = match self.scenario {
                Some(name) => worker.generate_named(name, self.scale),
                None => worker.generate(ordinal, self.scale),
            }
            .with_context(|| format!("worker {} failed on query {}", self.worker_id, ordinal))?;

            encode_query(self.format, &carrier, &mut batch.bytes)?;
            batch.counts[carrier.scenario as usize] += 1;
            worker.release(carrier);

            if batch.bytes.len() >= self.batch_bytes {
                let empty = Batch::new(self.batch_bytes, self.scenarios);
                let full = std::mem::replace(&mut batch, empty);
                tx.blocking_send(full).map_err(|_| closed())?;
            }
        }

        if !batch.bytes.is_empty() {
            tx.blocking_send(batch).map_err(|_| closed())?;
        }

        tracing::debug!(
            "Worker {} done, {} carriers allocated",
            self.worker_id,
            worker.pool().allocated()
        );
        Ok(())
    }
}
