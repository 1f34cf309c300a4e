//! Engine façade: a shared, read-only generator plus per-worker state

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use crate::error::{GenError, Result};
use crate::query::{QueryCarrier, QueryPool};
use crate::render::{Dialect, QueryRenderer};
use crate::scenario::{Scenario, ScenarioContext, ScenarioRegistry};
use crate::sample::TimeInterval;

/// Read-only state shared by every worker of a run.
#[derive(Debug)]
pub struct DevopsGenerator {
    interval: TimeInterval,
    registry: ScenarioRegistry,
    renderer: Arc<dyn QueryRenderer>,
}

impl DevopsGenerator {
    /// Generator over the devops catalog. Fails if `start` is not strictly before `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, dialect: Dialect) -> Result<Self> {
        Self::with_registry(start, end, dialect.renderer(), ScenarioRegistry::devops()?)
    }

    pub fn with_registry(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        renderer: Arc<dyn QueryRenderer>,
        registry: ScenarioRegistry,
    ) -> Result<Self> {
        let interval = TimeInterval::new(start, end)?;
        tracing::debug!(
            "Generator ready: {} scenarios over {} .. {}",
            registry.len(),
            start,
            end
        );

        Ok(DevopsGenerator {
            interval,
            registry,
            renderer,
        })
    }

    pub fn interval(&self) -> &TimeInterval {
        &self.interval
    }

    pub fn registry(&self) -> &ScenarioRegistry {
        &self.registry
    }

    pub fn list_scenarios(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }
}

/// Per-worker generation state: its own random source and carrier pool.
///
/// Workers never share mutable state, so any number of them can run on
/// separate threads against one `Arc<DevopsGenerator>`.
pub struct QueryWorker {
    generator: Arc<DevopsGenerator>,
    rng: StdRng,
    pool: QueryPool,
}

impl QueryWorker {
    pub fn new(generator: Arc<DevopsGenerator>, rng: StdRng) -> Self {
        QueryWorker {
            generator,
            rng,
            pool: QueryPool::new(),
        }
    }

    pub fn seeded(generator: Arc<DevopsGenerator>, seed: u64) -> Self {
        Self::new(generator, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(generator: Arc<DevopsGenerator>) -> Self {
        Self::new(generator, StdRng::from_entropy())
    }

    /// Fill a carrier with the scenario at `ordinal mod registry size`.
    pub fn generate(&mut self, ordinal: u64, scale: usize) -> Result<QueryCarrier> {
        let (index, scenario) = self.generator.registry.by_ordinal(ordinal);
        fill(&self.generator, &mut self.rng, &mut self.pool, index, scenario, scale)
    }

    /// Fill a carrier with the scenario named `name`, ignoring ASCII case.
    pub fn generate_named(&mut self, name: &str, scale: usize) -> Result<QueryCarrier> {
        let (index, scenario) = self.generator.registry.by_name(name)?;
        fill(&self.generator, &mut self.rng, &mut self.pool, index, scenario, scale)
    }

    /// Hand a consumed carrier back for reuse.
    pub fn release(&mut self, carrier: QueryCarrier) {
        self.pool.release(carrier);
    }

    pub fn pool(&self) -> &QueryPool {
        &self.pool
    }
}

fn fill(
    generator: &DevopsGenerator,
    rng: &mut StdRng,
    pool: &mut QueryPool,
    index: usize,
    scenario: &Scenario,
    scale: usize,
) -> Result<QueryCarrier> {
    if scale == 0 {
        return Err(GenError::InvalidScale(scale));
    }

    let mut carrier = pool.acquire();
    let mut ctx = ScenarioContext {
        interval: &generator.interval,
        renderer: generator.renderer.as_ref(),
        rng,
    };

    match (scenario.run)(&mut ctx, &mut carrier, scale) {
        Ok(()) => {
            // lossless, the registry holds at most MAX_SCENARIOS entries
            carrier.scenario = index as u16;
            Ok(carrier)
        }
        Err(e) => {
            // A partially written carrier never reaches the caller
            tracing::debug!("Scenario {} failed: {}", scenario.name, e);
            pool.release(carrier);
            Err(e)
        }
    }
}
