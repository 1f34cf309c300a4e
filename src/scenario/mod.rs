//! Scenario registry and dispatch
//!
//! A scenario is a plain function that parameterizes one access pattern and
//! fills a [`QueryCarrier`] in place. The registry maps stable ordinals and
//! names to those functions. It is built once and never mutated afterwards.

pub mod devops;

use rand::rngs::StdRng;
use std::collections::HashSet;
use std::fmt::{self, Write};

use crate::error::{GenError, Result};
use crate::query::QueryCarrier;
use crate::render::{QueryPlan, QueryRenderer};
use crate::sample::TimeInterval;

/// Everything a scenario may draw on besides the carrier and the scale.
pub struct ScenarioContext<'a> {
    pub interval: &'a TimeInterval,
    pub renderer: &'a dyn QueryRenderer,
    pub rng: &'a mut StdRng,
}

pub type ScenarioFn = fn(&mut ScenarioContext<'_>, &mut QueryCarrier, usize) -> Result<()>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub run: ScenarioFn,
}

impl Scenario {
    pub const fn new(name: &'static str, run: ScenarioFn) -> Self {
        Scenario { name, run }
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

impl<'a> ScenarioContext<'a> {
    /// Write every carrier attribute from a finished plan.
    ///
    /// The label is prefixed with the renderer's name and the description is
    /// `"<label>: <detail>"`.
    pub fn emit(
        &self,
        carrier: &mut QueryCarrier,
        plan: &QueryPlan<'_>,
        field: &str,
        label: fmt::Arguments<'_>,
        detail: fmt::Arguments<'_>,
    ) {
        carrier.human_label.clear();
        carrier.human_description.clear();
        carrier.query.clear();
        self.write_text(carrier, plan, label, detail)
            .expect("writing to a String cannot fail");

        carrier.set_namespace(plan.measurement);
        carrier.set_field(field);
    }

    fn write_text(
        &self,
        carrier: &mut QueryCarrier,
        plan: &QueryPlan<'_>,
        label: fmt::Arguments<'_>,
        detail: fmt::Arguments<'_>,
    ) -> fmt::Result {
        write!(carrier.human_label, "{} {}", self.renderer.label_prefix(), label)?;
        write!(carrier.human_description, "{}: {}", carrier.human_label, detail)?;
        self.renderer.render(plan, &mut carrier.query)
    }
}

/// Scenario indices are carried as `u16` in every generated query.
pub const MAX_SCENARIOS: usize = u16::MAX as usize + 1;

/// Collects scenarios during initialization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    scenarios: Vec<Scenario>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: &'static str, run: ScenarioFn) -> Self {
        self.scenarios.push(Scenario::new(name, run));
        self
    }

    pub fn extend(mut self, scenarios: &[Scenario]) -> Self {
        self.scenarios.extend_from_slice(scenarios);
        self
    }

    /// Freeze the registry. Names must be unique ignoring ASCII case.
    pub fn build(self) -> Result<ScenarioRegistry> {
        if self.scenarios.is_empty() {
            return Err(GenError::EmptyRegistry);
        }
        if self.scenarios.len() > MAX_SCENARIOS {
            return Err(GenError::RegistryTooLarge(self.scenarios.len()));
        }
        let mut seen = HashSet::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            if !seen.insert(scenario.name.to_ascii_lowercase()) {
                return Err(GenError::DuplicateScenario(scenario.name.to_string()));
            }
        }
        Ok(ScenarioRegistry {
            scenarios: self.scenarios,
        })
    }
}

/// Immutable, ordered table of scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioRegistry {
    scenarios: Vec<Scenario>,
}

impl ScenarioRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The devops catalog in declaration order.
    pub fn devops() -> Result<Self> {
        RegistryBuilder::new().extend(devops::SCENARIOS).build()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    /// Round-robin selection: ordinal `i` maps to scenario `i mod len`.
    pub fn by_ordinal(&self, ordinal: u64) -> (usize, &Scenario) {
        let index = (ordinal % self.scenarios.len() as u64) as usize;
        (index, &self.scenarios[index])
    }

    /// First scenario in declaration order whose name matches, ignoring ASCII case.
    pub fn by_name(&self, name: &str) -> Result<(usize, &Scenario)> {
        self.scenarios
            .iter()
            .enumerate()
            .find(|(_, s)| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| GenError::UnknownScenario(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scenarios.iter().map(|s| s.name)
    }
}
