//! Query carriers: the reusable output record of every scenario

pub mod pool;

pub use pool::QueryPool;

use serde::{Deserialize, Serialize};

/// Marker written to `field` when a scenario selects every field.
pub const WILDCARD: &str = "*";

/// One generated query plus the metadata a driver needs to report on it.
///
/// Carriers are filled in place and recycled through a [`QueryPool`]. Every
/// fill rewrites all attributes, so nothing from a previous occupant survives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCarrier {
    /// Ordinal of the scenario in the registry that produced this query
    pub scenario: u16,
    pub human_label: String,
    pub human_description: String,
    pub namespace: String,
    pub field: String,
    pub query: String,
}

impl QueryCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every attribute while keeping the allocated buffers.
    pub fn reset(&mut self) {
        self.scenario = 0;
        self.human_label.clear();
        self.human_description.clear();
        self.namespace.clear();
        self.field.clear();
        self.query.clear();
    }

    /// True once a scenario has written all five text attributes.
    pub fn is_filled(&self) -> bool {
        !self.human_label.is_empty()
            && !self.human_description.is_empty()
            && !self.namespace.is_empty()
            && !self.field.is_empty()
            && !self.query.is_empty()
    }

    pub fn set_namespace(&mut self, namespace: &str) {
        self.namespace.clear();
        self.namespace.push_str(namespace);
    }

    pub fn set_field(&mut self, field: &str) {
        self.field.clear();
        self.field.push_str(field);
    }
}
