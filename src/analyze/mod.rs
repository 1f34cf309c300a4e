//! Summaries of generated query files

pub mod main;

pub use main::run;

use std::collections::HashMap;

use crate::output::QueryReader;
use crate::query::WILDCARD;

pub struct QueryFileAnalysis {
    pub total_queries: u64,
    /// Scenario name and count, in registry order
    pub scenario_distribution: Vec<(String, u64)>,
    pub namespace_distribution: HashMap<String, u64>,
    pub wildcard_queries: u64,
    pub avg_query_bytes: f64,
    pub max_query_bytes: usize,
}

impl QueryFileAnalysis {
    pub fn analyze(reader: &QueryReader) -> Self {
        let mut namespace_dist = HashMap::new();
        let mut wildcard_queries = 0;
        let mut total_bytes = 0usize;
        let mut max_query_bytes = 0;

        for query in reader.queries() {
            *namespace_dist.entry(query.namespace.clone()).or_insert(0) += 1;
            if query.field == WILDCARD {
                wildcard_queries += 1;
            }
            total_bytes += query.query.len();
            max_query_bytes = max_query_bytes.max(query.query.len());
        }

        let total_queries = reader.queries().len() as u64;
        let avg_query_bytes = if total_queries > 0 {
            total_bytes as f64 / total_queries as f64
        } else {
            0.0
        };

        QueryFileAnalysis {
            total_queries,
            scenario_distribution: reader.metadata().scenario_counts.clone(),
            namespace_distribution: namespace_dist,
            wildcard_queries,
            avg_query_bytes,
            max_query_bytes,
        }
    }
}
