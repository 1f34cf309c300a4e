//! Analyze command implementation

use anyhow::{Context, Result};

use super::QueryFileAnalysis;
use crate::output::QueryReader;

pub fn run(input: &str) -> Result<()> {
    let reader =
        QueryReader::open(input).with_context(|| format!("failed to read query file {}", input))?;
    let metadata = reader.metadata();
    let analysis = QueryFileAnalysis::analyze(&reader);

    println!("\n╔═══════════════════════════════════════════════════════╗");
    println!("║            Query File Analysis Report                 ║");
    println!("╚═══════════════════════════════════════════════════════╝\n");

    println!("File: {}", input);
    println!("Version: {}", metadata.version);
    println!("Dialect: {}\n", metadata.dialect);

    println!("─ Query Statistics ─");
    println!("Total queries: {}", analysis.total_queries);
    println!("Wildcard field queries: {}", analysis.wildcard_queries);
    println!("Avg query size: {:.1} bytes", analysis.avg_query_bytes);
    println!("Max query size: {} bytes\n", analysis.max_query_bytes);

    println!("─ Scenario Distribution ─");
    for (name, count) in &analysis.scenario_distribution {
        println!("{}: {} ({:.1}%)", name, count, percent(*count, analysis.total_queries));
    }

    println!("\n─ Measurement Distribution ─");
    let mut namespaces: Vec<_> = analysis.namespace_distribution.iter().collect();
    namespaces.sort_by_key(|(_, count)| std::cmp::Reverse(**count));
    for (namespace, count) in namespaces {
        println!("{}: {} ({:.1}%)", namespace, count, percent(*count, analysis.total_queries));
    }

    println!();
    Ok(())
}

fn percent(count: u64, total: u64) -> f64 {
    (count as f64 / total.max(1) as f64) * 100.0
}
