use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tsqgen::bulk::BulkConfig;

#[derive(Parser)]
#[command(name = "tsqgen")]
#[command(about = "Synthetic devops query workloads for time-series benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate queries, cycling through the scenario catalog
    Generate(BulkConfig),
    /// List scenario names in dispatch order
    Scenarios,
    /// Summarize a binary query file
    Analyze {
        #[arg(short, long)]
        input: String,
    },
}

#[tokio::main]
async fn main() {
    // Queries may go to stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate(config) => tsqgen::bulk::run(config).await.map(|_| ()),
        Commands::Scenarios => list_scenarios(),
        Commands::Analyze { input } => tsqgen::analyze::run(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn list_scenarios() -> anyhow::Result<()> {
    let registry = tsqgen::ScenarioRegistry::devops()?;
    for (i, name) in registry.names().enumerate() {
        println!("{:2}  {}", i, name);
    }
    Ok(())
}
