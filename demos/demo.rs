//! Demo application running the same check-in workload against each strategy.
//!
//! Run with:
//! ```bash
//! cargo run --example demo --features demo -- --producers 2 --events 1000
//! ```

use clap::{Parser, ValueEnum};
use presenze::aggregator::Strategy;
use presenze::report::RankingReport;
use presenze::workload::Workload;
use tracing_subscriber::EnvFilter;

/// Strategy selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StrategyChoice {
    /// Every strategy, one after another.
    #[default]
    All,
    /// Unsynchronized read-modify-write (loses updates under contention).
    Unsynchronized,
    /// Mutex around the whole map.
    Locked,
    /// Sharded concurrent map with atomic per-key updates.
    Concurrent,
    /// Immutable map replaced via compare-and-swap.
    Rcu,
    /// Single owner thread behind a message queue.
    Mailbox,
}

impl StrategyChoice {
    fn strategies(self) -> Vec<Strategy> {
        match self {
            StrategyChoice::All => Strategy::ALL.to_vec(),
            StrategyChoice::Unsynchronized => vec![Strategy::Unsynchronized],
            StrategyChoice::Locked => vec![Strategy::Locked],
            StrategyChoice::Concurrent => vec![Strategy::ConcurrentMap],
            StrategyChoice::Rcu => vec![Strategy::Rcu],
            StrategyChoice::Mailbox => vec![Strategy::Mailbox],
        }
    }
}

/// Output format for the final rankings.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// One human-readable line per strategy.
    #[default]
    Plain,
    /// Compact JSON report per strategy.
    Json,
    /// Pretty-printed JSON report per strategy.
    JsonPretty,
}

#[derive(Debug, Parser)]
#[command(name = "demo", about = "Check-in counting, five concurrency strategies")]
struct Args {
    /// Which strategy to run.
    #[arg(short, long, value_enum, default_value_t = StrategyChoice::All)]
    strategy: StrategyChoice,

    /// Number of producer threads.
    #[arg(short, long, default_value_t = 2)]
    producers: usize,

    /// Check-ins issued by each producer.
    #[arg(short, long, default_value_t = 1000)]
    events: usize,

    /// City keys cycled by each producer.
    #[arg(short, long, value_delimiter = ',', default_values_t = [String::from("Cairo"), String::from("Auckland")])]
    keys: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let workload = Workload::new()
        .with_producers(args.producers)
        .with_events_per_producer(args.events)
        .with_keys(args.keys.clone());
    let expected = workload.expected_total();

    for strategy in args.strategy.strategies() {
        let aggregator = strategy.build();
        let counts = workload.run(aggregator.as_ref());

        match args.format {
            OutputFormat::Plain => {
                let deficit = expected.saturating_sub(counts.total());
                print!(
                    "[{strategy}] Computing ranking based on: {counts} (total {}/{expected}",
                    counts.total()
                );
                if deficit > 0 {
                    print!(", {deficit} check-ins lost");
                }
                println!(")");
            }
            OutputFormat::Json => {
                let report = RankingReport::new(strategy.name(), &counts);
                match report.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(err) => eprintln!("failed to serialize report: {err}"),
                }
            }
            OutputFormat::JsonPretty => {
                let report = RankingReport::new(strategy.name(), &counts);
                match report.to_json_pretty() {
                    Ok(json) => println!("{json}"),
                    Err(err) => eprintln!("failed to serialize report: {err}"),
                }
            }
        }
    }
}
