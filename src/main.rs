use std::path::PathBuf;
use std::time::Instant;
use bus_cut::driver::{run_batch, BatchConfig};
use bus_cut::partitioner::{build_partitioner, PartitionerKind};
use bus_cut::score::Normalization;
use bus_cut::selector::TrialSelector;
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(version, about = "Seat students on buses, keeping friends together and rowdy groups apart", long_about = None)]
struct Args {
    /// Directory holding one directory per size category
    #[arg(long, default_value = "all_inputs")]
    inputs: PathBuf,

    /// Directory the solutions are written to
    #[arg(long, default_value = "outputs")]
    outputs: PathBuf,

    /// Size categories to solve
    #[arg(long, value_delimiter = ',', default_values_t = ["small".to_string(), "medium".to_string(), "large".to_string()])]
    sizes: Vec<String>,

    /// First instance id
    #[arg(long, default_value_t = 1)]
    start: u32,

    /// Instance id to stop before
    #[arg(long, default_value_t = 1100)]
    end: u32,

    /// Number of partition trials per instance
    #[arg(short, long, default_value_t = 5)]
    trials: usize,

    /// Seed of the trial seeds; drawn from entropy when absent
    #[arg(short, long)]
    seed: Option<u64>,

    /// Partitioning algorithm
    #[arg(short, long, value_enum, default_value_t = PartitionerKind::Multilevel)]
    partitioner: PartitionerKind,

    /// Imbalance Ratio
    #[arg(short, long, default_value_t = 0.03)]
    balance_factor: f64,

    /// Run the trials of an instance in parallel
    #[arg(long)]
    parallel: bool,

    /// Edge count the score is divided by
    #[arg(long, value_enum, default_value_t = Normalization::OriginalEdges)]
    normalization: Normalization,

    /// Instance ids solved with contiguous chunks instead of the chosen partitioner
    #[arg(long, value_delimiter = ',')]
    chunk_ids: Vec<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = BatchConfig {
        inputs: args.inputs,
        outputs: args.outputs,
        sizes: args.sizes,
        ids: args.start..args.end,
        selector: TrialSelector {
            num_trials: args.trials,
            seed: args.seed,
            parallel: args.parallel,
            normalization: args.normalization,
        },
        chunk_ids: args.chunk_ids,
        ..Default::default()
    };
    let partitioner = build_partitioner(args.partitioner, args.balance_factor);

    let start = Instant::now();
    let summary = run_batch(&config, partitioner.as_ref());
    info!("Execution time {:?}", start.elapsed());

    println!(
        "solved {}, unsolved {}, skipped {}, failed {}",
        summary.solved, summary.unsolved, summary.skipped, summary.failed
    );
    Ok(())
}
