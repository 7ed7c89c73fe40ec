use std::fs;
use std::path::PathBuf;

use clap::Parser;
use clusterbench::{Benchmark, BenchmarkConfig, BenchmarkParams, Dataset};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "clusterbench")]
#[command(about = "Score DBSCAN and k-means against ground truth on raw, PCA, MDS, Isomap and LLE feature spaces")]
#[command(version)]
struct Args {
    /// Dataset file: numeric feature columns, class id in the last column, no header
    dataset: PathBuf,

    /// DBSCAN neighbourhood radius (features are scaled to [0, 1] first)
    #[arg(long)]
    eps: f64,

    /// DBSCAN minimum neighbourhood size, the point itself included
    #[arg(long)]
    min_pts: usize,

    /// k-means cluster count
    #[arg(short, long)]
    k: usize,

    /// Embedding dimension for every reduction method
    #[arg(short, long)]
    dim: usize,

    /// JSON file with tunables (iteration caps, tolerances, seeds, neighbourhood sizes)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed k-means and MDS (overrides seeds from --config)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the visualization payload as JSON to this path
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => serde_json::from_str::<BenchmarkConfig>(&fs::read_to_string(path)?)?,
        None => BenchmarkConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.kmeans_seed = Some(seed);
        config.mds_seed = Some(seed);
    }

    let dataset = Dataset::from_path(&args.dataset)?;
    info!(path = %args.dataset.display(), "dataset loaded");

    let params = BenchmarkParams {
        eps: args.eps,
        min_pts: args.min_pts,
        k: args.k,
        target_dim: args.dim,
    };
    let benchmark = Benchmark::new(params).with_config(config);

    let mut payload_result = Ok(());
    let matrix = benchmark.run_with(&dataset.features, &dataset.labels, |payload| {
        if let Some(path) = &args.payload {
            payload_result = serde_json::to_string_pretty(&payload)
                .map_err(Box::<dyn std::error::Error>::from)
                .and_then(|json| fs::write(path, json).map_err(Into::into));
        }
    })?;

    print!("{matrix}");
    payload_result?;
    if let Some(path) = &args.payload {
        info!(path = %path.display(), "payload written");
    }
    Ok(())
}
