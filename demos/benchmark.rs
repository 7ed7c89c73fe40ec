//! Benchmark DBSCAN and k-means on three noisy 3-D blobs.

use clusterbench::{Benchmark, BenchmarkConfig, BenchmarkParams, FeatureMatrix, Label};
use rand::prelude::*;

fn main() {
    let mut rng = StdRng::seed_from_u64(2024);
    let centers = [[0.0, 0.0, 0.0], [4.0, 4.0, 0.0], [0.0, 4.0, 4.0]];

    let mut rows = Vec::new();
    let mut labels: Vec<Label> = Vec::new();
    for (label, c) in centers.iter().enumerate() {
        for _ in 0..40 {
            rows.push(c.iter().map(|x| x + rng.random::<f64>() - 0.5).collect());
            labels.push(label as Label);
        }
    }
    let features = FeatureMatrix::new(rows).unwrap();

    let params = BenchmarkParams {
        eps: 0.15,
        min_pts: 4,
        k: 3,
        target_dim: 2,
    };
    let matrix = Benchmark::new(params)
        .with_config(BenchmarkConfig::seeded(42))
        .run_with(&features, &labels, |payload| {
            for panel in &payload.panels {
                match &panel.embedding {
                    Some(e) => println!(
                        "{:<7} {} points in {} dims ({:?})",
                        panel.method.name(),
                        e.coords.n_samples(),
                        e.coords.n_features(),
                        payload.plot_mode()
                    ),
                    None => println!("{:<7} unavailable", panel.method.name()),
                }
            }
            println!();
        })
        .unwrap();

    print!("{matrix}");
}
