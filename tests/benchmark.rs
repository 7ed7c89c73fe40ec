use std::collections::BTreeSet;
use std::io::Cursor;

use clusterbench::cluster::{Clustering, Dbscan, Kmeans, NOISE};
use clusterbench::metrics::purity;
use clusterbench::{
    normalize, Benchmark, BenchmarkConfig, BenchmarkParams, Dataset, Error, FeatureMatrix, Label,
    ReductionMethod, RowOutcome,
};
use rand::prelude::*;

/// Two isotropic Gaussian blobs of `per_blob` points each, labeled 0 and 1.
fn two_blobs(per_blob: usize, seed: u64) -> (FeatureMatrix, Vec<Label>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut gauss = move || {
        // Box-Muller.
        let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
        let u2: f64 = rng.random();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    };

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for (label, center) in [(0, [0.0, 0.0]), (1, [10.0, 10.0])] {
        for _ in 0..per_blob {
            rows.push(vec![center[0] + 0.5 * gauss(), center[1] + 0.5 * gauss()]);
            labels.push(label);
        }
    }
    (FeatureMatrix::new(rows).unwrap(), labels)
}

/// A 6 × 5 lattice; its kNN graph is always connected.
fn lattice() -> (FeatureMatrix, Vec<Label>) {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for i in 0..6 {
        for j in 0..5 {
            rows.push(vec![i as f64, j as f64]);
            labels.push(if i < 3 { 0 } else { 1 });
        }
    }
    (FeatureMatrix::new(rows).unwrap(), labels)
}

fn params(eps: f64, min_pts: usize, k: usize, target_dim: usize) -> BenchmarkParams {
    BenchmarkParams {
        eps,
        min_pts,
        k,
        target_dim,
    }
}

#[test]
fn two_blobs_are_recovered_on_raw_features() {
    let (x, y) = two_blobs(50, 7);
    let out = Benchmark::new(params(0.5, 5, 2, 2))
        .with_config(BenchmarkConfig::seeded(42))
        .run(&x, &y)
        .unwrap();

    let rows = out.matrix.rows();
    assert_eq!(rows.len(), 10);
    assert!(!rows[0].is_unavailable());
    assert!(!rows[1].is_unavailable());

    // Raw ids are compared without relabeling, so check partition quality with
    // purity on the same feature space the table used.
    let scaled = normalize::min_max(&x);
    let db = Dbscan::new(0.5, 5).fit_predict(scaled.rows()).unwrap();
    let km = Kmeans::new(2).with_seed(42).fit_predict(scaled.rows()).unwrap();

    let db_clusters: BTreeSet<Label> = db.iter().copied().filter(|&l| l != NOISE).collect();
    let km_clusters: BTreeSet<Label> = km.iter().copied().collect();
    assert_eq!(db_clusters.len(), 2);
    assert_eq!(km_clusters.len(), 2);
    assert!(purity(&y, &db) >= 0.9);
    assert!(purity(&y, &km) >= 0.9);

    // The table's accuracy is either the purity or its label-swapped complement.
    let acc = rows[1].scores().unwrap().accuracy;
    assert!(acc >= 0.9 || acc <= 0.1, "accuracy {acc}");
}

#[test]
fn separated_blobs_disconnect_isomap_only() {
    let (x, y) = two_blobs(50, 3);
    let out = Benchmark::new(params(0.5, 5, 2, 2))
        .with_config(BenchmarkConfig::seeded(5))
        .run(&x, &y)
        .unwrap();
    let rows = out.matrix.rows();

    for (i, row) in rows.iter().enumerate() {
        let isomap_row = i == 6 || i == 7;
        assert_eq!(row.is_unavailable(), isomap_row, "row {i}: {row:?}");
    }
    match &rows[6].outcome {
        RowOutcome::Unavailable { reason } => assert!(reason.contains("disconnected"), "{reason}"),
        other => panic!("expected unavailable, got {other:?}"),
    }
    assert!(rows[6].cells()[2..].iter().all(|c| c == "unavailable"));

    let panels = &out.payload.panels;
    assert_eq!(panels.len(), 4);
    assert_eq!(panels[2].method, ReductionMethod::Isomap);
    assert!(panels[2].embedding.is_none());
    for p in [&panels[0], &panels[1], &panels[3]] {
        let emb = p.embedding.as_ref().unwrap();
        assert_eq!(emb.coords.n_samples(), 100);
        assert_eq!(emb.coords.n_features(), 2);
    }
}

#[test]
fn constant_feature_column_normalizes_to_zero() {
    let rows: Vec<Vec<f64>> = (0..20)
        .map(|i| vec![i as f64, 3.0, (i % 4) as f64])
        .collect();
    let labels: Vec<Label> = (0..20).map(|i| (i % 2) as Label).collect();
    let x = FeatureMatrix::new(rows).unwrap();

    let scaled = normalize::min_max(&x);
    assert!(scaled.column(1).iter().all(|&v| v == 0.0));

    let out = Benchmark::new(params(0.3, 3, 2, 2))
        .with_config(BenchmarkConfig::seeded(1))
        .run(&x, &labels)
        .unwrap();
    assert_eq!(out.matrix.cells().len(), 10);
    for row in out.matrix.rows().iter().filter_map(|r| r.scores()) {
        assert!(row.mse.is_finite() && row.mae.is_finite());
    }
}

#[test]
fn k_larger_than_sample_count_aborts() {
    let (x, y) = lattice();
    let err = Benchmark::new(params(0.5, 3, 31, 2)).run(&x, &y).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidClusterCount {
            requested: 31,
            n_items: 30
        }
    ));
}

#[test]
fn zero_min_pts_aborts() {
    let (x, y) = lattice();
    let err = Benchmark::new(params(0.5, 0, 2, 2)).run(&x, &y).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "min_pts", .. }));
}

#[test]
fn invalid_tunables_abort_the_run() {
    let (x, y) = lattice();
    for cfg in [
        BenchmarkConfig {
            kmeans_max_iter: 0,
            ..BenchmarkConfig::seeded(1)
        },
        BenchmarkConfig {
            isomap_n_neighbors: 0,
            ..BenchmarkConfig::seeded(1)
        },
        BenchmarkConfig {
            lle_reg: -1.0,
            ..BenchmarkConfig::seeded(1)
        },
        BenchmarkConfig {
            mds_tol: f64::NAN,
            ..BenchmarkConfig::seeded(1)
        },
    ] {
        let err = Benchmark::new(params(0.5, 3, 2, 2))
            .with_config(cfg.clone())
            .run(&x, &y)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }), "{cfg:?}: {err}");
    }
}

#[test]
fn extreme_feature_range_is_scored_normally() {
    let (x, y) = lattice();
    let rows: Vec<Vec<f64>> = x
        .rows()
        .iter()
        .map(|r| vec![(r[0] - 2.5) * 4e307, r[1]])
        .collect();
    let wide = FeatureMatrix::new(rows).unwrap();

    let scaled = normalize::min_max(&wide);
    assert!(scaled.rows().iter().flatten().all(|v| (0.0..=1.0).contains(v)));
    assert_eq!(scaled.column(0).iter().copied().fold(f64::NAN, f64::max), 1.0);

    let out = Benchmark::new(params(0.25, 3, 2, 2))
        .with_config(BenchmarkConfig::seeded(8))
        .run(&wide, &y)
        .unwrap();
    let raw = out.matrix.rows()[0].scores().unwrap();
    assert!(raw.mse.is_finite() && raw.accuracy.is_finite());
}

#[test]
fn non_finite_features_are_rejected_up_front() {
    assert!(matches!(
        FeatureMatrix::new(vec![vec![f64::NAN, 1.0], vec![0.0, 2.0]]),
        Err(Error::NonFinite { row: 0, column: 0 })
    ));
}

#[test]
fn pca_beyond_feature_count_marks_only_its_rows() {
    let (x, y) = lattice();
    let out = Benchmark::new(params(0.25, 3, 2, 3))
        .with_config(BenchmarkConfig::seeded(8))
        .run(&x, &y)
        .unwrap();

    for (i, row) in out.matrix.rows().iter().enumerate() {
        assert_eq!(row.is_unavailable(), i == 2 || i == 3, "row {i}: {row:?}");
    }
    assert_eq!(out.matrix.rows()[2].reduction, "PCA(d=3)");
    assert!(out.payload.panels[0].embedding.is_none());
    assert_eq!(out.payload.target_dim, 3);
    for p in &out.payload.panels[1..] {
        assert_eq!(p.embedding.as_ref().unwrap().coords.n_features(), 3);
    }
}

#[test]
fn row_order_is_fixed() {
    let (x, y) = lattice();
    let out = Benchmark::new(params(0.25, 3, 2, 1))
        .with_config(BenchmarkConfig::seeded(2))
        .run(&x, &y)
        .unwrap();
    let cells = out.matrix.cells();
    let reductions: Vec<&str> = cells.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(
        reductions,
        [
            "none", "none", "PCA(d=1)", "PCA(d=1)", "MDS(d=1)", "MDS(d=1)", "Isomap(d=1)",
            "Isomap(d=1)", "LLE(d=1)", "LLE(d=1)"
        ]
    );
    for pair in cells.chunks(2) {
        assert_eq!(pair[0][0], "DBSCAN(eps=0.250, min_pts=3)");
        assert_eq!(pair[1][0], "KMeans(k=2)");
    }
}

#[test]
fn dataset_text_runs_end_to_end() {
    let mut text = String::new();
    for i in 0..12 {
        let t = i as f64 * 0.1;
        text.push_str(&format!("{t},{},0\n", 1.0 - t));
        text.push_str(&format!("{},{t},1\n", 8.0 + t));
    }
    let ds = Dataset::from_reader(Cursor::new(text)).unwrap();
    let out = Benchmark::new(params(0.2, 2, 2, 2))
        .with_config(BenchmarkConfig::seeded(4))
        .run(&ds.features, &ds.labels)
        .unwrap();
    assert_eq!(out.payload.labels, ds.labels);
    assert_eq!(out.matrix.rows().len(), 10);
}
