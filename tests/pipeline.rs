use std::io::Write;

use ndarray::Array2;
use symnmf::common::matrix::is_symmetric;
use symnmf::symnmf::{factorize, SymNmfConfig, Termination};
use symnmf::{bindings, cluster, graph, io, PointSet};

fn write_points(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn grid_blobs() -> PointSet {
    let mut rows = Vec::new();
    for (cx, cy) in [(0.0, 0.0), (8.0, 0.0), (4.0, 8.0)] {
        for i in 0..4 {
            let dx = (i % 2) as f64 * 0.3;
            let dy = (i / 2) as f64 * 0.3;
            rows.push(vec![cx + dx, cy + dy]);
        }
    }
    PointSet::from_rows(rows).unwrap()
}

#[test]
fn triangle_scenario_renders_like_the_cli() {
    let file = write_points("0,0\n0,1\n1,0\n");
    let points = io::load_points(file.path()).unwrap();

    let a = graph::build_affinity(&points).unwrap();
    assert_eq!(
        io::format_matrix(a.view()),
        "0.0000,0.6065,0.6065\n0.6065,0.0000,0.3679\n0.6065,0.3679,0.0000\n"
    );

    let d = graph::build_degree(a.view()).unwrap();
    assert_eq!(
        io::format_matrix(d.view()),
        "1.2131,0.0000,0.0000\n0.0000,0.9744,0.0000\n0.0000,0.0000,0.9744\n"
    );

    let w = graph::build_normalized(a.view(), d.view()).unwrap();
    assert!(is_symmetric(w.view(), 1e-12));
}

#[test]
fn whitespace_and_csv_inputs_agree() {
    let csv = write_points("0.5,1.0\n2.0,-1.5\n3.25,0.0\n");
    let plain = write_points("0.5 1.0\n2.0 -1.5\n3.25 0.0\n");
    let a = graph::normalized_affinity(&io::load_points(csv.path()).unwrap()).unwrap();
    let b = graph::normalized_affinity(&io::load_points(plain.path()).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn factorization_recovers_three_blobs() {
    let points = grid_blobs();
    let w = graph::normalized_affinity(&points).unwrap();
    let h0 = symnmf::cli::initialize_h(w.view(), 3, symnmf::cli::DEFAULT_SEED).unwrap();
    let result = factorize(w.view(), h0, &SymNmfConfig::default()).unwrap();

    assert!(result.iterations <= 300);
    assert!(result.h.iter().all(|x| x.is_finite() && *x >= 0.0));
    if result.termination == Termination::Converged {
        assert!(result.last_delta < 1e-4);
    }

    let labels = cluster::hard_assignments(result.h.view());
    let score = cluster::silhouette_score(&points, &labels).unwrap();
    assert!((-1.0..=1.0).contains(&score));
}

#[test]
fn smaller_cap_is_honoured() {
    let points = grid_blobs();
    let w = graph::normalized_affinity(&points).unwrap();
    let h0 = Array2::from_elem((points.n(), 3), 0.4);
    let config = SymNmfConfig {
        max_iterations: 5,
        epsilon: 0.0,
        beta: 0.5,
    };
    let result = factorize(w.view(), h0, &config).unwrap();
    assert_eq!(result.iterations, 5);
    assert_eq!(result.termination, Termination::IterationCapped);
}

#[test]
fn bindings_round_trip_the_whole_pipeline() {
    let data = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![6.0, 6.0]];
    let a = bindings::sym(&data, 4, 2).unwrap();
    let d = bindings::ddg(&data, 4, 2).unwrap();
    let w = bindings::norm_from(&a, &d, 4).unwrap();
    assert_eq!(w, bindings::norm(&data, 4, 2).unwrap());

    let h = vec![vec![0.3, 0.1]; 4];
    let out = bindings::symnmf(&w, &h, 4, 2, &SymNmfConfig::default()).unwrap();
    assert_eq!(out.len(), 4);
}

#[test]
fn kmeans_baseline_scores_well_on_blobs() {
    let points = grid_blobs();
    let result = cluster::kmeans(&points, 3, cluster::DEFAULT_KMEANS_ITERATIONS).unwrap();
    let score = cluster::silhouette_score(&points, &result.labels).unwrap();
    assert!(score > 0.8);
}
