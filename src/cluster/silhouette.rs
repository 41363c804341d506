use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::common::matrix::squared_euclidean_distance;
use crate::error::{Result, SymNmfError};
use crate::points::PointSet;

// シルエット係数の平均
//
// # Arguments
// * `points`: 点群 (n 点)
// * `labels`: 各点のクラスタ番号
//
// # Returns
// * s(i) = (b - a) / max(a, b) の平均。要素が 1 つのクラスタに属する点は 0
pub fn silhouette_score(points: &PointSet, labels: &[usize]) -> Result<f64> {
    let n = points.n();
    if labels.len() != n {
        return Err(SymNmfError::validation(format!(
            "expected {n} labels, got {}",
            labels.len()
        )));
    }

    // ラベルを 0..c に詰め直す
    let mut compact = BTreeMap::new();
    for &label in labels {
        let next = compact.len();
        compact.entry(label).or_insert(next);
    }
    let n_clusters = compact.len();
    if n_clusters < 2 || n_clusters > n - 1 {
        return Err(SymNmfError::validation(format!(
            "silhouette needs 2..={} distinct labels, got {n_clusters}",
            n.saturating_sub(1)
        )));
    }
    let ids: Vec<usize> = labels.iter().map(|label| compact[label]).collect();
    let mut sizes = vec![0usize; n_clusters];
    for &c in &ids {
        sizes[c] += 1;
    }

    let scores: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|i| {
            let own = ids[i];
            if sizes[own] == 1 {
                return 0.0;
            }
            let mut sums = vec![0.0f64; n_clusters];
            for j in 0..n {
                if i != j {
                    sums[ids[j]] += squared_euclidean_distance(points.point(i), points.point(j)).sqrt();
                }
            }
            let a = sums[own] / (sizes[own] - 1) as f64;
            let b = (0..n_clusters)
                .filter(|&c| c != own)
                .map(|c| sums[c] / sizes[c] as f64)
                .fold(f64::INFINITY, f64::min);
            let denom = a.max(b);
            if denom > 0.0 {
                (b - a) / denom
            } else {
                0.0
            }
        })
        .collect();

    Ok(scores.iter().sum::<f64>() / n as f64)
}
