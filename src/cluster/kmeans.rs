use ndarray::{Array2, ArrayView2, Axis};
use tracing::debug;

use crate::common::matrix::squared_euclidean_distance;
use crate::error::{Result, SymNmfError};
use crate::points::PointSet;

/// 重心の移動量がこれより小さければ収束とみなす
pub const KMEANS_EPSILON: f64 = 1e-4;

pub const DEFAULT_KMEANS_ITERATIONS: usize = 300;

#[derive(Debug, Clone)]
pub struct KMeansResult {
    // k x d
    pub centroids: Array2<f64>,
    pub labels: Vec<usize>,
    pub iterations: usize,
}

// k-means（Lloyd 法）
//
// # Arguments
// * `points`: 点群
// * `k`: クラスタ数 (1 < k < n)
// * `max_iter`: 反復回数の上限
//
// 初期重心は先頭の k 点。空になったクラスタは前の重心を保つ
pub fn kmeans(points: &PointSet, k: usize, max_iter: usize) -> Result<KMeansResult> {
    let n = points.n();
    if !(1 < k && k < n) {
        return Err(SymNmfError::validation(format!(
            "number of clusters must satisfy 1 < k < {n}, got {k}"
        )));
    }

    let data = points.view();
    let mut centroids = data.slice(ndarray::s![..k, ..]).to_owned();
    let mut labels = assign(data, centroids.view());
    let mut iterations = 0;

    while iterations < max_iter {
        iterations += 1;
        let updated = recompute(data, &labels, centroids.view());
        let max_shift = centroids
            .axis_iter(Axis(0))
            .zip(updated.axis_iter(Axis(0)))
            .map(|(old, new)| squared_euclidean_distance(old, new).sqrt())
            .fold(0.0, f64::max);
        centroids = updated;
        labels = assign(data, centroids.view());
        if max_shift < KMEANS_EPSILON {
            break;
        }
    }
    debug!(k, iterations, "kmeans finished");

    Ok(KMeansResult {
        centroids,
        labels,
        iterations,
    })
}

fn assign(data: ArrayView2<'_, f64>, centroids: ArrayView2<'_, f64>) -> Vec<usize> {
    data.axis_iter(Axis(0))
        .map(|point| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (c, centroid) in centroids.axis_iter(Axis(0)).enumerate() {
                let dist = squared_euclidean_distance(point, centroid);
                if dist < best_dist {
                    best = c;
                    best_dist = dist;
                }
            }
            best
        })
        .collect()
}

fn recompute(data: ArrayView2<'_, f64>, labels: &[usize], previous: ArrayView2<'_, f64>) -> Array2<f64> {
    let mut sums = Array2::<f64>::zeros(previous.raw_dim());
    let mut counts = vec![0usize; previous.nrows()];
    for (point, &label) in data.axis_iter(Axis(0)).zip(labels) {
        let mut row = sums.row_mut(label);
        row += &point;
        counts[label] += 1;
    }
    for (c, &count) in counts.iter().enumerate() {
        if count == 0 {
            sums.row_mut(c).assign(&previous.row(c));
        } else {
            sums.row_mut(c).mapv_inplace(|x| x / count as f64);
        }
    }
    sums
}
