//! 因子行列からのクラスタ割り当てと評価

pub mod kmeans;
pub mod silhouette;

use ndarray::{ArrayView2, Axis};

pub use kmeans::{kmeans, KMeansResult, DEFAULT_KMEANS_ITERATIONS};
pub use silhouette::silhouette_score;

/// H の各行で最大の列をクラスタ番号とする（同値なら小さい番号）
pub fn hard_assignments(h: ArrayView2<'_, f64>) -> Vec<usize> {
    h.axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (j, &x)| {
                    if x > best.1 {
                        (j, x)
                    } else {
                        best
                    }
                })
                .0
        })
        .collect()
}
