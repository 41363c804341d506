//! 点群から類似度グラフを作る
//!
//! `A`（類似度行列）、`D`（次数行列）、`W = D^{-1/2} A D^{-1/2}`（正規化類似度行列）

use ndarray::ArrayView2;
use tracing::debug;

use crate::common::matrix::{self, Matrix};
use crate::error::{Result, SymNmfError};
use crate::points::PointSet;

/// これ以下の次数は孤立点とみなして閾値に置き換える
pub const DEGREE_THRESHOLD: f64 = 1e-10;

// 類似度行列
//
// # Arguments
// * `points`: n 個の d 次元の点
//
// # Returns
// * `a`: A[i][j] = exp(-||x_i - x_j||^2 / 2)、対角成分は 0
pub fn build_affinity(points: &PointSet) -> Result<Matrix> {
    let n = points.n();
    debug!(n, d = points.d(), "building affinity matrix");
    let mut a = matrix::allocate(n, n)?;

    // 上三角だけ計算して対称に書き込む
    for i in 0..n {
        for j in (i + 1)..n {
            let dist = matrix::squared_euclidean_distance(points.point(i), points.point(j));
            let value = (-dist / 2.0).exp();
            a[[i, j]] = value;
            a[[j, i]] = value;
        }
    }
    Ok(a)
}

// 次数行列
//
// # Arguments
// * `a`: 類似度行列 (n x n)
//
// # Returns
// * `d`: 対角成分に A の行和を持つ対角行列
pub fn build_degree(a: ArrayView2<'_, f64>) -> Result<Matrix> {
    let n = ensure_square("build_degree", a)?;
    debug!(n, "building degree matrix");
    let mut d = matrix::allocate(n, n)?;

    for i in 0..n {
        d[[i, i]] = a.row(i).sum();
    }
    Ok(d)
}

// 正規化類似度行列
//
// # Arguments
// * `a`: 類似度行列 (n x n)
// * `d`: 次数行列 (n x n)
//
// # Returns
// * `w`: D^{-1/2} A D^{-1/2}
pub fn build_normalized(a: ArrayView2<'_, f64>, d: ArrayView2<'_, f64>) -> Result<Matrix> {
    let n = ensure_square("build_normalized", a)?;
    if d.dim() != a.dim() {
        return Err(SymNmfError::DimensionMismatch {
            op: "build_normalized",
            lhs: a.dim(),
            rhs: d.dim(),
        });
    }

    // ステップ 1: D^{-1/2} を計算
    let mut d_inv_sqrt = matrix::allocate(n, n)?;
    let mut clamped = 0usize;
    for i in 0..n {
        let mut degree = d[[i, i]];
        if degree <= DEGREE_THRESHOLD {
            degree = DEGREE_THRESHOLD;
            clamped += 1;
        }
        d_inv_sqrt[[i, i]] = 1.0 / degree.sqrt();
    }
    if clamped > 0 {
        debug!(clamped, "degrees at or below threshold were clamped");
    }

    // ステップ 2: W = D^{-1/2} A D^{-1/2}
    let left = matrix::multiply(d_inv_sqrt.view(), a)?;
    let w = matrix::multiply(left.view(), d_inv_sqrt.view())?;
    debug!(n, "built normalized affinity matrix");
    Ok(w)
}

/// 点群から A, D, W を順に作って W を返す
pub fn normalized_affinity(points: &PointSet) -> Result<Matrix> {
    let a = build_affinity(points)?;
    let d = build_degree(a.view())?;
    build_normalized(a.view(), d.view())
}

fn ensure_square(op: &'static str, m: ArrayView2<'_, f64>) -> Result<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(SymNmfError::validation(format!(
            "{op}: expected a square matrix, got {rows}x{cols}"
        )));
    }
    Ok(rows)
}
