//! ホスト側の「リストのリスト」表現との変換
//!
//! どの関数も計算の前に宣言された次元と実際の形が一致するか確かめる

use ndarray::ArrayView2;

use crate::common::matrix::{self, Matrix};
use crate::error::{Result, SymNmfError};
use crate::graph;
use crate::points::PointSet;
use crate::symnmf::{self, SymNmfConfig};

/// ホスト側の行列表現
pub type HostMatrix = Vec<Vec<f64>>;

// リストのリストを行列に変換する
//
// # Arguments
// * `rows`: ホスト側の行列
// * `nrows`, `ncols`: 呼び出し側が宣言した次元
// * `name`: エラーメッセージ用の名前
pub fn to_matrix(rows: &[Vec<f64>], nrows: usize, ncols: usize, name: &str) -> Result<Matrix> {
    if rows.len() != nrows {
        return Err(SymNmfError::validation(format!(
            "{name}: declared {nrows} rows, got {}",
            rows.len()
        )));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != ncols) {
        return Err(SymNmfError::validation(format!(
            "{name}: row {i} has {} columns, declared {ncols}",
            row.len()
        )));
    }

    let mut m = matrix::allocate(nrows, ncols)?;
    for (mut dst, src) in m.rows_mut().into_iter().zip(rows) {
        for (x, &v) in dst.iter_mut().zip(src) {
            *x = v;
        }
    }
    Ok(m)
}

pub fn to_host(m: ArrayView2<'_, f64>) -> HostMatrix {
    m.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn to_points(data: &[Vec<f64>], n: usize, d: usize) -> Result<PointSet> {
    PointSet::from_array(to_matrix(data, n, d, "data")?)
}

/// 類似度行列
pub fn sym(data: &[Vec<f64>], n: usize, d: usize) -> Result<HostMatrix> {
    let points = to_points(data, n, d)?;
    let a = graph::build_affinity(&points)?;
    Ok(to_host(a.view()))
}

/// 次数行列
pub fn ddg(data: &[Vec<f64>], n: usize, d: usize) -> Result<HostMatrix> {
    let points = to_points(data, n, d)?;
    let a = graph::build_affinity(&points)?;
    let ddg = graph::build_degree(a.view())?;
    Ok(to_host(ddg.view()))
}

/// 点群から正規化類似度行列
pub fn norm(data: &[Vec<f64>], n: usize, d: usize) -> Result<HostMatrix> {
    let points = to_points(data, n, d)?;
    let w = graph::normalized_affinity(&points)?;
    Ok(to_host(w.view()))
}

/// 計算済みの類似度行列と次数行列から正規化類似度行列
pub fn norm_from(a: &[Vec<f64>], ddg: &[Vec<f64>], n: usize) -> Result<HostMatrix> {
    let a = to_matrix(a, n, n, "affinity")?;
    let ddg = to_matrix(ddg, n, n, "degree")?;
    let w = graph::build_normalized(a.view(), ddg.view())?;
    Ok(to_host(w.view()))
}

// SymNMF
//
// # Arguments
// * `w`: 正規化類似度行列 (n x n)
// * `h`: H の初期値 (n x k)
// * `config`: 反復の設定
//
// # Returns
// * 最終的な H (n x k)
pub fn symnmf(
    w: &[Vec<f64>],
    h: &[Vec<f64>],
    n: usize,
    k: usize,
    config: &SymNmfConfig,
) -> Result<HostMatrix> {
    let w = to_matrix(w, n, n, "W")?;
    let h = to_matrix(h, n, k, "H")?;
    let h = symnmf::factorize(w.view(), h, config)?.into_factor();
    Ok(to_host(h.view()))
}
