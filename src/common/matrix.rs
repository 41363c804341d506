use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis, Zip};

use crate::error::{Result, SymNmfError};

/// 密行列。確保した領域は値のドロップ時に解放される
pub type Matrix = Array2<f64>;

// ゼロ初期化された行列を確保する
//
// # Arguments
// * `rows`: 行数
// * `cols`: 列数
//
// # Returns
// * `rows x cols` のゼロ行列。メモリが確保できない場合は `Allocation`
pub fn allocate(rows: usize, cols: usize) -> Result<Matrix> {
    let len = rows
        .checked_mul(cols)
        .ok_or(SymNmfError::Allocation { rows, cols })?;
    let mut buf: Vec<f64> = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| SymNmfError::Allocation { rows, cols })?;
    buf.resize(len, 0.0);
    Ok(Array2::from_shape_vec((rows, cols), buf)?)
}

/// `src` と同じ内容の行列を新しく確保する
pub fn duplicate(src: ArrayView2<'_, f64>) -> Result<Matrix> {
    let mut dst = allocate(src.nrows(), src.ncols())?;
    dst.assign(&src);
    Ok(dst)
}

// 行列積 C = A B
//
// # Arguments
// * `a`: m x n 行列
// * `b`: n x p 行列
//
// # Returns
// * `c`: m x p 行列
//
// 出力の行ごとに並列化する。各要素は内側の添字の昇順に足し込むので、
// 逐次の三重ループと同じ結果になる
pub fn multiply(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<Matrix> {
    if a.ncols() != b.nrows() {
        return Err(SymNmfError::DimensionMismatch {
            op: "multiply",
            lhs: a.dim(),
            rhs: b.dim(),
        });
    }
    let mut c = allocate(a.nrows(), b.ncols())?;

    c.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(a.axis_iter(Axis(0)))
        .for_each(|(mut c_row, a_row)| {
            for (inner, &a_ik) in a_row.iter().enumerate() {
                c_row.scaled_add(a_ik, &b.row(inner));
            }
        });

    Ok(c)
}

/// 転置行列を新しく確保して返す
pub fn transpose(a: ArrayView2<'_, f64>) -> Result<Matrix> {
    let mut t = allocate(a.ncols(), a.nrows())?;
    t.assign(&a.t());
    Ok(t)
}

/// 二点間のユークリッド距離の二乗
pub fn squared_euclidean_distance(u: ArrayView1<'_, f64>, v: ArrayView1<'_, f64>) -> f64 {
    u.iter()
        .zip(v.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}

// 要素ごとの差の二乗和
//
// 平方根は取らない。収束判定の閾値はこの二乗和に対して決めてある
pub fn frobenius_delta(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Result<f64> {
    if a.dim() != b.dim() {
        return Err(SymNmfError::DimensionMismatch {
            op: "frobenius_delta",
            lhs: a.dim(),
            rhs: b.dim(),
        });
    }
    let mut sum = 0.0;
    Zip::from(&a).and(&b).for_each(|&x, &y| {
        sum += (x - y) * (x - y);
    });
    Ok(sum)
}

/// 対称行列かどうか（許容誤差 `tol`）
pub fn is_symmetric(a: ArrayView2<'_, f64>, tol: f64) -> bool {
    let n = a.nrows();
    if n != a.ncols() {
        return false;
    }
    (0..n).all(|i| (i + 1..n).all(|j| (a[[i, j]] - a[[j, i]]).abs() <= tol))
}
