use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{Result, SymNmfError};

/// n 個の d 次元の点。読み込んだあとは変更しない
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    data: Array2<f64>,
}

impl PointSet {
    pub fn from_array(data: Array2<f64>) -> Result<Self> {
        let (n, d) = data.dim();
        if n == 0 {
            return Err(SymNmfError::validation("point set is empty"));
        }
        if d == 0 {
            return Err(SymNmfError::validation("points have zero dimensions"));
        }
        if let Some(pos) = data.iter().position(|x| !x.is_finite()) {
            return Err(SymNmfError::validation(format!(
                "non-finite coordinate at point {}, dimension {}",
                pos / d,
                pos % d
            )));
        }
        Ok(Self { data })
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let d = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(i) = rows.iter().position(|row| row.len() != d) {
            return Err(SymNmfError::validation(format!(
                "point {i} has {} coordinates, expected {d}",
                rows[i].len()
            )));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Self::from_array(Array2::from_shape_vec((n, d), flat)?)
    }

    /// 点の数
    pub fn n(&self) -> usize {
        self.data.nrows()
    }

    /// 次元
    pub fn d(&self) -> usize {
        self.data.ncols()
    }

    pub fn point(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
}
