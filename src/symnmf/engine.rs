use ndarray::{ArrayView2, Zip};
use tracing::{debug_span, info, trace};

use super::config::SymNmfConfig;
use crate::common::matrix::{self, Matrix};
use crate::error::{Result, SymNmfError};

/// 反復が止まった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// 差の二乗和が閾値を下回った
    Converged,
    /// 反復回数の上限に達した
    IterationCapped,
}

/// 分解の結果
#[derive(Debug, Clone)]
pub struct Factorization {
    pub h: Matrix,
    pub iterations: usize,
    pub termination: Termination,
    // 最後の反復での差の二乗和。一度も更新しなかった場合は 0
    pub last_delta: f64,
}

impl Factorization {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    pub fn into_factor(self) -> Matrix {
        self.h
    }
}

// H の乗法的更新を一回行う
//
// # Arguments
// * `h`: 因子行列 H (n x k)。その場で更新する
// * `w`: 正規化類似度行列 W (n x n)
// * `beta`: ブレンド係数
//
// H <- H * ((1 - beta) + beta * (W H) / (H H^T H))
pub fn update_h(h: &mut Matrix, w: ArrayView2<'_, f64>, beta: f64) -> Result<()> {
    let wh = matrix::multiply(w, h.view())?;
    let h_t = matrix::transpose(h.view())?;
    let hht = matrix::multiply(h.view(), h_t.view())?;
    let hhth = matrix::multiply(hht.view(), h.view())?;

    Zip::from(h).and(&wh).and(&hhth).for_each(|x, &num, &den| {
        // 分母がちょうど 0 のときは 1 で割る
        let den = if den != 0.0 { den } else { 1.0 };
        *x *= (1.0 - beta) + beta * num / den;
    });
    Ok(())
}

// 対称非負値行列因子分解
//
// # Arguments
// * `w`: 正規化類似度行列 W (n x n)、非負
// * `h`: 初期値 H (n x k)、非負
// * `config`: 反復回数・閾値・ブレンド係数
//
// # Returns
// * 収束した（または上限に達した）H と反復の情報
pub fn factorize(w: ArrayView2<'_, f64>, h: Matrix, config: &SymNmfConfig) -> Result<Factorization> {
    config.validate()?;
    validate_inputs(w, h.view())?;
    let (n, k) = h.dim();
    let _span = debug_span!("symnmf", n, k).entered();

    let mut h = h;
    let mut last_delta = 0.0;
    for iteration in 1..=config.max_iterations {
        let snapshot = matrix::duplicate(h.view())?;
        update_h(&mut h, w, config.beta)?;
        last_delta = matrix::frobenius_delta(snapshot.view(), h.view())?;
        trace!(iteration, delta = last_delta, "updated H");

        if last_delta < config.epsilon {
            info!(iterations = iteration, delta = last_delta, "symnmf converged");
            return Ok(Factorization {
                h,
                iterations: iteration,
                termination: Termination::Converged,
                last_delta,
            });
        }
    }

    info!(
        iterations = config.max_iterations,
        delta = last_delta,
        "symnmf reached the iteration cap"
    );
    Ok(Factorization {
        h,
        iterations: config.max_iterations,
        termination: Termination::IterationCapped,
        last_delta,
    })
}

fn validate_inputs(w: ArrayView2<'_, f64>, h: ArrayView2<'_, f64>) -> Result<()> {
    let (n, k) = h.dim();
    if w.dim() != (n, n) {
        return Err(SymNmfError::validation(format!(
            "W must be {n}x{n} to match H ({n}x{k}), got {}x{}",
            w.nrows(),
            w.ncols()
        )));
    }
    if k == 0 {
        return Err(SymNmfError::validation("H must have at least one column"));
    }
    if w.iter().any(|x| !x.is_finite() || *x < 0.0) {
        return Err(SymNmfError::validation("W must be finite and non-negative"));
    }
    if h.iter().any(|x| !x.is_finite() || *x < 0.0) {
        return Err(SymNmfError::validation("initial H must be finite and non-negative"));
    }
    Ok(())
}
