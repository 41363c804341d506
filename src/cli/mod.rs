//! コマンドライン実行ファイルで共有する処理
//!
//! H の初期値はここ（呼び出し側）で作る。分解の本体は初期値を選ばない

use std::path::Path;

use ndarray::ArrayView2;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{fmt, EnvFilter};

use crate::common::matrix::{self, Matrix};
use crate::error::{Result, SymNmfError};
use crate::symnmf::SymNmfConfig;

/// 失敗時に標準出力へ出すメッセージ
pub const ERROR_MESSAGE: &str = "An Error Has Occurred";

pub const DEFAULT_SEED: u64 = 1234;

/// ログの出力先は標準エラー。標準出力は行列の出力に使う
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

// H の初期値
//
// # Arguments
// * `w`: 正規化類似度行列 (n x n)
// * `k`: クラスタ数
// * `seed`: 乱数のシード
//
// # Returns
// * 各要素を [0, 2 sqrt(mean(W) / k)) から一様に取った n x k 行列
pub fn initialize_h(w: ArrayView2<'_, f64>, k: usize, seed: u64) -> Result<Matrix> {
    let n = w.nrows();
    let mut h = matrix::allocate(n, k)?;
    let mean = w.mean().unwrap_or(0.0);
    let upper = 2.0 * (mean / k as f64).sqrt();

    // W がすべて 0 なら H も 0 のまま
    if upper > 0.0 {
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new(0.0, upper);
        h.mapv_inplace(|_| dist.sample(&mut rng));
    }
    Ok(h)
}

/// クラスタ数は 1 <= k < n
pub fn check_cluster_count(k: usize, n: usize) -> Result<()> {
    if k == 0 || k >= n {
        return Err(SymNmfError::validation(format!(
            "number of clusters must satisfy 1 <= k < {n}, got {k}"
        )));
    }
    Ok(())
}

// 設定を組み立てる。既定値 < 設定ファイル < コマンドライン引数
//
// # Arguments
// * `path`: JSON の設定ファイル
// * `max_iterations`, `epsilon`, `beta`: コマンドラインで指定された値
pub fn resolve_config(
    path: Option<&Path>,
    max_iterations: Option<usize>,
    epsilon: Option<f64>,
    beta: Option<f64>,
) -> Result<SymNmfConfig> {
    let mut config = match path {
        Some(path) => SymNmfConfig::from_json_file(path)?,
        None => SymNmfConfig::default(),
    };
    if let Some(max_iterations) = max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(epsilon) = epsilon {
        config.epsilon = epsilon;
    }
    if let Some(beta) = beta {
        config.beta = beta;
    }
    config.validate()?;
    Ok(config)
}
