//! 対称非負値行列因子分解 (SymNMF)
//!
//! W ≈ H H^T となる非負の H を乗法的更新で求める

pub mod config;
pub mod engine;

pub use config::SymNmfConfig;
pub use engine::{factorize, update_h, Factorization, Termination};
