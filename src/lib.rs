//! 点群から類似度グラフを作り、正規化類似度行列 W を W ≈ H H^T と
//! 非負値分解する (SymNMF)。H の各行はソフトなクラスタ所属度になる
//!
//! ```no_run
//! use symnmf::{graph, io, symnmf::{factorize, SymNmfConfig}};
//!
//! let points = io::load_points("input.txt")?;
//! let w = graph::normalized_affinity(&points)?;
//! let h0 = ndarray::Array2::from_elem((points.n(), 2), 0.5);
//! let result = factorize(w.view(), h0, &SymNmfConfig::default())?;
//! print!("{}", io::format_matrix(result.h.view()));
//! # Ok::<(), symnmf::SymNmfError>(())
//! ```

pub mod bindings;
pub mod cli;
pub mod cluster;
pub mod common;
pub mod error;
pub mod graph;
pub mod io;
pub mod points;
pub mod symnmf;

pub use common::Matrix;
pub use error::{Result, SymNmfError};
pub use points::PointSet;
