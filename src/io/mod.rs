//! 点群の読み込みと行列の表示

pub mod format;
pub mod load;

pub use format::{format_matrix, write_matrix};
pub use load::{load_points, parse_points, PointFormat};
