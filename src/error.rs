use thiserror::Error;

pub type Result<T> = std::result::Result<T, SymNmfError>;

/// クレート全体で使うエラー型
#[derive(Debug, Error)]
pub enum SymNmfError {
    #[error("failed to allocate a {rows}x{cols} matrix")]
    Allocation { rows: usize, cols: usize },
    #[error("malformed input {source_name}: {reason}")]
    InputFormat { source_name: String, reason: String },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("dimension mismatch in {op}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SymNmfError {
    pub(crate) fn input_format(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InputFormat {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
