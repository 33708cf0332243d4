use thiserror::Error;

/// Every failure the library can report.
///
/// Shape errors are programming errors in the caller, but they are returned
/// rather than panicking so a driver can report which operation was handed
/// which shapes. All checks happen before any buffer is written.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("dimension mismatch in {op}: left is {}x{}, right is {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("row slice [{start}, {end}) out of range for a matrix with {rows} rows")]
    SliceOutOfRange { start: usize, end: usize, rows: usize },

    #[error("unknown activation function '{0}' (expected sigmoid, relu or tanh)")]
    UnknownActivation(String),

    #[error("invalid network topology: {0}")]
    InvalidTopology(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;
