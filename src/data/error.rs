use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the load boundary that callers may want to tell apart.
///
/// The loader wraps these in `anyhow::Error` with extra context; use
/// `err.downcast_ref::<DataError>()` to recover the variant.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("row {row}: sale amount '{value}' is not a number")]
    InvalidAmount { row: usize, value: String },
}
