use thiserror::Error;

/// Errors raised while decoding SPE files.
///
/// Every variant is fatal to the decode call that produced it. Conditions
/// the format tolerates (header extent drift, unresolved metadata
/// references) are reported through `tracing` instead.
#[derive(Error, Debug)]
pub enum SpeError {
    #[error(
        "truncated data at offset {offset}: `{field}` needs {expected} bytes, {available} available"
    )]
    TruncatedData {
        offset: usize,
        field: String,
        expected: usize,
        available: usize,
    },

    #[error("format error: {0}")]
    Format(String),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("table error: {0}")]
    Table(#[from] polars::prelude::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpeError>;
