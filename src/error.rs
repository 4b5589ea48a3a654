//! Error taxonomy for the performance-graph pipeline.
//!
//! Nothing here is recovered or retried internally. The input data is static,
//! so every failure is either a caller mistake or a genuine data problem that
//! has to be fixed upstream.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while validating, aggregating, or rendering benchmark data.
#[derive(Debug, Error)]
pub enum Error {
    /// A database file path supplied by the caller does not exist. Reported
    /// before any query runs.
    #[error("database file '{}' not found", .0.display())]
    SourceNotFound(PathBuf),

    /// The underlying store rejected a statement or an I/O failure occurred
    /// mid-query.
    #[error("database query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// One or more validation checks failed. Carries every violation found,
    /// not just the first.
    #[error("the following violations have been found in the data:\n{}", .0.join("\n"))]
    DataQuality(Vec<String>),

    /// The caller supplied an incomplete or contradictory set of inputs.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The chart backend failed to draw or save a graph.
    #[error("failed to render graph: {0}")]
    Render(String),

    /// Failed to read or write a file outside the database.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize an aggregated report.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
