//! Error types for the examination pipeline.

use polars::prelude::PolarsError;
use thiserror::Error;

/// A record field that is absent or physically impossible.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A column the pipeline step reads does not exist in the table.
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    /// A cell is null or could not be read as a number.
    #[error("column '{column}' has no numeric value at row {row}")]
    MissingValue { column: String, row: usize },

    /// A cell holds a number outside the column's valid domain.
    #[error("column '{column}' has invalid value {value} at row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        value: f64,
        reason: &'static str,
    },
}

/// Errors surfaced by the pipeline to its caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "insufficient data for correlation: {rows} row(s) after filtering, at least {required} required"
    )]
    InsufficientData { rows: usize, required: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
