//! Typed column extraction shared by the pipeline steps

use polars::prelude::*;

use super::error::{PipelineError, ValidationError};

fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, PipelineError> {
    df.column(name)
        .map_err(|_| PipelineError::from(ValidationError::MissingColumn(name.to_string())))
}

/// Read a column as nullable `f64` values. Cells that cannot be cast become `None`.
pub fn nullable_floats(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, PipelineError> {
    let float_col = lookup(df, name)?.cast(&DataType::Float64)?;
    let values = float_col.f64()?.iter().collect();
    Ok(values)
}

/// Read a column as finite `f64` values, failing on the first null or non-finite cell.
pub fn required_floats(df: &DataFrame, name: &str) -> Result<Vec<f64>, PipelineError> {
    nullable_floats(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Err(PipelineError::from(ValidationError::MissingValue {
                column: name.to_string(),
                row,
            })),
            Some(v) if !v.is_finite() => Err(PipelineError::from(ValidationError::InvalidValue {
                column: name.to_string(),
                row,
                value: v,
                reason: "value must be finite",
            })),
            Some(v) => Ok(v),
        })
        .collect()
}

/// Read a column as `i64` codes, failing on the first null or fractional cell.
pub fn required_codes(df: &DataFrame, name: &str) -> Result<Vec<i64>, PipelineError> {
    required_floats(df, name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            if value.fract() == 0.0 {
                Ok(value as i64)
            } else {
                Err(PipelineError::from(ValidationError::InvalidValue {
                    column: name.to_string(),
                    row,
                    value,
                    reason: "code must be a whole number",
                }))
            }
        })
        .collect()
}
