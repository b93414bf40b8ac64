//! Derived features: overweight flag and binarized lab levels

use polars::prelude::*;

use super::columns::required_floats;
use super::error::{PipelineError, ValidationError};

/// Name of the derived overweight column appended to the table.
pub const OVERWEIGHT: &str = "overweight";

/// Ordinal lab columns rewritten to 0/1.
pub const BINARIZED_LEVELS: [&str; 2] = ["cholesterol", "gluc"];

/// Recorded lab levels: 1 normal, 2 above normal, 3 well above normal.
pub const LAB_LEVELS: [f64; 3] = [1.0, 2.0, 3.0];

/// Body-mass index from height in centimetres and weight in kilograms.
#[inline]
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// 1 when the BMI strictly exceeds `threshold`, otherwise 0.
#[inline]
pub fn is_overweight(height_cm: f64, weight_kg: f64, threshold: f64) -> i64 {
    i64::from(body_mass_index(height_cm, weight_kg) > threshold)
}

/// Collapse a 1/2/3 lab level to 0 (normal) or 1 (above normal).
///
/// Lossy: levels 2 and 3 both map to 1.
#[inline]
pub fn binarize_level(level: f64) -> i64 {
    i64::from(level > 1.0)
}

/// Derive the analysis table from raw examination records.
///
/// Returns a new table with `cholesterol`/`gluc` binarized and `overweight`
/// appended as the last column. The input is left untouched.
///
/// # Errors
/// `ValidationError` when `height`, `weight`, `cholesterol` or `gluc` is
/// missing, holds a null or non-finite cell, when a height is not positive, or
/// when a lab level is not 1, 2 or 3.
pub fn derive_features(records: &DataFrame, bmi_threshold: f64) -> Result<DataFrame, PipelineError> {
    let heights = required_floats(records, "height")?;
    let weights = required_floats(records, "weight")?;

    if let Some((row, &height)) = heights.iter().enumerate().find(|&(_, &h)| h <= 0.0) {
        return Err(ValidationError::InvalidValue {
            column: "height".to_string(),
            row,
            value: height,
            reason: "height must be positive",
        }
        .into());
    }

    let overweight: Vec<i64> = heights
        .iter()
        .zip(weights.iter())
        .map(|(&h, &w)| is_overweight(h, w, bmi_threshold))
        .collect();

    let mut derived = records.clone();
    for name in BINARIZED_LEVELS {
        let raw = required_floats(records, name)?;
        if let Some((row, &level)) = raw
            .iter()
            .enumerate()
            .find(|&(_, level)| !LAB_LEVELS.contains(level))
        {
            return Err(ValidationError::InvalidValue {
                column: name.to_string(),
                row,
                value: level,
                reason: "lab level must be 1, 2 or 3",
            }
            .into());
        }
        let levels: Vec<i64> = raw.into_iter().map(binarize_level).collect();
        derived.with_column(Column::new(name.into(), levels))?;
    }
    derived.with_column(Column::new(OVERWEIGHT.into(), overweight))?;

    Ok(derived)
}
