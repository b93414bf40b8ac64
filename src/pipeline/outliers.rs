//! Outlier removal for the correlation view
//!
//! Height and weight bounds are computed once over the whole derived table.
//! Every row is then tested against the combined predicate in a single pass,
//! so dropping one row never moves the bounds applied to another.

use polars::prelude::*;
use serde::Serialize;

use super::columns::{nullable_floats, required_floats};
use super::error::PipelineError;
use super::quantile::{quantile_sorted, QuantileMethod};

/// Inclusive `[low, high]` range for one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    /// Quantile bounds over `values`, or `None` when `values` is empty.
    pub fn from_quantiles(
        values: &[f64],
        lower_q: f64,
        upper_q: f64,
        method: QuantileMethod,
    ) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            low: quantile_sorted(&sorted, lower_q, method)?,
            high: quantile_sorted(&sorted, upper_q, method)?,
        })
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Bounds fixed before any row is dropped
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierThresholds {
    pub height: Bounds,
    pub weight: Bounds,
}

impl OutlierThresholds {
    /// Compute height and weight bounds over the unfiltered derived table.
    ///
    /// Returns `Ok(None)` for an empty table, where no quantile exists.
    pub fn compute(
        derived: &DataFrame,
        lower_q: f64,
        upper_q: f64,
        method: QuantileMethod,
    ) -> Result<Option<Self>, PipelineError> {
        let heights = required_floats(derived, "height")?;
        let weights = required_floats(derived, "weight")?;

        let thresholds = Bounds::from_quantiles(&heights, lower_q, upper_q, method)
            .zip(Bounds::from_quantiles(&weights, lower_q, upper_q, method))
            .map(|(height, weight)| Self { height, weight });

        Ok(thresholds)
    }

    /// The combined row predicate. A missing blood pressure reading fails it.
    pub fn matches(&self, ap_hi: Option<f64>, ap_lo: Option<f64>, height: f64, weight: f64) -> bool {
        let pressure_ok = matches!((ap_hi, ap_lo), (Some(hi), Some(lo)) if lo <= hi);
        pressure_ok && self.height.contains(height) && self.weight.contains(weight)
    }
}

/// Evaluate the combined predicate for every row, in row order.
pub fn outlier_mask(derived: &DataFrame, thresholds: &OutlierThresholds) -> Result<Vec<bool>, PipelineError> {
    let ap_hi = nullable_floats(derived, "ap_hi")?;
    let ap_lo = nullable_floats(derived, "ap_lo")?;
    let heights = required_floats(derived, "height")?;
    let weights = required_floats(derived, "weight")?;

    let keep = ap_hi
        .iter()
        .zip(ap_lo.iter())
        .zip(heights.iter().zip(weights.iter()))
        .map(|((&hi, &lo), (&h, &w))| thresholds.matches(hi, lo, h, w))
        .collect();

    Ok(keep)
}

/// Keep the rows that satisfy the combined predicate, preserving their order.
pub fn filter_outliers(derived: &DataFrame, thresholds: &OutlierThresholds) -> Result<DataFrame, PipelineError> {
    let keep = outlier_mask(derived, thresholds)?;
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(derived.filter(&mask)?)
}

/// Compute thresholds over `derived` and filter it in one call.
///
/// An empty table has no thresholds and filters to an empty table.
pub fn remove_outliers(
    derived: &DataFrame,
    lower_q: f64,
    upper_q: f64,
    method: QuantileMethod,
) -> Result<(DataFrame, Option<OutlierThresholds>), PipelineError> {
    match OutlierThresholds::compute(derived, lower_q, upper_q, method)? {
        Some(thresholds) => Ok((filter_outliers(derived, &thresholds)?, Some(thresholds))),
        None => Ok((derived.clear(), None)),
    }
}
