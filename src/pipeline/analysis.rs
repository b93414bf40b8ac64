//! The two read views handed to a renderer
//!
//! [`ExaminationAnalysis`] owns the derived table and the run configuration.
//! Both views are recomputed from that immutable table on request.

use polars::prelude::*;

use super::categorical::{categorical_summary, CategoryCount};
use super::config::PipelineConfig;
use super::correlation::{correlation_matrix, CorrelationMatrix};
use super::error::PipelineError;
use super::features::{derive_features, OVERWEIGHT};
use super::mask::Mask;
use super::outliers::{remove_outliers, OutlierThresholds};

/// Correlation matrix paired with its redundancy mask
#[derive(Debug, Clone)]
pub struct CorrelationView {
    pub matrix: CorrelationMatrix,
    pub mask: Mask,
}

/// Result of the outlier step, kept for reporting
#[derive(Debug, Clone)]
pub struct FilteredTable {
    pub table: DataFrame,
    pub thresholds: Option<OutlierThresholds>,
}

/// Derived examination table plus the configuration it was built with
#[derive(Debug, Clone)]
pub struct ExaminationAnalysis {
    config: PipelineConfig,
    derived: DataFrame,
}

impl ExaminationAnalysis {
    /// Validate `config` and derive features from `records`.
    pub fn new(records: &DataFrame, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let derived = derive_features(records, config.bmi_threshold)?;
        Ok(Self { config, derived })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The derived table both views are computed from.
    pub fn derived(&self) -> &DataFrame {
        &self.derived
    }

    /// Number of derived records flagged as overweight.
    pub fn overweight_count(&self) -> Result<usize, PipelineError> {
        let flags = self.derived.column(OVERWEIGHT)?.i64()?;
        Ok(flags.into_iter().flatten().filter(|&flag| flag == 1).count())
    }

    /// Counts per (cardio, tracked variable, value), in rendering order.
    pub fn categorical_summary(&self) -> Result<Vec<CategoryCount>, PipelineError> {
        categorical_summary(&self.derived)
    }

    /// Rows kept by the outlier filter, with the thresholds that were applied.
    pub fn filtered(&self) -> Result<FilteredTable, PipelineError> {
        let (table, thresholds) = remove_outliers(
            &self.derived,
            self.config.lower_quantile,
            self.config.upper_quantile,
            self.config.quantile_method,
        )?;
        Ok(FilteredTable { table, thresholds })
    }

    /// Correlation matrix of the filtered table and its matching mask.
    pub fn correlation_view(&self) -> Result<CorrelationView, PipelineError> {
        let filtered = self.filtered()?;
        correlation_view_of(&filtered.table)
    }
}

/// Correlation matrix and mask for an already filtered table.
pub fn correlation_view_of(filtered: &DataFrame) -> Result<CorrelationView, PipelineError> {
    let matrix = correlation_matrix(filtered)?;
    let mask = Mask::upper_triangle(matrix.dim());
    Ok(CorrelationView { matrix, mask })
}
