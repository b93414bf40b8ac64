//! File exports for an external renderer
//!
//! The categorical counts go to CSV, the correlation view to JSON. JSON has
//! no NaN, so undefined correlations are written as `null`.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{
    counts_to_frame, CategoryCount, CorrelationView, Mask, OutlierThresholds, PipelineConfig,
    QuantileMethod,
};

/// Metadata about the run that produced an export
#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    /// Cardioviz version
    pub cardioviz_version: String,
    pub input_file: String,
    pub records: usize,
    pub retained: usize,
    pub bmi_threshold: f64,
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    pub quantile_method: QuantileMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<OutlierThresholds>,
}

impl ExportMetadata {
    pub fn new(
        input_file: &Path,
        config: &PipelineConfig,
        records: usize,
        retained: usize,
        thresholds: Option<OutlierThresholds>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            cardioviz_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            records,
            retained,
            bmi_threshold: config.bmi_threshold,
            lower_quantile: config.lower_quantile,
            upper_quantile: config.upper_quantile,
            quantile_method: config.quantile_method,
            thresholds,
        }
    }
}

/// Serialized form of a correlation view
#[derive(Debug, Serialize)]
pub struct CorrelationExport<'a> {
    pub metadata: &'a ExportMetadata,
    pub labels: &'a [String],
    pub matrix: Vec<Vec<Option<f64>>>,
    pub mask: &'a Mask,
}

impl<'a> CorrelationExport<'a> {
    pub fn new(view: &'a CorrelationView, metadata: &'a ExportMetadata) -> Self {
        let matrix = view
            .matrix
            .to_rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|r| if r.is_nan() { None } else { Some(r) })
                    .collect()
            })
            .collect();

        Self {
            metadata,
            labels: view.matrix.labels(),
            matrix,
            mask: &view.mask,
        }
    }
}

/// Write category counts as CSV with columns `cardio,variable,value,total`.
pub fn export_category_counts(counts: &[CategoryCount], output_path: &Path) -> Result<()> {
    let mut df = counts_to_frame(counts).context("Failed to build category count table")?;
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", output_path.display()))?;
    Ok(())
}

/// Write the correlation view and run metadata as pretty-printed JSON.
pub fn export_correlation_view(
    view: &CorrelationView,
    metadata: &ExportMetadata,
    output_path: &Path,
) -> Result<()> {
    let export = CorrelationExport::new(view, metadata);
    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize correlation view to JSON")?;
    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON file: {}", output_path.display()))?;
    Ok(())
}
