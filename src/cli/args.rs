//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{
    PipelineConfig, QuantileMethod, DEFAULT_BMI_THRESHOLD, DEFAULT_LOWER_QUANTILE,
    DEFAULT_UPPER_QUANTILE,
};

/// Cardioviz - Categorical counts and correlation views for cardiovascular examination data
#[derive(Parser, Debug)]
#[command(name = "cardioviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory for the exported views.
    /// Defaults to the directory of the input file.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// BMI above which a record is flagged as overweight
    #[arg(long, default_value_t = DEFAULT_BMI_THRESHOLD, value_parser = validate_bmi_threshold)]
    pub bmi_threshold: f64,

    /// Lower quantile for the height/weight outlier bounds (0.0 to 1.0)
    #[arg(long, default_value_t = DEFAULT_LOWER_QUANTILE, value_parser = validate_quantile)]
    pub lower_quantile: f64,

    /// Upper quantile for the height/weight outlier bounds (0.0 to 1.0)
    #[arg(long, default_value_t = DEFAULT_UPPER_QUANTILE, value_parser = validate_quantile)]
    pub upper_quantile: f64,

    /// How quantile positions between two values are resolved.
    /// Options: "linear" (default), "lower", "higher", "nearest", "midpoint"
    #[arg(long, default_value = "linear")]
    pub quantile_method: QuantileMethod,

    /// Columns to drop before processing (comma-separated), e.g. identifiers
    /// that should not appear in the correlation matrix.
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Print the summary only, without writing export files
    #[arg(long, default_value = "false")]
    pub no_export: bool,
}

impl Cli {
    /// Pipeline configuration from the parsed arguments.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            bmi_threshold: self.bmi_threshold,
            lower_quantile: self.lower_quantile,
            upper_quantile: self.upper_quantile,
            quantile_method: self.quantile_method,
        }
    }

    /// Directory the exports are written to: `--output-dir`, else the input's directory.
    pub fn export_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf()
        })
    }

    fn output_file(&self, suffix: &str) -> PathBuf {
        let dir = self.export_dir();
        let stem = self
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        dir.join(format!("{}_{}", stem, suffix))
    }

    /// Path of the category count CSV, e.g. `data.csv` → `data_categorical.csv`.
    pub fn categorical_path(&self) -> PathBuf {
        self.output_file("categorical.csv")
    }

    /// Path of the correlation view JSON, e.g. `data.csv` → `data_correlation.json`.
    pub fn correlation_path(&self) -> PathBuf {
        self.output_file("correlation.json")
    }
}

/// Validator for quantile fractions
fn validate_quantile(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("quantile must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the BMI threshold
fn validate_bmi_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!("bmi_threshold must be a positive number, got {}", value))
    } else {
        Ok(value)
    }
}
