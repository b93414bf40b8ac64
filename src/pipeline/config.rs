//! Pipeline configuration

use super::error::PipelineError;
use super::quantile::QuantileMethod;

/// BMI above which a record is flagged as overweight.
pub const DEFAULT_BMI_THRESHOLD: f64 = 25.0;

/// Lower quantile used for the height/weight outlier bounds.
pub const DEFAULT_LOWER_QUANTILE: f64 = 0.025;

/// Upper quantile used for the height/weight outlier bounds.
pub const DEFAULT_UPPER_QUANTILE: f64 = 0.975;

/// Tunable thresholds for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub bmi_threshold: f64,
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    pub quantile_method: QuantileMethod,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bmi_threshold: DEFAULT_BMI_THRESHOLD,
            lower_quantile: DEFAULT_LOWER_QUANTILE,
            upper_quantile: DEFAULT_UPPER_QUANTILE,
            quantile_method: QuantileMethod::Linear,
        }
    }
}

impl PipelineConfig {
    /// Check that the thresholds describe a usable run.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.bmi_threshold.is_finite() || self.bmi_threshold <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "BMI threshold must be a positive number, got {}",
                self.bmi_threshold
            )));
        }

        for (label, q) in [
            ("lower quantile", self.lower_quantile),
            ("upper quantile", self.upper_quantile),
        ] {
            if !(0.0..=1.0).contains(&q) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    label, q
                )));
            }
        }

        if self.lower_quantile > self.upper_quantile {
            return Err(PipelineError::InvalidConfig(format!(
                "lower quantile {} exceeds upper quantile {}",
                self.lower_quantile, self.upper_quantile
            )));
        }

        Ok(())
    }
}
