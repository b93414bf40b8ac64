//! Quantiles over order statistics
//!
//! For `n` sorted values and a fraction `q` in `[0, 1]` the quantile sits at
//! position `h = (n - 1) * q`. [`QuantileMethod`] decides how a fractional
//! position resolves to a value; the default `Linear` interpolates between the
//! neighbouring order statistics, as numpy and pandas do.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How a fractional quantile position resolves to a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantileMethod {
    /// Interpolate linearly between the two neighbouring values.
    #[default]
    Linear,
    /// Take the lower neighbour.
    Lower,
    /// Take the higher neighbour.
    Higher,
    /// Take the nearer neighbour, ties to the even index.
    Nearest,
    /// Average the two neighbours.
    Midpoint,
}

impl fmt::Display for QuantileMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuantileMethod::Linear => "linear",
            QuantileMethod::Lower => "lower",
            QuantileMethod::Higher => "higher",
            QuantileMethod::Nearest => "nearest",
            QuantileMethod::Midpoint => "midpoint",
        };
        f.write_str(name)
    }
}

impl FromStr for QuantileMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(QuantileMethod::Linear),
            "lower" => Ok(QuantileMethod::Lower),
            "higher" => Ok(QuantileMethod::Higher),
            "nearest" => Ok(QuantileMethod::Nearest),
            "midpoint" => Ok(QuantileMethod::Midpoint),
            other => Err(format!(
                "unknown quantile method '{}'. Options: linear, lower, higher, nearest, midpoint",
                other
            )),
        }
    }
}

/// Quantile of values already sorted in ascending order.
///
/// Returns `None` for an empty slice.
///
/// # Panics
///
/// Panics in debug builds if `q` is outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64, method: QuantileMethod) -> Option<f64> {
    debug_assert!((0.0..=1.0).contains(&q), "quantile fraction out of range: {q}");

    let n = sorted.len();
    if n == 0 {
        return None;
    }

    let h = (n - 1) as f64 * q;
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let frac = h - lower as f64;

    let value = match method {
        QuantileMethod::Linear => sorted[lower] + frac * (sorted[upper] - sorted[lower]),
        QuantileMethod::Lower => sorted[lower],
        QuantileMethod::Higher => {
            if frac > 0.0 {
                sorted[upper]
            } else {
                sorted[lower]
            }
        }
        QuantileMethod::Nearest => sorted[(h.round_ties_even() as usize).min(n - 1)],
        QuantileMethod::Midpoint => {
            if frac > 0.0 {
                (sorted[lower] + sorted[upper]) / 2.0
            } else {
                sorted[lower]
            }
        }
    };

    Some(value)
}
