//! Pearson correlation matrix over the numeric columns of a table

use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;

use super::error::PipelineError;

/// Fewest rows a correlation matrix is computed from.
pub const MIN_CORRELATION_ROWS: usize = 2;

/// Square, symmetric matrix of pairwise correlations with its column labels
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    /// Column labels, in the source table's column order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Side length of the matrix.
    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Look up a correlation by column names.
    pub fn get_by_name(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.get(i, j))
    }

    /// Row-major copy of the matrix.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.dim())
            .map(|i| (0..self.dim()).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

/// Names of the primitive numeric columns, in table order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}

/// Compute the Pearson correlation matrix over every numeric column of `df`.
///
/// Each pair uses the rows where both values are present. A column with zero
/// variance gets NaN against every column, itself included. Pairs are
/// evaluated in parallel; the lower triangle mirrors the upper one.
///
/// # Errors
/// `InsufficientData` when `df` has fewer than two rows.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix, PipelineError> {
    if df.height() < MIN_CORRELATION_ROWS {
        return Err(PipelineError::InsufficientData {
            rows: df.height(),
            required: MIN_CORRELATION_ROWS,
        });
    }

    let labels = numeric_column_names(df);

    // Pre-cast all numeric columns to nullable f64 vectors
    let columns: Vec<Vec<Option<f64>>> = labels
        .iter()
        .map(|name| -> Result<Vec<Option<f64>>, PipelineError> {
            let float_col = df.column(name)?.cast(&DataType::Float64)?;
            // NaN cells count as missing, like nulls
            let values = float_col
                .f64()?
                .iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            Ok(values)
        })
        .collect::<Result<_, _>>()?;

    let n = labels.len();

    // Upper triangle, diagonal included
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i..n).map(move |j| (i, j)))
        .collect();

    let correlations: Vec<(usize, usize, f64)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let r = if i == j {
                self_correlation(&columns[i])
            } else {
                pearson_correlation(&columns[i], &columns[j])
            };
            (i, j, r)
        })
        .collect();

    let mut values = Mat::<f64>::zeros(n, n);
    for (i, j, r) in correlations {
        values[(i, j)] = r;
        values[(j, i)] = r;
    }

    Ok(CorrelationMatrix { labels, values })
}

/// 1.0 for a column with spread, NaN for a constant or near-empty one.
fn self_correlation(values: &[Option<f64>]) -> f64 {
    if pearson_correlation(values, values).is_nan() {
        f64::NAN
    } else {
        1.0
    }
}

/// Pearson correlation using Welford's single-pass update.
///
/// Rows where either value is missing or NaN are skipped. Returns NaN when fewer than
/// two complete rows remain or either side has zero variance.
pub fn pearson_correlation(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (*x, *y) {
            if x.is_nan() || y.is_nan() {
                continue;
            }
            count += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / count;
            mean_y += dy / count;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if count < MIN_CORRELATION_ROWS as f64 || var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    (cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_perfect_positive() {
        let r = pearson_correlation(&some(&[1.0, 2.0, 3.0]), &some(&[2.0, 4.0, 6.0]));
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_negative() {
        let r = pearson_correlation(&some(&[1.0, 2.0, 3.0]), &some(&[3.0, 2.0, 1.0]));
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_nan() {
        let r = pearson_correlation(&some(&[1.0, 2.0, 3.0]), &some(&[5.0, 5.0, 5.0]));
        assert!(r.is_nan());
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let xs = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let ys = vec![Some(10.0), Some(-100.0), Some(20.0), Some(30.0)];
        let r = pearson_correlation(&xs, &ys);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_cells_are_skipped() {
        let xs = some(&[1.0, 2.0, f64::NAN, 4.0, 5.0]);
        let ys = some(&[2.0, 4.0, 6.0, 8.0, 10.0]);
        assert!((pearson_correlation(&xs, &ys) - 1.0).abs() < 1e-12);
        assert_eq!(self_correlation(&xs), 1.0);
    }

    #[test]
    fn test_single_complete_row_is_nan() {
        let xs = vec![Some(1.0), None];
        let ys = vec![Some(1.0), Some(2.0)];
        assert!(pearson_correlation(&xs, &ys).is_nan());
    }

    #[test]
    fn test_self_correlation() {
        assert_eq!(self_correlation(&some(&[1.0, 4.0, 2.0])), 1.0);
        assert!(self_correlation(&some(&[7.0, 7.0])).is_nan());
    }
}
