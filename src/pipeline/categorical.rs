//! Long-form reshape and categorical counts split by outcome

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::columns::required_codes;
use super::error::PipelineError;

/// Binary cardiovascular-disease outcome used as the grouping key.
pub const OUTCOME: &str = "cardio";

/// Variables counted per outcome, in output order.
pub const TRACKED_VARIABLES: [&str; 6] = [
    "cholesterol",
    "gluc",
    "smoke",
    "alco",
    "active",
    "overweight",
];

/// One (record, tracked variable) pair in long form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub cardio: i64,
    pub variable: &'static str,
    pub value: i64,
}

/// Number of observations sharing an (outcome, variable, value) key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub cardio: i64,
    pub variable: String,
    pub value: i64,
    pub total: usize,
}

/// Reshape the tracked variables of a derived table into long form.
///
/// Observations are emitted variable by variable, each in row order.
pub fn melt_tracked(derived: &DataFrame) -> Result<Vec<Observation>, PipelineError> {
    let outcomes = required_codes(derived, OUTCOME)?;
    let mut observations = Vec::with_capacity(outcomes.len() * TRACKED_VARIABLES.len());

    for variable in TRACKED_VARIABLES {
        let values = required_codes(derived, variable)?;
        observations.extend(
            outcomes
                .iter()
                .zip(values)
                .map(|(&cardio, value)| Observation {
                    cardio,
                    variable,
                    value,
                }),
        );
    }

    Ok(observations)
}

/// Count observations per (outcome, variable, value).
///
/// Rows are ordered by outcome, then by position in [`TRACKED_VARIABLES`],
/// then by value. Variables outside the tracked list sort after it.
pub fn aggregate_counts(observations: &[Observation]) -> Vec<CategoryCount> {
    let rank = |variable: &str| {
        TRACKED_VARIABLES
            .iter()
            .position(|&v| v == variable)
            .unwrap_or(TRACKED_VARIABLES.len())
    };

    let mut counts: BTreeMap<(i64, usize, &str, i64), usize> = BTreeMap::new();
    for obs in observations {
        *counts
            .entry((obs.cardio, rank(obs.variable), obs.variable, obs.value))
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((cardio, _, variable, value), total)| CategoryCount {
            cardio,
            variable: variable.to_string(),
            value,
            total,
        })
        .collect()
}

/// Melt and count in one step.
pub fn categorical_summary(derived: &DataFrame) -> Result<Vec<CategoryCount>, PipelineError> {
    let observations = melt_tracked(derived)?;
    Ok(aggregate_counts(&observations))
}

/// Build a `cardio, variable, value, total` table from count rows.
pub fn counts_to_frame(counts: &[CategoryCount]) -> PolarsResult<DataFrame> {
    let cardio: Vec<i64> = counts.iter().map(|c| c.cardio).collect();
    let variable: Vec<String> = counts.iter().map(|c| c.variable.clone()).collect();
    let value: Vec<i64> = counts.iter().map(|c| c.value).collect();
    let total: Vec<u64> = counts.iter().map(|c| c.total as u64).collect();

    DataFrame::new(vec![
        Column::new("cardio".into(), cardio),
        Column::new("variable".into(), variable),
        Column::new("value".into(), value),
        Column::new("total".into(), total),
    ])
}
