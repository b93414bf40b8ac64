//! Run summary and category count tables

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{CategoryCount, CorrelationView, OutlierThresholds, TRACKED_VARIABLES};

/// Metrics collected while the pipeline runs
#[derive(Debug, Default)]
pub struct RunSummary {
    pub records: usize,
    pub overweight: usize,
    pub retained: usize,
    pub thresholds: Option<OutlierThresholds>,
    pub correlation_columns: usize,
    pub undefined_columns: Vec<String>,
    pub load_time: Duration,
    pub analysis_time: Duration,
    pub export_time: Option<Duration>,
}

impl RunSummary {
    pub fn new(records: usize) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Record the correlation view's size and its constant columns.
    pub fn set_correlation(&mut self, view: &CorrelationView) {
        let matrix = &view.matrix;
        self.correlation_columns = matrix.dim();
        self.undefined_columns = (0..matrix.dim())
            .filter(|&i| matrix.get(i, i).is_nan())
            .map(|i| matrix.labels()[i].clone())
            .collect();
    }

    pub fn dropped(&self) -> usize {
        self.records.saturating_sub(self.retained)
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Records"), Cell::new(self.records)]);
        table.add_row(vec![
            Cell::new("⚖️  Overweight"),
            Cell::new(self.overweight).fg(Color::Yellow),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (Outliers)"),
            Cell::new(self.dropped()).fg(if self.dropped() == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Retained"),
            Cell::new(self.retained)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        if let Some(t) = &self.thresholds {
            table.add_row(vec![
                Cell::new("📏 Height range"),
                Cell::new(format!("{:.2} – {:.2}", t.height.low, t.height.high)),
            ]);
            table.add_row(vec![
                Cell::new("📏 Weight range"),
                Cell::new(format!("{:.2} – {:.2}", t.weight.low, t.weight.high)),
            ]);
        }

        table.add_row(vec![
            Cell::new("🔗 Correlation columns"),
            Cell::new(self.correlation_columns),
        ]);

        let mut timing = format!(
            "load {:.2}s, analysis {:.2}s",
            self.load_time.as_secs_f64(),
            self.analysis_time.as_secs_f64()
        );
        if let Some(export) = self.export_time {
            timing.push_str(&format!(", export {:.2}s", export.as_secs_f64()));
        }
        table.add_row(vec![Cell::new("⏱️  Time"), Cell::new(timing)]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.undefined_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Constant columns (NaN correlation)").yellow(),
                style(format!("({})", self.undefined_columns.len())).dim()
            );
            for name in &self.undefined_columns {
                println!("        {} {}", style("•").dim(), name);
            }
        }
    }
}

/// Render counts as one row per (cardio, variable) with a column per value.
pub fn category_table(counts: &[CategoryCount]) -> Table {
    let mut values: Vec<i64> = counts.iter().map(|c| c.value).collect();
    values.sort_unstable();
    values.dedup();

    let mut header = vec![
        Cell::new("cardio").add_attribute(Attribute::Bold),
        Cell::new("variable").add_attribute(Attribute::Bold),
    ];
    header.extend(
        values
            .iter()
            .map(|v| Cell::new(format!("value={}", v)).add_attribute(Attribute::Bold)),
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header);

    let mut outcomes: Vec<i64> = counts.iter().map(|c| c.cardio).collect();
    outcomes.dedup();

    for cardio in outcomes {
        for variable in TRACKED_VARIABLES {
            let row_counts: Vec<&CategoryCount> = counts
                .iter()
                .filter(|c| c.cardio == cardio && c.variable == variable)
                .collect();
            if row_counts.is_empty() {
                continue;
            }

            let mut row = vec![Cell::new(cardio), Cell::new(variable)];
            row.extend(values.iter().map(|v| {
                let total = row_counts
                    .iter()
                    .find(|c| c.value == *v)
                    .map_or(0, |c| c.total);
                Cell::new(total).set_alignment(CellAlignment::Right)
            }));
            table.add_row(row);
        }
    }

    table
}

/// Print the category count table, indented like the run summary.
pub fn display_category_counts(counts: &[CategoryCount]) {
    println!();
    println!(
        "    {} {}",
        style("📊").cyan(),
        style("CATEGORY COUNTS BY OUTCOME").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());

    if counts.is_empty() {
        println!("      {}", style("No records to count").dim());
        return;
    }

    for line in category_table(counts).to_string().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(cardio: i64, variable: &str, value: i64, total: usize) -> CategoryCount {
        CategoryCount {
            cardio,
            variable: variable.to_string(),
            value,
            total,
        }
    }

    #[test]
    fn test_category_table_pivots_values() {
        let counts = vec![
            count(0, "cholesterol", 0, 3),
            count(0, "cholesterol", 1, 1),
            count(1, "smoke", 1, 2),
        ];
        let rendered = category_table(&counts).to_string();
        assert!(rendered.contains("value=0"));
        assert!(rendered.contains("value=1"));
        assert!(rendered.contains("cholesterol"));
        assert!(rendered.contains("smoke"));
    }

    #[test]
    fn test_dropped_never_underflows() {
        let summary = RunSummary {
            records: 2,
            retained: 5,
            ..Default::default()
        };
        assert_eq!(summary.dropped(), 0);
    }
}
