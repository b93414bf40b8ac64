//! Cardioviz: Cardiovascular Examination Analysis CLI
//!
//! Loads examination records, derives features, and writes the categorical
//! count and correlation views for an external renderer.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use cardioviz::cli::Cli;
use cardioviz::pipeline::{
    correlation_view_of, estimated_size_mb, load_dataset, ExaminationAnalysis, PipelineError,
};
use cardioviz::report::{
    display_category_counts, export_category_counts, export_correlation_view, ExportMetadata,
    RunSummary,
};
use cardioviz::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.pipeline_config();
    let output_dir = if cli.no_export {
        None
    } else {
        Some(cli.export_dir())
    };

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, output_dir.as_deref(), &config);

    // Step 1: Load dataset
    print_step_header(1, "Load Records");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let mut records = load_dataset(&cli.input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    if !cli.drop_columns.is_empty() {
        let present: Vec<String> = records
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (to_drop, unknown): (Vec<String>, Vec<String>) = cli
            .drop_columns
            .iter()
            .cloned()
            .partition(|name| present.contains(name));
        if !unknown.is_empty() {
            print_warning(&format!("Columns not found, not dropped: {}", unknown.join(", ")));
        }
        if !to_drop.is_empty() {
            records = records.drop_many(to_drop.iter().map(|s| s.as_str()));
            print_count("column(s) dropped before analysis", to_drop.len(), None);
        }
    }

    let (rows, cols) = records.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", estimated_size_mb(&records));

    let mut summary = RunSummary::new(rows);
    summary.load_time = step_start.elapsed();
    print_step_time(summary.load_time);

    // Step 2: Feature derivation
    print_step_header(2, "Derive Features");

    let analysis_start = Instant::now();
    let analysis = ExaminationAnalysis::new(&records, config)
        .with_context(|| format!("Feature derivation failed for {}", cli.input.display()))?;
    summary.overweight = analysis.overweight_count()?;
    print_success("Derived overweight flag and binarized cholesterol/gluc");
    print_count(
        "overweight record(s)",
        summary.overweight,
        Some(&format!("(BMI > {:.1})", config.bmi_threshold)),
    );

    // Step 3: Categorical counts
    print_step_header(3, "Categorical Counts");

    let counts = analysis.categorical_summary()?;
    print_count("count row(s)", counts.len(), None);
    display_category_counts(&counts);

    // Step 4: Outlier filter and correlation
    print_step_header(4, "Outlier Filter & Correlation");

    let spinner = create_spinner("Filtering outliers...");
    let filtered = analysis.filtered()?;
    summary.retained = filtered.table.height();
    summary.thresholds = filtered.thresholds;
    finish_with_success(
        &spinner,
        &format!("Kept {} of {} record(s)", summary.retained, summary.records),
    );

    let spinner = create_spinner("Calculating correlations...");
    let view = match correlation_view_of(&filtered.table) {
        Ok(view) => {
            finish_with_success(
                &spinner,
                &format!("Correlation matrix {0}×{0}", view.matrix.dim()),
            );
            summary.set_correlation(&view);
            Some(view)
        }
        Err(err @ PipelineError::InsufficientData { .. }) => {
            finish_with_warning(&spinner, &err.to_string());
            None
        }
        Err(err) => return Err(err).context("Correlation analysis failed"),
    };
    summary.analysis_time = analysis_start.elapsed();
    print_step_time(summary.analysis_time);

    // Step 5: Export
    if let Some(dir) = &output_dir {
        print_step_header(5, "Export Views");

        let step_start = Instant::now();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let categorical_path = cli.categorical_path();
        export_category_counts(&counts, &categorical_path)?;
        print_success(&format!("Saved {}", categorical_path.display()));

        match &view {
            Some(view) => {
                let metadata = ExportMetadata::new(
                    &cli.input,
                    &config,
                    summary.records,
                    summary.retained,
                    summary.thresholds,
                );
                let correlation_path = cli.correlation_path();
                export_correlation_view(view, &metadata, &correlation_path)?;
                print_success(&format!("Saved {}", correlation_path.display()));
            }
            None => print_info("Correlation view not exported"),
        }

        let export_elapsed = step_start.elapsed();
        summary.export_time = Some(export_elapsed);
        print_step_time(export_elapsed);
    }

    summary.display();
    print_completion();

    Ok(())
}
