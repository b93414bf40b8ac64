//! Tests for quantile thresholds and the combined outlier predicate

use cardioviz::pipeline::{
    derive_features, filter_outliers, outlier_mask, remove_outliers, Bounds, OutlierThresholds,
    QuantileMethod,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn derived_fixture() -> DataFrame {
    derive_features(&create_examination_dataframe(), 25.0).unwrap()
}

#[test]
fn test_thresholds_use_linear_interpolation() {
    let thresholds =
        OutlierThresholds::compute(&derived_fixture(), 0.025, 0.975, QuantileMethod::Linear)
            .unwrap()
            .unwrap();

    assert_close(thresholds.height.low, 152.125);
    assert_close(thresholds.height.high, 175.975);
    assert_close(thresholds.weight.low, 57.35);
    assert_close(thresholds.weight.high, 94.55);
}

#[test]
fn test_filter_keeps_expected_rows_in_order() {
    let (filtered, thresholds) =
        remove_outliers(&derived_fixture(), 0.025, 0.975, QuantileMethod::Linear).unwrap();

    assert!(thresholds.is_some());
    assert_eq!(int_column(&filtered, "id"), vec![0, 1, 2, 3, 9, 13, 14]);
}

#[test]
fn test_inverted_pressure_row_dropped() {
    let derived = derived_fixture();
    let thresholds = OutlierThresholds {
        height: Bounds {
            low: 0.0,
            high: 1000.0,
        },
        weight: Bounds {
            low: 0.0,
            high: 1000.0,
        },
    };

    let filtered = filter_outliers(&derived, &thresholds).unwrap();

    // Only id 4 has ap_lo > ap_hi
    assert_eq!(filtered.height(), derived.height() - 1);
    assert!(!int_column(&filtered, "id").contains(&4));
}

#[test]
fn test_thresholds_fixed_before_filtering() {
    let derived = derive_features(&create_random_examination_dataframe(400, 3), 25.0).unwrap();
    let thresholds = OutlierThresholds::compute(&derived, 0.025, 0.975, QuantileMethod::Linear)
        .unwrap()
        .unwrap();

    let filtered = filter_outliers(&derived, &thresholds).unwrap();

    // Recomputing over the filtered rows gives tighter bounds
    let recomputed = OutlierThresholds::compute(&filtered, 0.025, 0.975, QuantileMethod::Linear)
        .unwrap()
        .unwrap();
    assert!(recomputed.height.low > thresholds.height.low);
    assert!(recomputed.height.high < thresholds.height.high);

    // Every kept row satisfies the original bounds
    for h in float_column(&filtered, "height") {
        assert!(thresholds.height.contains(h));
    }
    for w in float_column(&filtered, "weight") {
        assert!(thresholds.weight.contains(w));
    }
}

#[test]
fn test_filter_idempotent_with_fixed_thresholds() {
    let derived = derive_features(&create_random_examination_dataframe(400, 5), 25.0).unwrap();
    let thresholds = OutlierThresholds::compute(&derived, 0.025, 0.975, QuantileMethod::Linear)
        .unwrap()
        .unwrap();

    let once = filter_outliers(&derived, &thresholds).unwrap();
    let twice = filter_outliers(&once, &thresholds).unwrap();

    assert!(once.height() < derived.height());
    assert!(once.equals(&twice), "re-filtering should not change the table");
}

#[test]
fn test_mask_matches_row_count() {
    let derived = derived_fixture();
    let thresholds = OutlierThresholds::compute(&derived, 0.025, 0.975, QuantileMethod::Linear)
        .unwrap()
        .unwrap();

    let mask = outlier_mask(&derived, &thresholds).unwrap();

    assert_eq!(mask.len(), derived.height());
    assert_eq!(mask.iter().filter(|&&keep| keep).count(), 7);
}

#[test]
fn test_null_pressure_row_dropped() {
    let df = df! {
        "height" => [170i64, 165, 160],
        "weight" => [70.0f64, 65.0, 60.0],
        "ap_hi" => [Some(120i64), None, Some(115)],
        "ap_lo" => [80i64, 80, 75],
        "cholesterol" => [1i64, 1, 1],
        "gluc" => [1i64, 1, 1],
    }
    .unwrap();
    let derived = derive_features(&df, 25.0).unwrap();

    let (filtered, _) = remove_outliers(&derived, 0.0, 1.0, QuantileMethod::Linear).unwrap();

    assert_eq!(float_column(&filtered, "height"), vec![170.0, 160.0]);
}

#[test]
fn test_empty_table_filters_to_empty() {
    let derived = derive_features(&create_examination_dataframe().clear(), 25.0).unwrap();

    let (filtered, thresholds) =
        remove_outliers(&derived, 0.025, 0.975, QuantileMethod::Linear).unwrap();

    assert!(thresholds.is_none());
    assert_eq!(filtered.height(), 0);
    assert_eq!(filtered.width(), derived.width());
}

#[test]
fn test_two_records_trimmed_by_linear_quantiles() {
    let derived = derive_features(&create_two_record_dataframe(), 25.0).unwrap();

    let (filtered, _) = remove_outliers(&derived, 0.025, 0.975, QuantileMethod::Linear).unwrap();

    // Bounds 160.25 to 169.75 exclude both heights
    assert_eq!(filtered.height(), 0);
}

#[test]
fn test_two_records_kept_by_nearest_quantiles() {
    let derived = derive_features(&create_two_record_dataframe(), 25.0).unwrap();

    let (filtered, _) = remove_outliers(&derived, 0.025, 0.975, QuantileMethod::Nearest).unwrap();

    assert_eq!(filtered.height(), 2);
}
