//! Tests for IQR outlier removal

use super::*;
use crate::error::CleanerError;
use crate::models::Parameters;
use crate::operations::{RemoveOutliers, iqr_bounds, remove_outliers};
use serde_json::json;

fn params(columns: &[&str], threshold: f64) -> RemoveOutliers {
    RemoveOutliers::new(
        Some(columns.iter().map(|c| c.to_string()).collect()),
        threshold,
    )
    .unwrap()
}

fn parameters(value: serde_json::Value) -> Parameters {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_iqr_bounds_single_column() {
    let frame = frame_from_csv("x\n1\n2\n3\n4\n5\n100\n");

    let bounds = iqr_bounds(&frame, "x", 1.5).unwrap().unwrap();

    // Q1 = 2.25, Q3 = 4.75, IQR = 2.5
    assert_eq!(bounds.lower, -1.5);
    assert_eq!(bounds.upper, 8.5);
}

#[test]
fn test_remove_outliers_drops_rows_outside_bounds() {
    let frame = frame_from_csv("x\n1\n2\n3\n4\n5\n100\n");

    let outcome = remove_outliers(&frame, &params(&["x"], 1.5)).unwrap();

    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(
        column_values(&outcome.frame, "x"),
        vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]
    );
    assert!(outcome.duplicates.is_none());
}

#[test]
fn test_larger_threshold_keeps_more_rows() {
    let frame = frame_from_csv("x\n1\n2\n3\n4\n5\n100\n");

    let outcome = remove_outliers(&frame, &params(&["x"], 50.0)).unwrap();

    assert_eq!(outcome.rows_affected, 0);
    assert_eq!(outcome.frame.row_count(), 6);
}

#[test]
fn test_kept_rows_within_bounds_and_removed_rows_outside() {
    let frame = frame_from_csv("x\n-40\n3\n7\n8\n9\n10\n11\n12\n13\n60\n9.5\n");
    let before = column_values(&frame, "x");

    for threshold in [0.5, 1.0, 1.5, 3.0] {
        let bounds = iqr_bounds(&frame, "x", threshold).unwrap().unwrap();
        let outcome = remove_outliers(&frame, &params(&["x"], threshold)).unwrap();
        let kept = column_values(&outcome.frame, "x");

        for value in kept.iter().flatten() {
            assert!(bounds.contains(*value), "kept {} outside {:?}", value, bounds);
        }

        let expected: Vec<Option<f64>> = before
            .iter()
            .copied()
            .filter(|value| value.is_some_and(|v| bounds.contains(v)))
            .collect();
        assert_eq!(kept, expected, "threshold {}", threshold);
        assert_eq!(
            outcome.rows_affected as usize,
            before.len() - expected.len()
        );
    }
}

#[test]
fn test_default_columns_are_numeric_columns() {
    let frame = create_sales_frame();
    let all_numeric = RemoveOutliers::new(None, 1.5).unwrap();

    let outcome = remove_outliers(&frame, &all_numeric).unwrap();

    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(outcome.frame.row_count(), 5);
    assert_eq!(outcome.frame.column_count(), 3);
}

#[test]
fn test_listed_column_order_gives_same_rows_when_outliers_coincide() {
    let frame = create_sales_frame();

    let forward = remove_outliers(&frame, &params(&["units", "revenue"], 1.5)).unwrap();
    let backward = remove_outliers(&frame, &params(&["revenue", "units"], 1.5)).unwrap();

    assert_eq!(forward.rows_affected, backward.rows_affected);
    assert_eq!(
        column_values(&forward.frame, "units"),
        column_values(&backward.frame, "units")
    );
    assert_eq!(
        column_values(&forward.frame, "revenue"),
        column_values(&backward.frame, "revenue")
    );
}

#[test]
fn test_bounds_are_recomputed_on_filtered_frame() {
    let frame = frame_from_csv(
        "a,b\n1,10\n2,11\n3,12\n4,13\n5,14\n100,15\n6,16\n7,17\n",
    );

    let combined = remove_outliers(&frame, &params(&["a", "b"], 1.5)).unwrap();

    let after_a = remove_outliers(&frame, &params(&["a"], 1.5)).unwrap();
    let after_b = remove_outliers(&after_a.frame, &params(&["b"], 1.5)).unwrap();

    assert_eq!(
        combined.rows_affected,
        after_a.rows_affected + after_b.rows_affected
    );
    assert_eq!(
        column_values(&combined.frame, "b"),
        column_values(&after_b.frame, "b")
    );
}

#[test]
fn test_null_values_do_not_satisfy_bounds() {
    let frame = frame_from_csv("x,y\n1,a\n2,b\n3,c\n,d\n");

    let outcome = remove_outliers(&frame, &params(&["x"], 1.5)).unwrap();

    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(outcome.frame.null_count(), 0);
}

#[test]
fn test_text_column_is_column_type_error() {
    let frame = create_sales_frame();

    let result = remove_outliers(&frame, &params(&["units", "region"], 1.5));

    assert!(matches!(result, Err(CleanerError::ColumnType { column, .. }) if column == "region"));
}

#[test]
fn test_missing_column_is_column_not_found() {
    let frame = create_sales_frame();

    let result = remove_outliers(&frame, &params(&["profit"], 1.5));

    assert!(matches!(result, Err(CleanerError::ColumnNotFound { column }) if column == "profit"));
}

#[test]
fn test_empty_column_list_removes_nothing() {
    let frame = create_sales_frame();

    let outcome = remove_outliers(&frame, &params(&[], 1.5)).unwrap();

    assert_eq!(outcome.rows_affected, 0);
    assert_eq!(outcome.frame.row_count(), 6);
}

#[test]
fn test_parameters_with_defaults() {
    let parsed = RemoveOutliers::from_parameters(&Parameters::new(), 1.5).unwrap();
    assert_eq!(parsed.columns, None);
    assert_eq!(parsed.threshold, 1.5);

    let configured = RemoveOutliers::from_parameters(&Parameters::new(), 3.0).unwrap();
    assert_eq!(configured.threshold, 3.0);
}

#[test]
fn test_parameters_accept_aliases_and_numeric_strings() {
    let parsed = RemoveOutliers::from_parameters(
        &parameters(json!({"columnas": ["units"], "umbral": "2.5"})),
        1.5,
    )
    .unwrap();

    assert_eq!(parsed.columns, Some(vec!["units".to_string()]));
    assert_eq!(parsed.threshold, 2.5);

    let single = RemoveOutliers::from_parameters(&parameters(json!({"columns": "units"})), 1.5)
        .unwrap();
    assert_eq!(single.columns, Some(vec!["units".to_string()]));
}

#[test]
fn test_invalid_parameters_are_rejected() {
    for invalid in [
        json!({"threshold": 0}),
        json!({"threshold": -1.0}),
        json!({"threshold": "wide"}),
        json!({"threshold": [1]}),
        json!({"columns": 5}),
        json!({"columns": ["units", 3]}),
    ] {
        let result = RemoveOutliers::from_parameters(&parameters(invalid.clone()), 1.5);
        assert!(
            matches!(result, Err(CleanerError::InvalidParameter { .. })),
            "expected rejection of {}",
            invalid
        );
    }
}
