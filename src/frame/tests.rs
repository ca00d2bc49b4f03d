//! Unit tests for frame loading, inspection and transformation

use super::*;
use crate::error::CleanerError;

fn csv(text: &str) -> Frame {
    Frame::load(text.as_bytes(), DataFormat::Csv).unwrap()
}

#[test]
fn test_load_csv_infers_column_kinds() {
    let frame = csv("id,name,score,active\n1,Ann,3.5,true\n2,Bob,4.0,false\n");

    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.column_count(), 4);
    assert_eq!(frame.column_names(), vec!["id", "name", "score", "active"]);
    assert_eq!(frame.column_kind("id").unwrap(), ColumnKind::Integer);
    assert_eq!(frame.column_kind("name").unwrap(), ColumnKind::Text);
    assert_eq!(frame.column_kind("score").unwrap(), ColumnKind::Float);
    assert_eq!(frame.column_kind("active").unwrap(), ColumnKind::Boolean);
    assert_eq!(frame.numeric_columns(), vec!["id", "score"]);
}

#[test]
fn test_load_csv_treats_empty_fields_as_null() {
    let frame = csv("a,b\n1,x\n,y\n3,\n");

    assert_eq!(frame.null_count(), 2);
    assert_eq!(
        frame.null_counts(),
        vec![("a".to_string(), 1), ("b".to_string(), 1)]
    );
}

#[test]
fn test_load_csv_reads_missing_markers_as_null() {
    let frame = csv("x\n1\nNA\n3\nnull\n");

    assert_eq!(frame.column_kind("x").unwrap(), ColumnKind::Integer);
    assert_eq!(frame.null_count(), 2);
    assert_eq!(
        frame.numeric_values("x").unwrap(),
        vec![Some(1.0), None, Some(3.0), None]
    );

    let frame = csv("name,score\nN/A,NaN\nAnn,2.5\n");
    assert_eq!(frame.column_kind("score").unwrap(), ColumnKind::Float);
    assert_eq!(frame.null_count(), 2);
}

#[test]
fn test_load_json_records() {
    let frame = Frame::load(
        br#"[{"a": 1, "b": "x"}, {"a": 2, "b": null}]"#,
        DataFormat::Json,
    )
    .unwrap();

    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.column_kind("a").unwrap(), ColumnKind::Integer);
    assert_eq!(frame.column_kind("b").unwrap(), ColumnKind::Text);
    assert_eq!(frame.null_count(), 1);
}

#[test]
fn test_load_latin1_csv_falls_back() {
    let frame = Frame::load(b"name,age\nJos\xE9,30\n", DataFormat::Csv).unwrap();

    assert_eq!(frame.row_count(), 1);
    let bytes = frame.serialize(DataFormat::Csv).unwrap();
    assert!(String::from_utf8(bytes).unwrap().contains("José"));
}

#[test]
fn test_malformed_json_is_format_error() {
    let result = Frame::load(b"{ this is not json", DataFormat::Json);
    assert!(matches!(result, Err(CleanerError::Format { .. })));
}

#[test]
fn test_unsupported_format_names_are_rejected() {
    assert!(matches!(
        "parquet".parse::<DataFormat>(),
        Err(CleanerError::Format { .. })
    ));
    assert_eq!("CSV".parse::<DataFormat>().unwrap(), DataFormat::Csv);
    assert_eq!(
        DataFormat::from_path("datasets/sales.json").unwrap(),
        DataFormat::Json
    );
    assert!(DataFormat::from_path("datasets/sales.xlsx").is_err());
    assert!(DataFormat::from_path("datasets/README").is_err());
}

#[test]
fn test_quantile_interpolates_linearly() {
    let frame = csv("x\n4\n1\n3\n2\n");

    assert_eq!(frame.quantile("x", 0.25).unwrap(), Some(1.75));
    assert_eq!(frame.quantile("x", 0.75).unwrap(), Some(3.25));
    assert_eq!(frame.quantile("x", 0.0).unwrap(), Some(1.0));
    assert_eq!(frame.quantile("x", 1.0).unwrap(), Some(4.0));
}

#[test]
fn test_quantile_ignores_nulls() {
    let frame = csv("x,y\n1,a\n,b\n3,c\n");
    assert_eq!(frame.quantile("x", 0.5).unwrap(), Some(2.0));
}

#[test]
fn test_quantile_of_all_null_numeric_column_is_none() {
    let df = polars::df!("x" => &[None::<f64>, None]).unwrap();
    let frame = Frame::from_dataframe(df);
    assert_eq!(frame.quantile("x", 0.5).unwrap(), None);
}

#[test]
fn test_quantile_rejects_text_and_missing_columns() {
    let frame = csv("x,name\n1,a\n2,b\n");

    assert!(matches!(
        frame.quantile("name", 0.5),
        Err(CleanerError::ColumnType { .. })
    ));
    assert!(matches!(
        frame.quantile("missing", 0.5),
        Err(CleanerError::ColumnNotFound { .. })
    ));
    assert!(matches!(
        frame.quantile("x", 1.5),
        Err(CleanerError::InvalidParameter { .. })
    ));
}

#[test]
fn test_filter_preserves_row_order() {
    let frame = csv("x\n5\n1\n4\n2\n");
    let values = frame.numeric_values("x").unwrap();

    let kept = frame.filter(|row| values[row].unwrap_or(0.0) > 1.5).unwrap();

    assert_eq!(
        kept.numeric_values("x").unwrap(),
        vec![Some(5.0), Some(4.0), Some(2.0)]
    );
}

#[test]
fn test_filter_mask_length_must_match() {
    let frame = csv("x\n1\n2\n");
    assert!(frame.filter_mask(&[true]).is_err());
}

#[test]
fn test_duplicate_mask_keeps_first_occurrence() {
    let df = polars::df!(
        "a" => &[Some(1i64), Some(2), Some(1), None, None],
        "b" => &[Some("x"), Some("y"), Some("x"), None, None]
    )
    .unwrap();
    let frame = Frame::from_dataframe(df);

    assert_eq!(
        frame.duplicate_mask().unwrap(),
        vec![false, false, true, false, true]
    );
}

#[test]
fn test_duplicate_mask_compares_whole_rows() {
    let frame = csv("a,b\n1,x\n1,y\n");
    assert_eq!(frame.duplicate_mask().unwrap(), vec![false, false]);
}

#[test]
fn test_fill_nulls_per_column() {
    let frame = csv("name,qty\nAnn,\n,4\n");

    let filled = frame
        .fill_nulls(&[
            ("name".to_string(), FillValue::Text("N/A".to_string())),
            ("qty".to_string(), FillValue::Integer(0)),
        ])
        .unwrap();

    assert_eq!(filled.null_count(), 0);
    assert_eq!(filled.column_kind("qty").unwrap(), ColumnKind::Integer);
    assert_eq!(
        filled.numeric_values("qty").unwrap(),
        vec![Some(0.0), Some(4.0)]
    );
    let text = String::from_utf8(filled.serialize(DataFormat::Csv).unwrap()).unwrap();
    assert!(text.contains("N/A,4"));
}

#[test]
fn test_nested_json_columns() {
    let frame = Frame::load(
        br#"[{"tags": [1, 2], "id": 1}, {"tags": [1, 2], "id": 1}, {"tags": null, "id": 2}]"#,
        DataFormat::Json,
    )
    .unwrap();

    assert_eq!(frame.column_kind("tags").unwrap(), ColumnKind::Nested);
    assert!(!frame.numeric_columns().contains(&"tags".to_string()));
    assert_eq!(frame.duplicate_mask().unwrap(), vec![false, true, false]);

    let text = String::from_utf8(frame.serialize(DataFormat::Csv).unwrap()).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert_eq!(text.lines().next(), Some("tags,id"));
}

#[test]
fn test_append_stacks_rows() {
    let mut first = csv("x\n1\n");
    let second = csv("x\n2\n");

    first.append(&second).unwrap();

    assert_eq!(first.numeric_values("x").unwrap(), vec![Some(1.0), Some(2.0)]);
}

#[test]
fn test_serialize_csv_escapes_and_keeps_column_order() {
    let frame = csv("name,score\n\"Smith, J\",1\nLee,2\n");

    let text = String::from_utf8(frame.serialize(DataFormat::Csv).unwrap()).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("name,score"));
    assert_eq!(lines.next(), Some("\"Smith, J\",1"));
    assert_eq!(lines.next(), Some("Lee,2"));

    let reloaded = Frame::load(text.as_bytes(), DataFormat::Csv).unwrap();
    assert_eq!(reloaded.row_count(), 2);
    assert_eq!(reloaded.column_names(), vec!["name", "score"]);
}
