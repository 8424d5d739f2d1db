use flowchord_core::{Cell, Error, FlowTable, Role, prepare};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> FlowTable {
    let path = workspace_root().join("fixtures").join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    FlowTable::from_json_str(&text).expect("fixture parses")
}

#[test]
fn transpose_is_an_involution() {
    let table = fixture("eye_colour.json");
    let once = table.transpose();
    assert_eq!(once.rows().len(), 3);
    assert_eq!(once.rows()[0].len(), 4);
    assert_eq!(once.rows()[1][0], Cell::from("Introvert"));
    assert_eq!(once.rows()[0][2], Cell::from("Blue eyes"));
    assert_eq!(once.transpose(), table);
}

#[test]
fn expanded_matrix_is_symmetric_with_zero_diagonal() {
    for name in ["eye_colour.json", "sparse_strings.json"] {
        let prepared = prepare(&fixture(name), false).expect("prepare ok");
        let m = &prepared.expanded;
        let n = prepared.flow.row_count();
        assert_eq!(m.size(), n + prepared.flow.column_count());
        assert!(m.is_symmetric(), "{name} should expand symmetrically");
        for i in 0..m.size() {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..m.size() {
                assert_eq!(m.get(i, j), m.get(j, i));
                let same_side = (i < n) == (j < n);
                if same_side {
                    assert_eq!(m.get(i, j), 0.0);
                }
            }
        }
    }
}

#[test]
fn expanded_matrix_places_the_flow_block_top_right() {
    let prepared = prepare(&fixture("eye_colour.json"), false).expect("prepare ok");
    let m = &prepared.expanded;
    assert_eq!(m.size(), 5);
    assert_eq!(m.get(0, 3), 0.8);
    assert_eq!(m.get(0, 4), 0.2);
    assert_eq!(m.get(2, 3), 0.66);
    assert_eq!(m.get(4, 1), 0.6);
}

#[test]
fn labels_are_rows_then_columns() {
    let prepared = prepare(&fixture("eye_colour.json"), false).expect("prepare ok");
    let labels = &prepared.labels;
    assert_eq!(
        labels.as_slice(),
        ["Brown eyes", "Blue eyes", "Green eyes", "Introvert", "Extrovert"]
    );
    assert_eq!(labels.row_count(), 3);
    assert_eq!(labels.role_for(2), Role::Row);
    assert_eq!(labels.role_for(3), Role::Column);
    assert_eq!(labels.label_for(4), "Extrovert");
}

#[test]
fn flip_keeps_rows_first_ordering_of_the_transposed_table() {
    let prepared = prepare(&fixture("eye_colour.json"), true).expect("prepare ok");
    let labels = &prepared.labels;
    assert_eq!(labels.row_labels(), ["Introvert", "Extrovert"]);
    assert_eq!(
        labels.column_labels(),
        ["Brown eyes", "Blue eyes", "Green eyes"]
    );
    assert_eq!(prepared.flow.get(1, 0), 0.2);
    assert!(prepared.expanded.is_symmetric());
    let unflipped = prepare(&fixture("eye_colour.json"), false).unwrap();
    assert!((prepared.flow.total() - unflipped.flow.total()).abs() < 1e-12);
}

#[test]
fn string_and_blank_cells_are_coerced() {
    let prepared = prepare(&fixture("sparse_strings.json"), false).expect("prepare ok");
    assert_eq!(prepared.flow.values()[0], vec![120.0, 0.0, 15.0]);
    assert_eq!(prepared.flow.values()[1], vec![80.0, 200.0, 0.0]);
    assert_eq!(prepared.flow.values()[2], vec![0.0, 45.0, 5.5]);
}

#[test]
fn non_numeric_cells_fail_fast_with_table_coordinates() {
    let table = FlowTable::from_json_str(r#"[["", "a", "b"], ["x", 1, "many"]]"#).unwrap();
    let err = prepare(&table, false).unwrap_err();
    match err {
        Error::NonNumericCell { row, column, value } => {
            assert_eq!((row, column), (1, 2));
            assert_eq!(value, "many");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Same cell, reported in input coordinates even when flipped.
    let err = prepare(&table, true).unwrap_err();
    assert!(matches!(err, Error::NonNumericCell { row: 1, column: 2, .. }));
}

#[test]
fn negative_weights_are_rejected() {
    let table = FlowTable::from_json_str(r#"[["", "a"], ["x", -2]]"#).unwrap();
    let err = prepare(&table, false).unwrap_err();
    assert!(matches!(err, Error::InvalidWeight { row: 1, column: 1, .. }));
}

#[test]
fn malformed_tables_are_rejected_before_coercion() {
    let cases = [
        "[]",
        r#"[["only header"]]"#,
        r#"[["", "a", "b"]]"#,
        r#"[["", "a", "b"], ["x", 1]]"#,
        r#"[["", "a"], ["x", 1, "oops"]]"#,
    ];
    for text in cases {
        let table = FlowTable::from_json_str(text).unwrap();
        let err = prepare(&table, false).unwrap_err();
        assert!(
            matches!(err, Error::MalformedInput { .. }),
            "{text} should be malformed, got {err}"
        );
    }
}

#[test]
fn json_that_is_not_a_table_is_a_json_error() {
    let err = FlowTable::from_json_str(r#"{"rows": 3}"#).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
