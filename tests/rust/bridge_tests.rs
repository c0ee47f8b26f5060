use atlas_scout::core::errors::CoreError;
use atlas_scout::{IngestionBridge, SearchBridge};
use serde_json::{json, Value};

#[test]
fn compile_returns_pipeline_json() {
    let bridge = SearchBridge::new();

    let output = bridge
        .compile(r#"{ "query": "lar", "not_in_filters": [{ "path": "eaea", "values": [3] }], "offset": 10 }"#)
        .unwrap();
    let stages: Vec<Value> = serde_json::from_str(&output).unwrap();

    assert_eq!(stages.len(), 3);
    assert_eq!(stages[0]["$search"]["index"], json!("scout"));
    assert_eq!(
        stages[0]["$search"]["compound"]["mustNot"][0]["in"]["path"],
        json!("eaea")
    );
    assert_eq!(
        stages[1]["$addFields"]["__count"],
        json!("$$SEARCH_META.count.lowerBound")
    );
    assert_eq!(stages[2]["$skip"], json!(10));
}

#[test]
fn compile_reports_invalid_filter() {
    let bridge = SearchBridge::new();

    let outcome = bridge.compile(r#"{ "query": "lar", "in_filters": [{ "path": "qux", "values": [] }] }"#);

    assert!(matches!(outcome, Err(CoreError::InvalidFilter { .. })));
}

#[test]
fn malformed_payloads_fail_before_connecting() {
    assert!(matches!(
        SearchBridge::new().execute("{"),
        Err(CoreError::Serialization(_))
    ));
    assert!(matches!(
        IngestionBridge::new().execute(r#"{ "operation": "update" }"#),
        Err(CoreError::Serialization(_))
    ));
}
