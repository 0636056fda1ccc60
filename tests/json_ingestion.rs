use csv_cruncher::ingestion::json::{ingest_json_from_path, ingest_json_from_str};

#[test]
fn ingest_json_array_from_path_happy_path() {
    let ds = ingest_json_from_path("tests/fixtures/products.json").unwrap();

    assert_eq!(ds.row_count(), 4);
    assert_eq!(ds.schema.column_names().collect::<Vec<_>>(), vec!["id", "name", "price", "qty"]);
    assert_eq!(ds.value(0, "price"), Some("10.5"));
    assert_eq!(ds.value(3, "qty"), Some("10"));
}

#[test]
fn ingest_json_ndjson_happy_path() {
    let input = r#"
{"id":1,"name":"Ada","active":true}
{"id":2,"name":"Grace","active":null}
"#;
    let ds = ingest_json_from_str(input).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.value(0, "active"), Some("true"));
    assert_eq!(ds.value(1, "active"), Some(""));
}

#[test]
fn ingest_json_errors_on_missing_field() {
    let input = r#"[{"id":1,"name":"Ada"},{"id":2,"nickname":"G"}]"#;
    let err = ingest_json_from_str(input).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("row 2 missing field 'name'"));
}

#[test]
fn ingest_json_errors_on_extra_field() {
    let input = r#"[{"id":1},{"id":2,"name":"G"}]"#;
    let err = ingest_json_from_str(input).unwrap_err();
    assert!(err.to_string().contains("row 2 has 2 fields"));
}

#[test]
fn ingest_json_errors_on_nested_value() {
    let input = r#"[{"id":1,"user":{"name":"Ada"}}]"#;
    let err = ingest_json_from_str(input).unwrap_err();
    assert!(err.to_string().contains("field 'user' is not a scalar"));
}

#[test]
fn ingest_json_empty_input_is_an_empty_dataset() {
    assert!(ingest_json_from_str("  ").unwrap().is_empty());
    assert!(ingest_json_from_str("[]").unwrap().is_empty());
}
