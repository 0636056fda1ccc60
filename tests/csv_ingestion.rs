use std::io::Write;

use csv_cruncher::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader, ingest_csv_from_str};
use csv_cruncher::types::Schema;

#[test]
fn ingest_csv_from_path_happy_path() {
    let ds = ingest_csv_from_path("tests/fixtures/products.csv").unwrap();

    assert_eq!(ds.schema, Schema::new(["id", "name", "price", "qty"]));
    assert_eq!(ds.row_count(), 4);
    assert_eq!(ds.rows[0].values(), ["1", "A", "10.5", "2"]);
}

#[test]
fn two_row_csv_exposes_every_header_column_as_string() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "id,name,price,qty\n1,A,10.5,2\n2,B,20.0,5\n").unwrap();

    let ds = ingest_csv_from_path(file.path()).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.schema.column_names().collect::<Vec<_>>(), vec!["id", "name", "price", "qty"]);
    assert_eq!(ds.value(0, "name"), Some("A"));
    // Values are kept verbatim: no float round-trip.
    assert_eq!(ds.value(1, "price"), Some("20.0"));
}

#[test]
fn ingest_csv_from_reader_keeps_quoted_fields() {
    let input = "name,note\n\"Smith, J\",\"a<b\"\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let ds = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(ds.value(0, "name"), Some("Smith, J"));
    assert_eq!(ds.value(0, "note"), Some("a<b"));
}

#[test]
fn header_only_csv_is_an_empty_dataset() {
    let ds = ingest_csv_from_path("tests/fixtures/header_only.csv").unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.schema.len(), 4);
}

#[test]
fn ingest_csv_errors_on_ragged_rows() {
    let err = ingest_csv_from_str("id,name\n1,Ada\n2\n").unwrap_err();
    assert!(err.to_string().contains("csv error"));
}

#[test]
fn ingest_csv_errors_on_duplicate_header() {
    let err = ingest_csv_from_str("id,id\n1,2\n").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("duplicate column 'id'"));
}

#[test]
fn ingest_csv_errors_on_missing_file() {
    let err = ingest_csv_from_path("tests/fixtures/does_not_exist.csv").unwrap_err();
    assert!(err.to_string().contains("csv error"));
}
