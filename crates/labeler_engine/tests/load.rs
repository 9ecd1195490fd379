use std::fs;

use labeler_core::{Label, Record};
use labeler_engine::{
    extract_html_url, load, load_file, load_file_or_empty, serialize, LoadError, ParseError,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn derived_url_comes_from_embedded_json() {
    let csv = "body\n\"{\"\"html_url\"\":\"\"http://x/1\"\",\"\"title\"\":\"\"crash\"\"}\"\nnot json\n";
    let dataset = load(csv.as_bytes()).unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.records()[0].derived_url, "http://x/1");
    assert_eq!(dataset.records()[1].derived_url, "");
}

#[test]
fn url_extraction_never_fails() {
    assert_eq!(extract_html_url(r#"{"html_url":"http://x/2"}"#).as_deref(), Some("http://x/2"));
    assert_eq!(extract_html_url(r#"{"title":"no url"}"#), None);
    assert_eq!(extract_html_url(r#"{"html_url":42}"#), None);
    assert_eq!(extract_html_url(r#"["html_url"]"#), None);
    assert_eq!(extract_html_url("{broken"), None);
    assert_eq!(extract_html_url(""), None);
}

#[test]
fn missing_label_and_reason_columns_get_defaults() {
    let dataset = load("id,body\n1,a\n2,b\n".as_bytes()).unwrap();

    assert_eq!(dataset.columns(), ["id", "body", "label", "reason"]);
    for record in dataset.records() {
        assert_eq!(record.label, Label::Unset);
        assert_eq!(record.reason, "");
    }
    assert_eq!(dataset.records()[1].passthrough, vec!["2".to_string()]);
}

#[test]
fn present_labels_pass_through_including_blanks() {
    let csv = "body,label,reason\na,1,good\nb,0,\nc,,\nd,1.0,pandas float\n";
    let dataset = load(csv.as_bytes()).unwrap();

    let labels: Vec<Label> = dataset.records().iter().map(|r| r.label).collect();
    assert_eq!(
        labels,
        vec![Label::Standard, Label::NotStandard, Label::Unset, Label::Standard]
    );
    assert_eq!(dataset.records()[0].reason, "good");
    assert_eq!(dataset.records()[1].reason, "");
}

#[test]
fn invalid_label_is_a_parse_error() {
    let err = load("body,label\na,maybe\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::InvalidLabel { row: 0, ref value } if value == "maybe"));
}

#[test]
fn missing_body_column_is_a_parse_error() {
    let err = load("title,label\na,1\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::MissingColumn("body")));

    let err = load("".as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::MissingColumn("body")));
}

#[test]
fn ragged_rows_are_a_parse_error() {
    let err = load("body,label\na,1,extra\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::Csv(_)));
}

#[test]
fn missing_file_reports_source_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("label_Nobody.csv");

    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::SourceNotFound(ref p) if p == &path));

    let dataset = load_file_or_empty(&path).unwrap();
    assert!(dataset.is_empty());
    assert_eq!(dataset.columns(), ["body", "label", "reason"]);
}

#[test]
fn load_file_reads_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("data.csv");
    fs::write(&path, "body,label,reason\nhello,0,vague\n").unwrap();

    let dataset = load_file_or_empty(&path).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.records()[0].label, Label::NotStandard);
    assert_eq!(dataset.records()[0].reason, "vague");
}

#[test]
fn serialize_preserves_columns_and_blanks_empty_reason() {
    let csv = "id,body,label,reason,html_url\n7,\"a, quoted\",1,,http://x\n8,b,,why,\n";
    let dataset = load(csv.as_bytes()).unwrap();

    let bytes = serialize(&dataset).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), csv);
}

#[test]
fn serialize_appends_missing_editable_columns() {
    let mut dataset = load("body\nplain\n".as_bytes()).unwrap();
    dataset.record_mut(0).unwrap().label = Label::Standard;

    let bytes = serialize(&dataset).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "body,label,reason\nplain,1,\n");

    let reloaded = load("body,label,reason\nplain,1,\n".as_bytes()).unwrap();
    let mut expected = Record::new("plain", "");
    expected.label = Label::Standard;
    assert_eq!(reloaded.records(), [expected]);
}
