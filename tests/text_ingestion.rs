use rust_data_gate::config::ColumnCatalog;
use rust_data_gate::export::to_delimited_bytes;
use rust_data_gate::ingestion::{ingest, IngestionOptions, RowSeparator};
use rust_data_gate::types::{ErrorState, InputFormat, RawInput, Record, Report};
use rust_data_gate::validation::{
    Constraint, DataType, FieldIssue, FieldSpec, PassThrough, RecordValidator, SchemaDefinition, TypedSchema, ValidationFailure,
    ValidationResult, UNEXPECTED_ERROR_MESSAGE,
};
use serde_json::json;

fn run(text: &str, schema: &SchemaDefinition) -> Report {
    ingest(&RawInput::text(text), schema, &IngestionOptions::default()).unwrap()
}

fn ab_schema() -> SchemaDefinition {
    SchemaDefinition::new(
        ColumnCatalog::from_names(["a", "b", "c"]),
        TypedSchema::new(vec![
            FieldSpec::new("a", DataType::Utf8),
            FieldSpec::new("b", DataType::Int64).with(Constraint::GreaterThan(1.0)),
        ]),
    )
}

fn record_json(r: &Record) -> serde_json::Value {
    serde_json::to_value(r).unwrap()
}

#[test]
fn missing_required_column_is_fatal() {
    let schema = SchemaDefinition::new(ColumnCatalog::from_names(["a", "b", "c"]).require(["c"]), PassThrough);
    let report = run("a,b\n1,2\n", &schema);

    assert_eq!(
        report.fatal_message(),
        Some("The following fields are required but missing:...c")
    );
    assert!(report.columns.is_empty());
    assert!(report.data_source.is_empty());
    assert!(report.schema_fixes.is_empty());
}

#[test]
fn duplicate_column_is_fatal() {
    let report = run("a,a\n1,2\n", &ab_schema());
    assert_eq!(
        report.fatal_message(),
        Some("The following columns appear to be duplicate, this could result in an error:...a")
    );
    assert!(report.data_source.is_empty());
}

#[test]
fn unknown_columns_are_fatal_and_list_vocabulary() {
    let report = run("a,x,b,y\n1,2,3,4\n", &ab_schema());
    assert_eq!(
        report.fatal_message(),
        Some("These columns are invalid: (x, y)...Supported columns are: (a, b, c)")
    );
    assert!(report.columns.is_empty());
}

#[test]
fn valid_row_is_fixed_with_typed_value() {
    let report = run("a,b\n1,2", &ab_schema());

    assert!(report.is_clean());
    assert_eq!(report.columns, vec!["a", "b"]);
    assert_eq!(report.data_source.len(), 1);
    assert_eq!(record_json(&report.data_source[0]), json!({"lineNo": "2", "a": "1", "b": "2"}));
    assert_eq!(
        serde_json::to_value(&report.schema_fixes[0]).unwrap(),
        json!({"lineNo": "2", "a": "1", "b": 2})
    );
}

#[test]
fn invalid_row_stays_in_data_source_with_field_errors() {
    let report = run("a,b\n1,x", &ab_schema());

    assert_eq!(record_json(&report.data_source[0]), json!({"lineNo": "2", "a": "1", "b": "x"}));
    assert!(report.schema_fixes.is_empty());

    let errors = report.row_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].current_row.index, 0);
    assert_eq!(errors[0].invalid_fields.len(), 1);
    assert_eq!(errors[0].invalid_fields["b"], "Expected integer, received 'x'");
}

#[test]
fn blank_rows_leave_no_trace_and_line_numbers_follow_source() {
    let report = run("a,b\n\n5,6\n , ;\n7,8\n", &ab_schema());

    assert!(report.is_clean());
    let line_nos: Vec<usize> = report.data_source.iter().map(Record::line_no).collect();
    assert_eq!(line_nos, vec![3, 5]);
    let fixed_line_nos: Vec<usize> = report.schema_fixes.iter().map(|f| f.line_no()).collect();
    assert_eq!(fixed_line_nos, vec![3, 5]);
}

#[test]
fn extra_values_are_dropped() {
    let report = run("a,b\n1,2,3,4,,\n", &ab_schema());
    assert!(report.is_clean());
    assert_eq!(report.data_source[0].len(), 2);
}

#[test]
fn quoted_commas_and_crlf_are_normalized() {
    let schema = SchemaDefinition::new(ColumnCatalog::from_names(["name", "city"]), PassThrough);
    let report = run("name,city\r\n\"Doe, John\",\"Paris; FR\"\r\n", &schema);

    assert_eq!(report.data_source[0].get("name"), Some("Doe John"));
    assert_eq!(report.data_source[0].get("city"), Some("Paris FR"));
}

#[test]
fn semicolon_header_rows_still_split_on_comma_by_default() {
    let schema = SchemaDefinition::new(ColumnCatalog::from_names(["a", "b"]), PassThrough);
    let report = run("a;b\n1;2\n", &schema);

    assert_eq!(report.columns, vec!["a", "b"]);
    assert_eq!(record_json(&report.data_source[0]), json!({"lineNo": "2", "a": "12"}));
}

#[test]
fn semicolon_rows_split_when_header_separator_is_selected() {
    let schema = SchemaDefinition::new(ColumnCatalog::from_names(["a", "b"]), PassThrough);
    let opts = IngestionOptions {
        row_separator: RowSeparator::Header,
        ..Default::default()
    };
    let report = ingest(&RawInput::text("a;b\n1;2\n"), &schema, &opts).unwrap();

    assert_eq!(record_json(&report.data_source[0]), json!({"lineNo": "2", "a": "1", "b": "2"}));
}

#[test]
fn empty_content_yields_empty_report() {
    let report = run("", &ab_schema());
    assert_eq!(report, Report::default());

    let empty = ingest(&RawInput::new(Vec::<u8>::new(), InputFormat::Text), &ab_schema(), &IngestionOptions::default())
        .unwrap();
    assert!(empty.is_clean());
}

#[test]
fn unexpected_failure_collapses_error_state_but_run_continues() {
    let validator = |r: &Record| -> ValidationResult {
        match r.get("a") {
            Some("boom") => Err(ValidationFailure::Unexpected("rule table missing".into())),
            Some("bad") => Err(ValidationFailure::Fields(vec![FieldIssue::new("a", "bad value")])),
            _ => PassThrough.validate(r),
        }
    };
    let schema = SchemaDefinition::new(ColumnCatalog::from_names(["a"]), validator);
    let report = run("a\nbad\nboom\nbad\nok\n", &schema);

    assert_eq!(report.error_state, Some(ErrorState::Fatal(UNEXPECTED_ERROR_MESSAGE.to_string())));
    assert_eq!(report.data_source.len(), 4);
    assert_eq!(report.schema_fixes.len(), 1);
    assert_eq!(report.schema_fixes[0].line_no(), 5);
}

#[test]
fn field_errors_accumulate_in_file_order() {
    let report = run("a,b\n1,0\n1,5\nx,\n", &ab_schema());

    let errors = report.row_errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].current_row.data.line_no(), 2);
    assert_eq!(errors[0].invalid_fields["b"], "Number must be greater than 1");
    assert_eq!(errors[1].current_row.data.line_no(), 4);
    assert_eq!(errors[1].invalid_fields["b"], "Required");
    assert_eq!(report.schema_fixes.len(), 1);
}

#[test]
fn exported_rows_reingest_to_same_records() {
    let columns = vec!["a".to_string(), "b".to_string()];
    let bytes = to_delimited_bytes(&columns, &[vec!["1".to_string(), "2".to_string()]]).unwrap();

    let schema = SchemaDefinition::new(ColumnCatalog::from_names(["a", "b"]), PassThrough);
    let report = ingest(&RawInput::new(bytes, InputFormat::Text), &schema, &IngestionOptions::default()).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.data_source.len(), 1);
    assert_eq!(record_json(&report.data_source[0]), json!({"lineNo": "2", "a": "1", "b": "2"}));
}

#[test]
fn fixes_table_round_trips_through_export() {
    let first = run("a,b\n1,2\n3,x\n4,5\n", &ab_schema());
    let (columns, rows) = first.fixes_table();
    assert_eq!(rows, vec![vec!["1", "2"], vec!["4", "5"]]);

    let bytes = to_delimited_bytes(&columns, &rows).unwrap();
    let second = ingest(&RawInput::new(bytes, InputFormat::Text), &ab_schema(), &IngestionOptions::default()).unwrap();
    assert!(second.is_clean());
    assert_eq!(second.schema_fixes.len(), 2);
    assert_eq!(second.schema_fixes[1].get("b"), Some(&json!(5)));
}

#[test]
fn field_errors_serialize_in_validator_order() {
    let schema = SchemaDefinition::new(
        ColumnCatalog::from_names(["a", "z"]),
        TypedSchema::new(vec![FieldSpec::new("z", DataType::Int64), FieldSpec::new("a", DataType::Int64)]),
    );
    let report = run("a,z\nx,y\n", &schema);

    assert_eq!(
        serde_json::to_string(&report.error_state).unwrap(),
        r#"[{"currentRow":{"index":0,"data":{"lineNo":"2","a":"x","z":"y"}},"invalidFields":{"z":"Expected integer, received 'y'","a":"Expected integer, received 'x'"}}]"#
    );
}
