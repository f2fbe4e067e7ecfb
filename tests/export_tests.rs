use chrono::NaiveDate;
use quote_tool::{
    ExportError, HtmlRenderer, PricingFactors, ProjectDetails, QuoteEngine, QuoteRequest,
    ValidationError, export_rows_to_csv, load_request_from_json, render_documents,
    save_reports_to_json, write_documents,
};
use std::fs;
use tempfile::{NamedTempFile, tempdir};

fn build_sample_request() -> QuoteRequest {
    let mut request = QuoteRequest::new(
        ProjectDetails::new("Export Project", "Testing export helpers"),
        PricingFactors::default(),
    );
    request.team.set_role(1, Some("Senior Software Developer")).unwrap();
    request.team.set_count(1, 3).unwrap();
    request.team.set_hours(1, 120).unwrap();
    request.team.add_row().unwrap();
    request
}

#[test]
fn request_json_loads_and_validates() {
    let request = build_sample_request();
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), serde_json::to_vec_pretty(&request).unwrap()).unwrap();

    let loaded = load_request_from_json(file.path()).unwrap();
    assert_eq!(loaded, request);
}

#[test]
fn hand_written_request_json_is_accepted() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{
            "project": {"name": "Handwritten"},
            "factors": {"client_type": "international", "discount_percent": 5},
            "team": [{"id": 4, "role": "Data Scientist", "count": 1, "hours": 80}],
            "milestones": [
                {"id": 1, "name": "Start", "percent": 40},
                {"id": 2, "name": "Finish", "percent": 60}
            ]
        }"#,
    )
    .unwrap();

    let request = load_request_from_json(file.path()).unwrap();
    assert_eq!(request.factors.overhead_factor, 1.4);
    assert_eq!(request.factors.margin_percent, 30);
    assert_eq!(request.team.rows()[0].id, 4);
    assert_eq!(request.milestones.total_percent(), 100.0);

    let outcome = QuoteEngine::default().quote(&request).unwrap();
    assert!(outcome.can_export());
    assert_eq!(outcome.currency_symbol, "$");
}

#[test]
fn invalid_request_json_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{"project": {"name": "Bad"}, "factors": {"margin_percent": 15}}"#,
    )
    .unwrap();
    let err = load_request_from_json(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ExportError::InvalidData(ValidationError::MarginPercentNotAllowed(15))
    ));

    fs::write(file.path(), "not json").unwrap();
    assert!(matches!(
        load_request_from_json(file.path()),
        Err(ExportError::Serialization(_))
    ));
}

#[test]
fn csv_lists_selected_rows_only() {
    let request = build_sample_request();
    let outcome = QuoteEngine::default().quote(&request).unwrap();
    let file = NamedTempFile::new().unwrap();

    export_rows_to_csv(&outcome.rows, file.path()).unwrap();

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "role");
    assert_eq!(&headers[10], "margin_amount");
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][0], "Senior Software Developer");
    assert_eq!(&records[0][7], "360");
    assert_eq!(
        &records[0][10],
        format!("{:.2}", outcome.rows[0].margin_amount)
    );
}

#[test]
fn documents_and_payloads_are_written_to_disk() {
    let engine = QuoteEngine::default();
    let request = build_sample_request();
    let generated_on = NaiveDate::from_ymd_opt(2025, 1, 6)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let bundle = engine.reports(&request, generated_on).unwrap();
    let documents = render_documents(&HtmlRenderer, &bundle).unwrap();
    let dir = tempdir().unwrap();

    let (internal, client) = write_documents(&documents, dir.path().join("out")).unwrap();
    assert!(internal.ends_with("Export Project Internal Quotation.html"));
    assert_eq!(fs::read(&client).unwrap(), documents.client.bytes);

    let payload_path = dir.path().join("reports.json");
    save_reports_to_json(&bundle, &payload_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_slice(&fs::read(&payload_path).unwrap()).unwrap();
    assert_eq!(value["client"]["header"]["project_name"], "Export Project");
    assert_eq!(value["internal"]["total_project_hours"], 360);
}

#[test]
fn blank_role_in_saved_request_is_an_empty_selection() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{
            "project": {"name": "Blank Rows"},
            "team": [
                {"id": 1, "role": "Data Engineer", "count": 2, "hours": 100},
                {"id": 2, "role": "", "count": 3, "hours": 50}
            ]
        }"#,
    )
    .unwrap();

    let request = load_request_from_json(file.path()).unwrap();
    assert_eq!(request.team.find_row(2).unwrap().role, None);

    let outcome = QuoteEngine::default().quote(&request).unwrap();
    assert_eq!(outcome.totals.selected_row_count, 1);
    assert_eq!(outcome.totals.total_project_hours, 200);
    assert_eq!(outcome.rows[1].total_hours, 0);
    assert!(outcome.can_export());
}

#[test]
fn saved_request_with_exhausted_ids_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{"team": [{"id": 4294967295, "role": "Data Engineer", "count": 1, "hours": 8}]}"#,
    )
    .unwrap();
    assert!(matches!(
        load_request_from_json(file.path()),
        Err(ExportError::Serialization(_))
    ));

    fs::write(
        file.path(),
        r#"{"milestones": [{"id": 4294967295, "name": "All", "percent": 100}]}"#,
    )
    .unwrap();
    assert!(matches!(
        load_request_from_json(file.path()),
        Err(ExportError::Serialization(_))
    ));
}
