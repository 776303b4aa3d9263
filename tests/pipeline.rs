//! End-to-end: export file -> row source -> analysis -> statistics -> report.

use std::io::Write;
use std::path::Path;

use delivery_stats::{open_source, Analysis, InputSettings, MonthKey, Report, Settings};
use tempfile::NamedTempFile;

fn milestones(events: &[(&str, Option<&str>)]) -> String {
    let items: Vec<serde_json::Value> = events
        .iter()
        .map(|(label, ts)| serde_json::json!({ "value": label, "dateTime": ts }))
        .collect();
    serde_json::Value::Array(items).to_string()
}

fn shipment(booked: &str, delivered: &str) -> String {
    milestones(&[
        ("Booking Confirmed", Some(booked)),
        ("Delivered to Consignee", Some(delivered)),
    ])
}

fn csv_escape(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn write_csv(rows: &[(&str, String)]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "shipment_id,kind,milestones").unwrap();
    for (i, (kind, payload)) in rows.iter().enumerate() {
        writeln!(file, "{},{},{}", i, kind, csv_escape(payload)).unwrap();
    }
    file
}

fn analyse(path: &Path, settings: &Settings) -> Analysis {
    let mut source = open_source(path, &settings.input).unwrap();
    let rows = source.read_rows().unwrap();
    Analysis::run(rows, &settings.milestones)
}

#[test]
fn csv_export_produces_mean_and_tp90_per_bucket() {
    let file = write_csv(&[
        ("fcl", shipment("2023-01-01T00:00:00Z", "2023-01-03T00:00:00Z")),
        ("fcl", shipment("2023-01-05T00:00:00Z", "2023-01-10T06:00:00Z")),
        ("fcl", shipment("2023-01-20T00:00:00Z", "2023-01-29T00:00:00Z")),
        ("lcl", shipment("2023-02-01T00:00:00+02:00", "2023-02-15T00:00:00+02:00")),
        ("", shipment("2023-02-03T00:00:00Z", "2023-02-04T00:00:00Z")),
    ]);

    let analysis = analyse(file.path(), &Settings::default());
    let stats = analysis.statistics();

    let jan = MonthKey::new(2023, 1).unwrap();
    let feb = MonthKey::new(2023, 2).unwrap();

    assert!((stats.mean[&jan]["fcl"] - 16.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.tp90[&jan]["fcl"], 9.0);
    assert_eq!(stats.mean[&feb]["lcl"], 14.0);
    assert_eq!(stats.tp90[&feb]["NULL"], 1.0);
    assert_eq!(analysis.summary.rows, 5);
    assert_eq!(analysis.summary.aggregated, 5);
}

#[test]
fn malformed_and_untimestamped_rows_are_left_out() {
    let file = write_csv(&[
        ("fcl", shipment("2023-03-01T00:00:00Z", "2023-03-04T00:00:00Z")),
        ("fcl", "[{\"value\": \"Booking Confirmed\"".to_string()),
        ("fcl", milestones(&[("Booking Confirmed", None), ("Delivered to Consignee", Some("null"))])),
        ("fcl", milestones(&[("Gate In", Some("2023-03-02T00:00:00Z"))])),
    ]);

    let analysis = analyse(file.path(), &Settings::default());
    let summary = analysis.summary;
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.malformed_payloads, 1);
    assert_eq!(summary.excluded, 2);
    assert_eq!(summary.missing_endpoints, 3);
    assert_eq!(summary.aggregated, 2);

    let stats = analysis.statistics();
    let mar = MonthKey::new(2023, 3).unwrap();
    assert_eq!(stats.mean.len(), 1);
    assert_eq!(stats.mean[&mar]["fcl"], 1.5);
    assert_eq!(stats.tp90[&mar]["fcl"], 3.0);
}

#[test]
fn positional_columns_without_headers() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    let payload = shipment("2023-05-01T00:00:00Z", "2023-05-08T00:00:00Z");
    writeln!(file, "a|b|c|d|{}|f|g|h|fcl", csv_escape(&payload)).unwrap();

    let settings = Settings {
        input: InputSettings {
            kind_column: "8".to_string(),
            milestones_column: "4".to_string(),
            has_headers: false,
            delimiter: "|".to_string(),
            ..InputSettings::default()
        },
        ..Settings::default()
    };

    let stats = analyse(file.path(), &settings).statistics();
    assert_eq!(stats.mean[&MonthKey::new(2023, 5).unwrap()]["fcl"], 7.0);
}

#[test]
fn json_lines_input_renders_json_report() {
    let mut file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
    for (kind, days) in [("fcl", 2), ("fcl", 4), ("lcl", 6)] {
        let delivered = format!("2023-07-{:02}T00:00:00Z", 1 + days);
        let row = serde_json::json!({
            "kind": kind,
            "milestones": shipment("2023-07-01T00:00:00Z", &delivered),
        });
        writeln!(file, "{}", row).unwrap();
    }
    writeln!(file, "{}", serde_json::json!({ "milestones": "[]" })).unwrap();

    let analysis = analyse(file.path(), &Settings::default());
    let stats = analysis.statistics();
    let json = Report::new(&analysis.summary, &stats).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["summary"]["rows"], 3);
    assert_eq!(value["mean"]["Jul'23"]["fcl"], 3.0);
    assert_eq!(value["tp90"]["Jul'23"]["fcl"], 4.0);
    assert_eq!(value["tp90"]["Jul'23"]["lcl"], 6.0);
}

#[test]
fn unreadable_input_is_fatal() {
    let settings = Settings::default();
    let mut source = open_source(Path::new("/nonexistent/shipments.csv"), &settings.input).unwrap();
    assert!(source.read_rows().is_err());
}

#[test]
fn irregular_milestone_elements_do_not_discard_the_shipment() {
    let file = write_csv(&[
        (
            "fcl",
            r#"[null, {"value": "Booking Confirmed", "dateTime": "2023-04-01T00:00:00Z"},
                {"value": "Delivered to Consignee", "dateTime": "2023-04-05T00:00:00Z"}]"#
                .to_string(),
        ),
        (
            "fcl",
            r#"[{"value": 5, "dateTime": "2023-04-02T00:00:00Z"},
                {"value": "Booking Confirmed", "dateTime": "2023-04-02T00:00:00Z"},
                {"value": "Delivered to Consignee", "dateTime": "2023-04-08T00:00:00Z"}]"#
                .to_string(),
        ),
    ]);

    let analysis = analyse(file.path(), &Settings::default());
    assert_eq!(analysis.summary.malformed_payloads, 0);
    assert_eq!(analysis.summary.aggregated, 2);

    let stats = analysis.statistics();
    let apr = MonthKey::new(2023, 4).unwrap();
    assert_eq!(stats.mean[&apr]["fcl"], 5.0);
    assert_eq!(stats.tp90[&apr]["fcl"], 6.0);
}
