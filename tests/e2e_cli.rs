mod support;

use std::fs;

use support::{HEADER, Workspace, expect_success, metrics_line};

const EXAMPLE_ROW: &str = "GET http://a:80/x,200,2,2000.00,1000.00,1000,3000,3000,3000,3000";

fn example_log() -> Vec<String> {
    vec![
        HEADER.to_owned(),
        metrics_line(1_700_000_000_500, "/x", 1000, 200),
        metrics_line(1_700_000_001_000, "/x", 3000, 200),
    ]
}

#[test]
fn e2e_csv_to_stdout_by_default() -> Result<(), String> {
    let workspace = Workspace::with_log(&example_log())?;
    let output = workspace.run(Vec::<String>::new(), &[])?;
    let (stdout, _) = expect_success(&output)?;

    if !stdout.contains("route, status, n, mean, stddev, percentiles: 0.5, 0.7, 0.8, 0.9, 0.95") {
        return Err(format!("Missing header line: {}", stdout));
    }
    if !stdout.contains(EXAMPLE_ROW) {
        return Err(format!("Missing example row: {}", stdout));
    }
    if !stdout.contains("[[read 1 summary from 3 lines") {
        return Err(format!("Missing read banner: {}", stdout));
    }
    if !stdout.contains("[start 2023-11-14T22:13:20.000Z, end 2023-11-14T22:13:21.000Z]") {
        return Err(format!("Missing run banner: {}", stdout));
    }
    Ok(())
}

#[test]
fn e2e_json_reporter() -> Result<(), String> {
    let workspace = Workspace::with_log(&example_log())?;
    let log = workspace.log().display().to_string();
    let output = workspace.run(
        ["--reporter", "json", "--output", "summary.json", log.as_str()],
        &[],
    )?;
    expect_success(&output)?;

    let text = fs::read_to_string(workspace.path().join("summary.json"))
        .map_err(|err| format!("read summary failed: {}", err))?;
    let document: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| format!("Invalid json {}: {}", err, text))?;
    let samples = document
        .pointer("/0/metrics/0/1/200")
        .ok_or_else(|| format!("Missing samples in {}", document))?;
    if samples != &serde_json::json!([1000, 3000]) {
        return Err(format!("Unexpected samples {}", samples));
    }
    if document.pointer("/0/header/entry/version") != Some(&serde_json::json!("1.2.0")) {
        return Err(format!("Missing header entry in {}", document));
    }
    Ok(())
}

#[test]
fn e2e_output_file_and_milliseconds() -> Result<(), String> {
    let workspace = Workspace::with_log(&example_log())?;
    let report_path = workspace.path().join("report.csv");
    let report_arg = report_path.display().to_string();
    let output = workspace.run(
        ["--output", report_arg.as_str(), "--microseconds=false"],
        &[],
    )?;
    let (stdout, _) = expect_success(&output)?;

    let report = fs::read_to_string(&report_path)
        .map_err(|err| format!("read report failed: {}", err))?;
    if !report.contains("GET http://a:80/x,200,2,2.00,1.00,1,3,3,3,3") {
        return Err(format!("Unexpected report {}", report));
    }
    if stdout.contains("GET http://a:80/x") {
        return Err(format!("Report leaked to stdout: {}", stdout));
    }
    if !stdout.contains("[[read 1 summary") {
        return Err(format!("Banner missing from stdout: {}", stdout));
    }
    Ok(())
}

#[test]
fn e2e_template_buckets() -> Result<(), String> {
    let mut lines = example_log();
    lines.push(metrics_line(1_700_000_002_000, "/items/7", 500, 200));
    let workspace = Workspace::with_log(&lines)?;
    let template = workspace.write(
        "buckets.json",
        r#"{"version": "1.0.0", "routes": [{"name": "items", "method": "GET", "regex": "^/items/"}]}"#,
    )?;
    let template_arg = template.display().to_string();
    let output = workspace.run(["--template", template_arg.as_str()], &[])?;
    let (stdout, _) = expect_success(&output)?;

    if !stdout.contains("items,200,1,500.00,0.00,500,500,500,500,500") {
        return Err(format!("Missing template bucket: {}", stdout));
    }
    if !stdout.contains(EXAMPLE_ROW) {
        return Err(format!("Missing unmatched route: {}", stdout));
    }
    Ok(())
}

#[test]
fn e2e_invalid_template_fails() -> Result<(), String> {
    let workspace = Workspace::with_log(&example_log())?;
    let template = workspace.write("buckets.json", r#"{"version": "9.9.9", "routes": []}"#)?;
    let template_arg = template.display().to_string();
    let output = workspace.run(["--template", template_arg.as_str()], &[])?;
    if output.status.success() {
        return Err("Expected an unknown template version to fail".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_invalid_reporter_falls_back_to_csv() -> Result<(), String> {
    let workspace = Workspace::with_log(&example_log())?;
    let output = workspace.run(
        Vec::<String>::new(),
        &[("CSI_RM_REPORTER", "xml"), ("CSI_RM_UNHEARD_OF", "1")],
    )?;
    let (stdout, stderr) = expect_success(&output)?;

    if !stdout.contains(EXAMPLE_ROW) {
        return Err(format!("Expected csv output: {}", stdout));
    }
    if !stderr.contains("CSI_RM_REPORTER=xml") || !stderr.contains("CSI_RM_UNHEARD_OF") {
        return Err(format!("Expected config diagnostics: {}", stderr));
    }
    Ok(())
}

#[test]
fn e2e_config_file_is_applied() -> Result<(), String> {
    let workspace = Workspace::with_log(&example_log())?;
    workspace.write("route-metrics.toml", "time_unit = \"ms\"\n")?;
    let output = workspace.run(Vec::<String>::new(), &[])?;
    let (stdout, _) = expect_success(&output)?;

    if !stdout.contains("GET http://a:80/x,200,2,2.00,1.00,") {
        return Err(format!("Config time unit not applied: {}", stdout));
    }
    Ok(())
}

#[test]
fn e2e_missing_log_fails() -> Result<(), String> {
    let workspace = Workspace::with_log(&[])?;
    let output = workspace.run(["does-not-exist.log"], &[])?;
    if output.status.success() {
        return Err("Expected a missing log to fail".to_owned());
    }
    Ok(())
}
