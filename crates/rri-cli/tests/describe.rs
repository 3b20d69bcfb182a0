use assert_cmd::cargo::cargo_bin_cmd;
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;

#[derive(Deserialize)]
struct Row {
    rri: f64,
    hr: f64,
}

#[derive(Deserialize)]
struct InfoPoincare {
    sd1: f64,
    sd2: f64,
    x: Vec<f64>,
    y: Vec<f64>,
}

fn sample_path(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("test_data")
        .join(name)
        .to_string_lossy()
        .to_string()
}

#[test]
fn describe_emits_rri_and_hr_columns() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("rri");
    cmd.args(["describe", "--input", &sample_path("tiny_rri.txt")]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let table: HashMap<String, Row> = serde_json::from_slice(&out)?;
    assert_eq!(table.len(), 7);
    let min = &table["min"];
    let max = &table["max"];
    assert!(min.rri <= max.rri);
    // the shortest interval is the fastest beat
    assert!((max.hr - 60_000.0 / min.rri).abs() < 1e-9);
    assert!((table["amplitude"].rri - (max.rri - min.rri)).abs() < 1e-9);
    Ok(())
}

#[test]
fn describe_text_table_from_stdin() {
    let mut cmd = cargo_bin_cmd!("rri");
    cmd.args(["describe", "--text"])
        .write_stdin("800\n810\n815\n750\n");
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).expect("utf8 output");
    assert!(text.contains("                   rri          hr\n"));
    assert!(text.contains("mean            793.75       75.67\n"));
}

#[test]
fn info_reports_summary() {
    let mut cmd = cargo_bin_cmd!("rri");
    cmd.args(["info", "--interpolated"])
        .write_stdin("800\n810\n815\n750\n");
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).expect("utf8 output");
    assert_eq!(
        text,
        "N Points: 4\nDuration: 2.38s\nInterpolated: True\nDetrended: False\nMemory Usage: 0.03Kb\n"
    );
}

#[test]
fn reads_polar_hrm() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("rri");
    cmd.args(["poincare", "--input", &sample_path("sample.hrm")]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let summary: InfoPoincare = serde_json::from_slice(&out)?;
    assert_eq!(summary.x.len(), 39);
    assert_eq!(summary.y.len(), 39);
    assert!(summary.sd1 > 0.0);
    assert!(summary.sd2 > 0.0);
    Ok(())
}

#[test]
fn rejects_non_positive_intervals() {
    let mut cmd = cargo_bin_cmd!("rri");
    cmd.args(["describe"]).write_stdin("800\n0\n815\n");
    let out = cmd.assert().failure().get_output().stderr.clone();
    let text = String::from_utf8(out).expect("utf8 output");
    assert!(text.contains("rri series can only have positive values"));
}
