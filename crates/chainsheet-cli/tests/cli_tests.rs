//! Integration tests for all CLI commands
//!
//! Each test runs in its own temporary directory with `HOME` pointed at it,
//! so no user or project config leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a CLI command isolated in `dir`
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chainsheet"));
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

/// Write sparse `(row, col, value)` cells as a CSV file; values must not
/// contain commas, quotes or newlines
fn write_sheet(dir: &Path, name: &str, cells: &[(usize, usize, &str)]) -> PathBuf {
    let rows = cells.iter().map(|c| c.0).max().map_or(0, |r| r + 1);
    let cols = cells.iter().map(|c| c.1).max().map_or(0, |c| c + 1);
    let mut table = vec![vec![""; cols]; rows];
    for &(r, c, value) in cells {
        table[r][c] = value;
    }
    let content: String = table.iter().map(|row| row.join(",") + "\n").collect();

    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn supply_map(dir: &Path, name: &str) -> PathBuf {
    write_sheet(
        dir,
        name,
        &[
            (0, 0, "Vendor Number"),
            (0, 1, "V-9"),
            (2, 4, "Component Breakdown"),
            (3, 4, "Wool"),
            (3, 5, "100%"),
            (11, 0, "Farm"),
            (11, 1, "Document Group 1"),
            (11, 2, "Scourer"),
            (12, 0, "Sheep Station"),
            (16, 1, "2024-07-01"),
            (17, 1, "300"),
            (18, 1, "Shearing log"),
        ],
    )
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ============ PARSE COMMAND TESTS ============

#[test]
fn test_parse_help() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("parse")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Parse one spreadsheet"));
}

#[test]
fn test_parse_prints_json() {
    let dir = TempDir::new().unwrap();
    let input = supply_map(dir.path(), "map.csv");

    let output = cli(dir.path()).arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["header"]["vendor_number"], "V-9");
    assert_eq!(json["components"][0]["name"], "Wool");
    assert_eq!(json["components"][0]["percent"], 100.0);
    assert_eq!(json["nodes"][0]["left_party"], "Sheep Station");
    assert_eq!(json["nodes"][0]["right_type"], "Scourer");
    assert_eq!(json["nodes"][0]["quantity"], "300");
    assert_eq!(json["nodes"][0]["documents"][0], "Shearing log");
    assert_eq!(json["details"], serde_json::json!([]));
}

#[test]
fn test_parse_record() {
    let dir = TempDir::new().unwrap();
    let input = supply_map(dir.path(), "wool map.csv");

    let output = cli(dir.path())
        .arg("parse")
        .arg(&input)
        .arg("--record")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["status"], "completed");
    assert_eq!(json["original_filename"], "wool_map.csv");
    assert!(json["stored_filename"]
        .as_str()
        .unwrap()
        .ends_with("_wool_map.csv"));
    let header: serde_json::Value =
        serde_json::from_str(json["header_json"].as_str().unwrap()).unwrap();
    assert_eq!(header["vendor_number"], "V-9");
}

#[test]
fn test_parse_to_file_pretty() {
    let dir = TempDir::new().unwrap();
    let input = supply_map(dir.path(), "map.csv");
    let out = dir.path().join("out.json");

    cli(dir.path())
        .args(["parse", "--pretty", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("\n  \"header\""));
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["nodes"][0]["date"], "2024-07-01");
}

#[test]
fn test_parse_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "hello").unwrap();

    cli(dir.path())
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported input format"));
}

#[test]
fn test_parse_missing_file() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args(["parse", "missing.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.csv"));
}

// ============ BATCH COMMAND TESTS ============

#[test]
fn test_batch_all_succeed() {
    let dir = TempDir::new().unwrap();
    let a = supply_map(dir.path(), "a.csv");
    let b = supply_map(dir.path(), "b.csv");

    cli(dir.path())
        .arg("batch")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 total, 2 completed, 0 failed"));
}

#[test]
fn test_batch_continue_on_error() {
    let dir = TempDir::new().unwrap();
    let good = supply_map(dir.path(), "good.csv");
    let bad = dir.path().join("bad.xlsx");
    fs::write(&bad, "not a workbook").unwrap();
    let records = dir.path().join("records");

    cli(dir.path())
        .arg("batch")
        .arg(&bad)
        .arg(&good)
        .arg("--continue-on-error")
        .arg("--output-dir")
        .arg(&records)
        .assert()
        .failure()
        .stdout(predicate::str::contains("2 total, 1 completed, 1 failed"));

    let mut statuses: Vec<String> = fs::read_dir(&records)
        .unwrap()
        .map(|entry| {
            let content = fs::read_to_string(entry.unwrap().path()).unwrap();
            let json: serde_json::Value = serde_json::from_str(&content).unwrap();
            json["status"].as_str().unwrap().to_string()
        })
        .collect();
    statuses.sort();
    assert_eq!(statuses, vec!["completed", "failed"]);
}

#[test]
fn test_batch_stops_on_first_error() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.xlsx");
    fs::write(&bad, "not a workbook").unwrap();
    let good = supply_map(dir.path(), "good.csv");

    cli(dir.path())
        .arg("batch")
        .arg(&bad)
        .arg(&good)
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 total, 0 completed, 1 failed"));
}

#[test]
fn test_batch_output_dir_from_config() {
    let dir = TempDir::new().unwrap();
    let input = supply_map(dir.path(), "map.csv");
    fs::write(
        dir.path().join(".chainsheet.toml"),
        "[output]\noutput_dir = \"from_config\"\n",
    )
    .unwrap();

    cli(dir.path()).arg("batch").arg(&input).assert().success();

    let written: Vec<_> = fs::read_dir(dir.path().join("from_config"))
        .unwrap()
        .collect();
    assert_eq!(written.len(), 1);
}

// ============ CONFIG COMMAND TESTS ============

#[test]
fn test_config_defaults() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity_row = 17"))
        .stdout(predicate::str::contains("pretty = false"));
}

#[test]
fn test_config_precedence() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".chainsheet.toml"),
        "[template.nodes]\nquantity_row = 20\nmaterial_row = 8\n",
    )
    .unwrap();
    let explicit = dir.path().join("custom.toml");
    fs::write(&explicit, "[template.nodes]\nquantity_row = 21\n").unwrap();

    cli(dir.path())
        .arg("config")
        .arg("--config")
        .arg(&explicit)
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity_row = 21"))
        .stdout(predicate::str::contains("material_row = 8"));
}

#[test]
fn test_config_shifts_template() {
    let dir = TempDir::new().unwrap();
    let input = supply_map(dir.path(), "map.csv");
    let explicit = dir.path().join("shifted.toml");
    fs::write(&explicit, "[template.nodes]\ncompany_type_row = 12\n").unwrap();

    let output = cli(dir.path())
        .arg("parse")
        .arg(&input)
        .arg("--config")
        .arg(&explicit)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["nodes"], serde_json::json!([]));
}

#[test]
fn test_invalid_explicit_config() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("broken.toml");
    fs::write(
        &explicit,
        "[template.nodes]\ndocuments_start_row = 30\ndocuments_end_row = 20\n",
    )
    .unwrap();

    cli(dir.path())
        .arg("config")
        .arg("--config")
        .arg(&explicit)
        .assert()
        .failure()
        .stderr(predicate::str::contains("documents_start_row"));
}

#[test]
fn test_broken_project_config_is_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".chainsheet.toml"), "this is [not toml").unwrap();

    cli(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity_row = 17"));
}
