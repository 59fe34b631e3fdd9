// End-to-end tests for the notcore-dedup binary: exit codes, --json stdout
// contract, and human output.
//
// Run with: cargo test -p notcore-cli --test cli_tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn dedup() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_notcore-dedup"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("NOTCORE_LOCALE").env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../dedup/tests/fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    dedup().args(args).output().expect("spawn notcore-dedup")
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn stdout(o: &Output) -> String {
    String::from_utf8_lossy(&o.stdout).into_owned()
}

fn stderr(o: &Output) -> String {
    String::from_utf8_lossy(&o.stderr).into_owned()
}

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

const FULL_NAME_CONFIG: &str = "name = \"t\"\noperator = \"OR\"\ntypes = [\"FullName\"]\n";

// ===========================================================================
// check
// ===========================================================================

#[test]
fn duplicates_exit_one_with_single_json_value() {
    let config = fixture("registration.dedup.toml");
    let input = fixture("individuals.csv");
    let out = run(&["check", path_str(&config), "--input", path_str(&input), "--json"]);

    assert_eq!(out.status.code(), Some(1), "stderr: {}", stderr(&out));
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\n{}", stdout(&out)));

    assert_eq!(val["meta"]["config_name"], "Registration batch");
    assert_eq!(val["meta"]["types"], serde_json::json!(["Ids", "Names"]));
    assert_eq!(val["summary"]["rows"], 10);
    assert_eq!(val["summary"]["rows_with_persisted_matches"], 0);
    assert_eq!(val["file_duplicates"].as_array().unwrap().len(), 10);
    assert!(stderr(&out).contains("problem(s) found"));
}

#[test]
fn existing_records_are_matched() {
    let config = fixture("registration.dedup.toml");
    let input = fixture("individuals.csv");
    let existing = fixture("persisted.csv");
    let out = run(&[
        "check",
        path_str(&config),
        "--input",
        path_str(&input),
        "--existing",
        path_str(&existing),
        "--json",
    ]);

    assert_eq!(out.status.code(), Some(1), "stderr: {}", stderr(&out));
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(val["summary"]["rows_with_persisted_matches"], 2);
    assert_eq!(val["persisted_duplicates"]["1"], serde_json::json!(["db-2"]));
    assert_eq!(val["persisted_duplicates"]["9"], serde_json::json!(["db-1"]));
}

#[test]
fn human_output_lists_messages_and_indented_details() {
    let config = fixture("registration.dedup.toml");
    let input = fixture("individuals.csv");
    let out = run(&["check", path_str(&config), "--input", path_str(&input)]);

    assert_eq!(out.status.code(), Some(1));
    let text = stdout(&out);
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Last name: C - Row 2 and Last name: C - Row 4 in your file are duplicates")
    );
    assert_eq!(lines.next(), Some("    :: identification_number_1 :: Row 2: 1 | Row 4: 1"));
    assert!(stderr(&out).contains("Registration batch (OR Ids+Names): 10 rows"));
}

#[test]
fn locale_flag_overrides_config() {
    let config = fixture("registration.dedup.toml");
    let input = fixture("individuals.csv");
    let out = run(&["check", path_str(&config), "--input", path_str(&input), "--locale", "fr"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).starts_with("Nom : C - Ligne 2"), "{}", stdout(&out));
}

#[test]
fn custom_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "t.dedup.toml", FULL_NAME_CONFIG);
    let input = write(&dir, "batch.csv", "last_name,full_name\nDoe,Jane Doe\nRoe,Jane Doe\n");
    let catalog = write(
        &dir,
        "xx.toml",
        r#"
file_pair = "{row_a}~{row_b}"
file_detail = "{column}"
persisted_match = ""
persisted_detail = ""
identity_collision = ""
identity_participant = ""
"#,
    );
    let out = run(&[
        "check",
        path_str(&config),
        "--input",
        path_str(&input),
        "--catalog",
        path_str(&catalog),
    ]);

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "2~3\n    full_name\n");
}

#[test]
fn clean_batch_exits_zero_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "t.dedup.toml", FULL_NAME_CONFIG);
    let input = write(&dir, "batch.csv", "last_name,full_name\nDoe,Jane Doe\nRoe,Rita Roe\n");
    let report = dir.path().join("report.json");
    let out = run(&[
        "check",
        path_str(&config),
        "--input",
        path_str(&input),
        "--output",
        path_str(&report),
    ]);

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());
    let val: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(val["diagnostics"], serde_json::json!([]));
}

#[test]
fn unknown_type_is_an_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "t.dedup.toml", "operator = \"OR\"\ntypes = [\"Nickname\"]\n");
    let input = write(&dir, "batch.csv", "last_name\nDoe\n");
    let out = run(&["check", path_str(&config), "--input", path_str(&input)]);

    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("invalid deduplication type: Nickname"));
    assert!(stderr(&out).contains("notcore-dedup types"));
}

#[test]
fn ragged_batch_is_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "t.dedup.toml", FULL_NAME_CONFIG);
    let input = write(&dir, "batch.csv", "last_name,full_name\nDoe,Jane Doe\nRoe\n");
    let out = run(&["check", path_str(&config), "--input", path_str(&input)]);

    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("row 3"), "{}", stderr(&out));
}

#[test]
fn batch_missing_a_compared_column_is_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "t.dedup.toml", FULL_NAME_CONFIG);
    let input = write(&dir, "batch.csv", "last_name\nDoe\n");
    let out = run(&["check", path_str(&config), "--input", path_str(&input)]);

    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("full_name"));
}

#[test]
fn missing_input_is_a_usage_error() {
    let config = fixture("registration.dedup.toml");
    let out = run(&["check", path_str(&config), "--input", "does-not-exist.csv"]);
    assert_eq!(out.status.code(), Some(2));
}

// ===========================================================================
// validate / types
// ===========================================================================

#[test]
fn validate_reports_a_summary() {
    let config = fixture("registration.dedup.toml");
    let out = run(&["validate", path_str(&config)]);

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(stderr(&out).starts_with("valid: 'Registration batch' with 2 type(s) joined by OR"));
}

#[test]
fn validate_rejects_duplicate_types() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(&dir, "t.dedup.toml", "operator = \"AND\"\ntypes = [\"Ids\", \"Ids\"]\n");
    let out = run(&["validate", path_str(&config)]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn types_lists_the_registry_in_order() {
    let out = run(&["types"]);
    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    let names: Vec<&str> = text.lines().filter_map(|l| l.split_whitespace().next()).collect();
    assert_eq!(names.len(), 12);
    assert_eq!(names[0], "Ids");
    assert_eq!(names[8], "Names");
    assert_eq!(names[11], "MothersName");

    let json = run(&["types", "--json"]);
    let val: serde_json::Value = serde_json::from_str(stdout(&json).trim()).unwrap();
    assert_eq!(val[8]["condition"], "AND");
}
