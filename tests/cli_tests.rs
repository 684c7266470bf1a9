//! CLI integration tests for cribdrag.

use std::fs;
use std::path::Path;
use std::process::Command;

fn cribdrag_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cribdrag"))
}

fn write_scenario(dir: &Path, ciphertexts: &[&str], cribs: &[&str]) -> std::path::PathBuf {
    let scenario = serde_json::json!({
        "output_dir": dir.join("results"),
        "ciphertexts": ciphertexts.iter().map(|data| serde_json::json!({ "data": data })).collect::<Vec<_>>(),
        "cribs": cribs,
    });
    let path = dir.join("scenario.json");
    fs::write(&path, scenario.to_string()).expect("Failed to write scenario");
    path
}

#[test]
fn test_cli_help() {
    let output = cribdrag_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute cribdrag");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--input"));
    assert!(stdout.contains("--output-dir"));
    assert!(stdout.contains("--crib"));
}

#[test]
fn test_cli_version() {
    let output = cribdrag_cmd()
        .arg("--version")
        .output()
        .expect("Failed to execute cribdrag");

    assert!(output.status.success());
}

#[test]
fn test_cli_quiet_success() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(dir.path(), &["414243", "414243"], &["ABC"]);
    let output = cribdrag_cmd()
        .arg("--input")
        .arg(&scenario)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute cribdrag");

    assert_eq!(Some(0), output.status.code());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());

    let report = fs::read_to_string(dir.path().join("results").join("ABC.txt")).unwrap();
    assert_eq!(
        "==================== Results for C1_XOR_C2: ====================\nPosition 0: ABC\n",
        report,
    );
}

#[test]
fn test_cli_extra_cribs_and_output_override() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(dir.path(), &["414243", "414243", "414243"], &[]);
    let out = dir.path().join("elsewhere");
    let output = cribdrag_cmd()
        .arg("-i")
        .arg(&scenario)
        .arg("-o")
        .arg(&out)
        .args(["--crib", " to ", "-c", "xy"])
        .output()
        .expect("Failed to execute cribdrag");

    assert_eq!(Some(0), output.status.code());
    assert!(out.join("to.txt").exists());
    assert!(out.join("xy.txt").exists());
    assert!(!dir.path().join("results").exists());

    let report = fs::read_to_string(out.join("xy.txt")).unwrap();
    assert_eq!(3, report.matches("==================== Results for").count());
    assert!(report.contains("Results for C2_XOR_C3:"));
}

#[test]
fn test_cli_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    for dir in [first.path(), second.path()] {
        let status = cribdrag_cmd()
            .arg("--output-dir")
            .arg(dir)
            .status()
            .expect("Failed to execute cribdrag");
        assert!(status.success());
    }

    let mut names: Vec<_> = fs::read_dir(first.path()).unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    names.sort();
    assert!(names.iter().any(|name| name == "PLAINTEXT_1.txt"));
    for name in names {
        assert_eq!(
            fs::read(first.path().join(&name)).unwrap(),
            fs::read(second.path().join(&name)).unwrap(),
        );
    }
}

#[test]
fn test_cli_malformed_hex() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = write_scenario(dir.path(), &["414243", "41424"], &["ABC"]);
    let output = cribdrag_cmd()
        .arg("--input")
        .arg(&scenario)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute cribdrag");

    assert_eq!(Some(1), output.status.code());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(1, stderr.lines().count());
    assert!(stderr.contains("not valid hex"));
    assert!(!dir.path().join("results").exists());
}

#[test]
fn test_cli_nonexistent_input() {
    let output = cribdrag_cmd()
        .arg("--input")
        .arg("/nonexistent/scenario.json")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute cribdrag");

    assert_eq!(Some(1), output.status.code());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unable to read"));
}
