//! End-to-end tests driving the patron-gen binary.

use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn patron_gen_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_patron-gen"))
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("patrons.json");
    fs::write(&path, content).unwrap();
    path
}

const SAMPLE_CONFIG: &str = r#"[
  {
    "name": "p1",
    "config": [
      {"op": "insert", "cnt": 2, "db": "d", "col": "c",
       "adv": {"values": ["x"], "keys": ["k"], "mn_docs_cnt": 1, "mx_docs_cnt": 1, "mn_keys_cnt": 1, "mx_keys_cnt": 1}}
    ]
  },
  {
    "name": "p2",
    "config": [
      {"cmds": [{"op": "c", "db": "d", "dc": {"drop": "c"}}]},
      {"op": "insert", "cnt": 3, "db": "d", "col": "c"}
    ]
  }
]"#;

#[test]
fn test_generate_writes_patron_files() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, SAMPLE_CONFIG);
    let out = dir.path().join("out");

    let output = patron_gen_bin()
        .arg("generate")
        .arg(&config)
        .arg("--output")
        .arg(&out)
        .arg("--seed")
        .arg("42")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let p1: Vec<Value> =
        serde_json::from_str(&fs::read_to_string(out.join("p1.json")).unwrap()).unwrap();
    assert_eq!(p1.len(), 2);
    assert_eq!(p1[0]["dc"]["documents"][0]["k"], "x");

    let p2: Vec<Value> =
        serde_json::from_str(&fs::read_to_string(out.join("p2.json")).unwrap()).unwrap();
    assert_eq!(p2.len(), 4);
    assert_eq!(p2[0]["id"], 1);
    assert_eq!(p2[3]["id"], 4);
}

#[test]
fn test_generate_json_summary() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, SAMPLE_CONFIG);

    let output = patron_gen_bin()
        .arg("generate")
        .arg(&config)
        .arg("--output")
        .arg(dir.path())
        .arg("--seed")
        .arg("7")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["seed"], 7);
    assert_eq!(summary["total_records"], 6);
    assert_eq!(summary["patrons"].as_array().unwrap().len(), 2);
}

#[test]
fn test_generate_dry_run() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, SAMPLE_CONFIG);
    let out = dir.path().join("out");

    let output = patron_gen_bin()
        .arg("generate")
        .arg(&config)
        .arg("--output")
        .arg(&out)
        .arg("--dry-run")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(!out.exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Records: 6"), "{stderr}");
}

#[test]
fn test_generate_fails_on_conflicting_block() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"[{"name":"bad","config":[{"op":"insert","cnt":1,"cmds":[{"op":"x"}]}]}]"#,
    );

    let output = patron_gen_bin()
        .arg("generate")
        .arg(&config)
        .arg("--output")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot generate patron bad"), "{stderr}");
    assert!(!dir.path().join("bad.json").exists());
}

#[test]
fn test_generate_missing_config() {
    let output = patron_gen_bin()
        .arg("generate")
        .arg("/nonexistent/patrons.json")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_check_valid_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, SAMPLE_CONFIG);

    let output = patron_gen_bin()
        .arg("check")
        .arg(&config)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["patrons"][1]["planned_records"], 4);
    // check never writes patron files
    assert!(!dir.path().join("p1.json").exists());
}

#[test]
fn test_check_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"[{"name":"a","config":[{"op":"insert","cnt":1}]},{"name":"b","config":[{"op":"nope","cnt":1}]}]"#,
    );

    let output = patron_gen_bin().arg("check").arg(&config).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 of 2 patrons are invalid"), "{stderr}");
    assert!(stderr.contains("nope"), "{stderr}");
}

#[test]
fn test_schema_list() {
    let output = patron_gen_bin()
        .arg("schema")
        .arg("--list")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = stdout.lines().collect();
    assert_eq!(names, vec!["check", "config", "generate", "insert-adv"]);
}

#[test]
fn test_schema_unknown_name() {
    let output = patron_gen_bin()
        .arg("schema")
        .arg("bogus")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown schema"));
}

#[test]
fn test_completions() {
    let output = patron_gen_bin()
        .arg("completions")
        .arg("bash")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("patron-gen"));
}
