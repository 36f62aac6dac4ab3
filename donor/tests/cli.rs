use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const GOOD: &str = r#"{
  "name": "good",
  "functions": [{
    "name": "main",
    "tags": { "program": true },
    "args": [ { "name": "x", "value": 0, "donated": true } ],
    "ops": [
      { "id": 0, "kind": { "op": "call_like", "callee": "step", "inputs": [0], "outputs": [1],
                           "io_aliases": [ { "input": 0, "output": 0 } ] } },
      { "id": 1, "kind": { "op": "return", "operands": [1] } }
    ]
  }]
}"#;

const BAD: &str = r#"{
  "name": "bad",
  "source_file": "bad.ir",
  "functions": [
    {
      "name": "first",
      "tags": { "program": true },
      "args": [ { "name": "x", "value": 0, "donated": true } ],
      "ops": [
        { "id": 0, "span": { "offset": 13, "len": 7 },
          "kind": { "op": "transfer_like", "kind": "reshard", "inputs": [0], "outputs": [1], "donated": true } },
        { "id": 1, "span": { "offset": 23, "len": 4 },
          "kind": { "op": "transfer_like", "kind": "copy_arrays", "inputs": [0], "outputs": [2] } },
        { "id": 2, "kind": { "op": "return", "operands": [] } }
      ]
    },
    {
      "name": "second",
      "tags": { "reshard": true },
      "args": [ { "name": "y", "value": 0 } ],
      "ops": [
        { "id": 0, "kind": { "op": "transfer_like", "kind": "remap_arrays", "inputs": [0], "outputs": [1], "donated": true } },
        { "id": 1, "kind": { "op": "return", "operands": [1] } }
      ]
    }
  ]
}"#;

const BAD_SOURCE: &str = "func @first\n  reshard\n  copy\n";

fn donor(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_donor"))
        .args(args)
        .current_dir(dir)
        .env_remove("DONOR_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("run donor")
}

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).expect("write fixture");
}

#[test]
fn verify_accepts_clean_module() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "good.json", GOOD);

    let out = donor(&["verify", "good.json"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("1 function(s) checked"), "{stdout}");
}

#[test]
fn verify_rejects_double_donation_and_writes_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "bad.json", BAD);
    write(dir.path(), "bad.ir", BAD_SOURCE);

    let out = donor(&["verify", "bad.json", "--report", "out/report.json"], dir.path());
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("donor::double_donation"), "{stderr}");

    let text = fs::read_to_string(dir.path().join("out/report.json")).expect("report");
    let json: serde_json::Value = serde_json::from_str(&text).expect("report json");
    assert_eq!(json["ok"], false);
    assert_eq!(json["failures"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["failures"][0]["kind"], "double-donation");
    assert_eq!(json["failures"][0]["origin"]["line_col"]["line"], 2);
}

#[test]
fn keep_going_from_config_reports_every_function() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "bad.json", BAD);
    write(dir.path(), "bad.ir", BAD_SOURCE);
    write(dir.path(), "donor.toml", "[verify]\nkeep_going = true\nparallel = false\n");

    let out = donor(&["verify", "bad.json", "--report", "report.json"], dir.path());
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("2 function(s) failed"), "{stderr}");

    let text = fs::read_to_string(dir.path().join("report.json")).expect("report");
    let json: serde_json::Value = serde_json::from_str(&text).expect("report json");
    assert_eq!(json["failures"][1]["kind"], "missing-donation-attribute");
}

#[test]
fn bad_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "good.json", GOOD);
    write(dir.path(), "donor.toml", "[verify]\nkeep_gong = true\n");

    let out = donor(&["verify", "good.json"], dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("donor::config"));
}

#[test]
fn print_lists_the_ir() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "good.json", GOOD);

    let out = donor(&["print", "good.json"], dir.path());
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("func @main(%arg0 {donated}) attributes {program}"), "{stdout}");
    assert!(stdout.contains("%1 = call @step(%arg0) io_aliases [0 -> 0]"), "{stdout}");
}
