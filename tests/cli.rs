use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("windows.json"),
        r#"{
            "versions": {"10.0": 60, "6.1": 30, "6.3": 6, "5.1": 4},
            "devices": {"0x10de/0x0a20": 3, "0x8086/0x0042": 1}
        }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("snapshot.json"),
        r#"{"sessions": {
            "count": 1234567,
            "timestamp": 1465430400,
            "share": {"46": 0.4, "47": 0.6},
            "metadata": [{"info": {"channel": "*", "day_range": 14}}]
        }}"#,
    )
    .unwrap();
    dir
}

fn tchart() -> Command {
    Command::cargo_bin("tchart").unwrap()
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("tchart").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tchart"));
}

#[test]
fn series_folds_small_versions() {
    let dir = fixture();
    let mut cmd = tchart();
    cmd.args(["series", "windows.json", "--path", "versions", "--threshold", "0.05"])
        .args(["--local-dir", dir.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("10.0\t60"))
        .stdout(predicate::str::contains("6.3\t6"))
        .stdout(predicate::str::contains("Other\t4"))
        .stdout(predicate::str::contains("5.1").not());
}

#[test]
fn series_writes_csv_and_svg() {
    let dir = fixture();
    let csv = dir.path().join("out.csv");
    let svg = dir.path().join("out.svg");
    let mut cmd = tchart();
    cmd.args(["series", "windows.json", "-p", "versions", "-t", "0.1"])
        .args(["--local-dir", dir.path().to_str().unwrap()])
        .arg("--out")
        .arg(&csv)
        .arg("--plot")
        .arg(&svg)
        .args(["--kind", "pie"]);
    cmd.assert().success();

    let text = fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("label,value"));
    assert_eq!(text.lines().count(), 1 + 3);
    assert!(fs::metadata(&svg).unwrap().len() > 0);
}

#[test]
fn table_prints_named_rows() {
    let dir = fixture();
    let names = dir.path().join("names.json");
    fs::write(&names, r#"{"vendors": {"0x8086": "Intel", "0x10de": "NVIDIA"}}"#).unwrap();
    let mut cmd = tchart();
    cmd.args(["table", "windows.json", "--path", "devices"])
        .args(["--local-dir", dir.path().to_str().unwrap()])
        .arg("--names")
        .arg(&names);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("NVIDIA 0x0a20  75.00%  (3)"))
        .stdout(predicate::str::contains("Intel 0x0042  25.00%  (1)"));
}

#[test]
fn table_groups_by_vendor_and_folds_small_ones() {
    let dir = fixture();
    fs::write(
        dir.path().join("adapters.json"),
        r#"{"devices": {
            "0x10de/0x0a20": 6, "0x8086/0x0042": 1.5,
            "0x10de/0x0640": 2, "0x1002/0x6779": 0.5
        }}"#,
    )
    .unwrap();
    let names = dir.path().join("names.json");
    fs::write(&names, r#"{"vendors": {"0x8086": "Intel", "0x10de": "NVIDIA", "0x1002": "AMD"}}"#).unwrap();

    let mut cmd = tchart();
    cmd.args(["table", "adapters.json", "--path", "devices", "--by-vendor", "-t", "0.1"])
        .args(["--local-dir", dir.path().to_str().unwrap()])
        .arg("--names")
        .arg(&names);
    cmd.assert()
        .success()
        .stdout("NVIDIA\t80%\t(8)\nIntel\t15%\t(1.5)\nOther\t5%\t(0.5)\n");
}

#[test]
fn info_describes_sample() {
    let dir = fixture();
    let mut cmd = tchart();
    cmd.args(["info", "snapshot.json"])
        .args(["--local-dir", dir.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Size: 1,234,567 sessions"))
        .stdout(predicate::str::contains("2016-06-09, channels: all (14 days of sessions)"))
        .stdout(predicate::str::contains("Firefox 47\t60.0%"));
}

#[test]
fn keys_are_sorted() {
    let dir = fixture();
    let mut cmd = tchart();
    cmd.args(["keys", "windows.json", "--path", "versions"])
        .args(["--local-dir", dir.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout("10.0\n5.1\n6.1\n6.3\n");
}

#[test]
fn missing_dataset_fails() {
    let dir = fixture();
    let mut cmd = tchart();
    cmd.args(["series", "nope.json"])
        .args(["--local-dir", dir.path().to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not be loaded"));
}
