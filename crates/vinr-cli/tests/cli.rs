use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STICKER: &str = "차대번호: KMHXX00000X000000\n제작연월: 2023.05\n모델명: 그랜저\n현대자동차\n";

/// `vinr` isolated from any user configuration.
fn vinr(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vinr").unwrap();
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn extract_prints_json_record() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sticker.txt", STICKER);

    vinr(dir.path())
        .args(["extract", &input, "--as-of", "2024-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"VIN":"KMHXX00000X000000","Maker":"현대","Year":"2023.05","Model":"그랜저"}"#,
        ));
}

#[test]
fn extract_reads_stdin() {
    let dir = TempDir::new().unwrap();

    vinr(dir.path())
        .args(["extract", "-", "--as-of", "2024-06", "-f", "text"])
        .write_stdin("모델명: 아반떼\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Model: 아반떼"))
        .stderr(predicate::str::contains("Could not extract VIN"));
}

#[test]
fn extract_rejects_blank_input() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "blank.txt", "  \n\n ");

    vinr(dir.path())
        .args(["extract", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text detected"));
}

#[test]
fn extract_reports_missing_file() {
    let dir = TempDir::new().unwrap();

    vinr(dir.path())
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_rejects_invalid_as_of() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sticker.txt", STICKER);

    vinr(dir.path())
        .args(["extract", &input, "--as-of", "June"])
        .assert()
        .failure();
}

#[test]
fn extract_merges_vin_area_text() {
    let dir = TempDir::new().unwrap();
    let sticker = write(&dir, "sticker.txt", "제작연월: 2022.11\n모델명: 쏘렌토\n기아\n");
    let vin_area = write(&dir, "vin.txt", "VIN KNAXX00000X000000\n");

    vinr(dir.path())
        .args([
            "extract",
            &sticker,
            "--vin-text",
            &vin_area,
            "--as-of",
            "2024-06",
            "--details",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""VIN":"KNAXX00000X000000""#))
        .stdout(predicate::str::contains(r#""used_vin_area":true"#));
}

#[test]
fn extract_writes_csv_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "sticker.txt", STICKER);
    let output = dir.path().join("record.csv");

    vinr(dir.path())
        .args(["extract", &input, "--as-of", "2024-06", "-f", "csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(output).unwrap();
    assert!(csv.starts_with("VIN,Maker,Year,Model\n"));
    assert!(csv.contains("KMHXX00000X000000,현대,2023.05,그랜저"));
}

#[test]
fn batch_writes_records_and_summary() {
    let dir = TempDir::new().unwrap();
    write(&dir, "car1.txt", "제작연월: 2022.11\n모델명: 쏘렌토\n기아\n");
    write(&dir, "car1.vin.txt", "VIN KNAXX00000X000000\n");
    write(&dir, "car2.txt", STICKER);
    let out_dir = dir.path().join("out");
    let pattern = format!("{}/*.txt", dir.path().display());

    vinr(dir.path())
        .args(["batch", &pattern, "--summary", "--as-of", "2024-06", "-j", "2", "-o"])
        .arg(&out_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 2 files"));

    let car1 = fs::read_to_string(out_dir.join("car1.json")).unwrap();
    assert!(car1.contains(r#""VIN":"KNAXX00000X000000""#));
    assert!(car1.contains(r#""Model":"쏘렌토""#));
    assert!(out_dir.join("car2.json").exists());
    assert!(!out_dir.join("car1.vin.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("car1.txt,success,KNAXX00000X000000,기아,2022.11,쏘렌토,true"));
}

#[test]
fn batch_fails_on_blank_file_unless_continuing() {
    let dir = TempDir::new().unwrap();
    write(&dir, "good.txt", STICKER);
    write(&dir, "empty.txt", "\n");
    let pattern = format!("{}/*.txt", dir.path().display());

    vinr(dir.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text detected"));

    vinr(dir.path())
        .args(["batch", &pattern, "--continue-on-error", "--as-of", "2024-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KMHXX00000X000000"))
        .stderr(predicate::str::contains("1 successful, 1 failed"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("vinr.json");
    let config = config.to_str().unwrap();

    vinr(dir.path())
        .args(["-c", config, "config", "init"])
        .assert()
        .success();

    vinr(dir.path())
        .args(["-c", config, "config", "get", "extraction.model_max_chars"])
        .assert()
        .success()
        .stdout(predicate::str::diff("40\n"));

    vinr(dir.path())
        .args(["-c", config, "config", "set", "extraction.model_max_chars", "3"])
        .assert()
        .success();

    let input = write(&dir, "sticker.txt", "모델명: 팰리세이드\n");
    vinr(dir.path())
        .args(["-c", config, "extract", &input, "-f", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Model: 팰리세"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("vinr.json");

    vinr(dir.path())
        .args(["config", "set", "extraction.no_such_key", "1", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn batch_refuses_to_overwrite_inputs() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "car1.txt", STICKER);
    let pattern = format!("{}/*.txt", dir.path().display());

    vinr(dir.path())
        .args(["batch", &pattern, "-f", "text", "-o"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to overwrite"));

    assert_eq!(fs::read_to_string(input).unwrap(), STICKER);
}
