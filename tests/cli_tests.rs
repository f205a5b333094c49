use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

const TRAIN: &str = indoc! {"
    1\tregular\tAlice\t2008-01-01T00:00:00Z\tcopyedit\tPage
    I\thello

    2\tvandalism\t10.0.0.1\t2008-01-01T00:01:00Z\tnull\tPage
    D\tworld
"};

const TEST: &str = indoc! {"
    3\t?\tBob\t2008-01-02T00:00:00Z\tnull\tPage
    I\tfoo
"};

fn vandalcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vandalcheck"));
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn write_logs(dir: &TempDir) {
    fs::write(dir.path().join("train.log"), TRAIN).unwrap();
    fs::write(dir.path().join("test.log"), TEST).unwrap();
}

#[test]
fn test_missing_arguments_fail_with_usage() {
    let dir = TempDir::new().unwrap();
    let output = vandalcheck(&dir).arg("train.log").output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr was: {stderr}");
}

#[test]
fn test_extra_arguments_fail() {
    let dir = TempDir::new().unwrap();
    vandalcheck(&dir)
        .args(["a.log", "b.log", "c.log"])
        .assert()
        .failure();
}

#[test]
fn test_successful_run_writes_default_report() {
    let dir = TempDir::new().unwrap();
    write_logs(&dir);

    vandalcheck(&dir)
        .args(["train.log", "test.log", "--classifier", "majority"])
        .assert()
        .success();

    let report = fs::read_to_string(dir.path().join("predictions.txt")).unwrap();
    assert!(
        report == "3\tregular\n" || report == "3\tvandalism\n",
        "unexpected report {report:?}"
    );
}

#[test]
fn test_output_flag_and_config_file() {
    let dir = TempDir::new().unwrap();
    write_logs(&dir);
    fs::write(
        dir.path().join(".vandalcheck.toml"),
        "classifier = \"majority\"\nfolds = 2\n",
    )
    .unwrap();

    vandalcheck(&dir)
        .args(["train.log", "test.log", "-o", "out.txt"])
        .assert()
        .success();

    assert!(dir.path().join("out.txt").exists());
    assert!(!dir.path().join("predictions.txt").exists());
}

#[test]
fn test_json_summary() {
    let dir = TempDir::new().unwrap();
    write_logs(&dir);

    let output = vandalcheck(&dir)
        .args(["train.log", "test.log", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["predictions"][0]["id"], 3);
}

#[test]
fn test_malformed_log_exits_non_zero_without_report() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("train.log"), "1\tregular\tAlice\tt\n").unwrap();
    fs::write(dir.path().join("test.log"), TEST).unwrap();

    let output = vandalcheck(&dir)
        .args(["train.log", "test.log"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Malformed log"), "stderr was: {stderr}");
    assert!(!dir.path().join("predictions.txt").exists());
}

#[test]
fn test_invalid_flag_value_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_logs(&dir);
    vandalcheck(&dir)
        .args(["train.log", "test.log", "--folds", "1"])
        .assert()
        .failure();
}
