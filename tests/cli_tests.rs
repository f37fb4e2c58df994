use assert_cmd::Command;

#[test]
fn status_reports_vertex_count() {
    let mut cmd = Command::cargo_bin("graphloader").expect("binary");
    cmd.args(["--db", "memory", "status"])
        .assert()
        .success()
        .stdout("vertices=0\n");
}

#[test]
fn demo_run_prints_one_line_per_batch() {
    let mut cmd = Command::cargo_bin("graphloader").expect("binary");
    let output = cmd
        .args([
            "--db", "memory", "--demo", "--batches", "2", "--hops", "1", "--rng-seed",
            "7", "run",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("batch 0:"));
    assert!(lines[1].starts_with("batch 1:"));
}

#[test]
fn unknown_flag_exits_with_error() {
    let mut cmd = Command::cargo_bin("graphloader").expect("binary");
    cmd.arg("--bogus").assert().failure().code(2);
}

#[test]
fn help_prints_usage() {
    let mut cmd = Command::cargo_bin("graphloader").expect("binary");
    let output = cmd.arg("--help").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf8");
    assert!(stdout.contains("Usage: graphloader"));
}

#[test]
fn persistent_store_keeps_vertices_between_invocations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("graph.db");
    let db = db.to_str().expect("path");

    Command::cargo_bin("graphloader")
        .expect("binary")
        .args(["--db", db, "--demo", "status"])
        .assert()
        .success()
        .stdout("vertices=10\n");

    Command::cargo_bin("graphloader")
        .expect("binary")
        .args(["--db", db, "status"])
        .assert()
        .success()
        .stdout("vertices=10\n");
}
