//! Integration tests: run the parbench binary and check exit codes and output.

use std::process::Command;

fn parbench(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_parbench"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("PARBENCH_THREADS")
        .env_remove("PARBENCH_SEED")
        .env_remove("PARBENCH_QUIET")
        .env_remove("PARBENCH_LOG");
    cmd
}

#[test]
fn test_help() {
    let td = tempfile::tempdir().expect("tmp");
    let out = parbench(td.path()).arg("--help").output().unwrap();
    assert!(out.status.success(), "parbench --help should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--sizes"));
    assert!(stdout.contains("--threads"));
    assert!(stdout.contains("--no-wait"));
}

#[test]
fn test_version() {
    let td = tempfile::tempdir().expect("tmp");
    let out = parbench(td.path()).arg("--version").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_small_run_reports_every_section() {
    let td = tempfile::tempdir().expect("tmp");
    let out = parbench(td.path())
        .args(["--sizes", "2000", "--demo-size", "1000", "--threads", "2", "--no-wait"])
        .output()
        .unwrap();
    assert!(out.status.success(), "small run should succeed");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("=== Size: 2,000 ==="));
    assert!(stdout.contains("Operation A: heavy transform"));
    assert!(stdout.contains("Operation B: primality test"));
    assert_eq!(stdout.matches("Consistency: OK").count(), 2);
    assert!(stdout.contains("Without sync: expected ~"));
    assert!(stdout.contains("Atomic: "));
    assert!(stdout.contains("Fork-join: "));
    assert!(stdout.contains("Done."));
}

#[test]
fn test_json_output_is_one_object_per_line() {
    let td = tempfile::tempdir().expect("tmp");
    let out = parbench(td.path())
        .args(["--sizes", "500", "1500", "--demo-size", "800", "--json", "--no-wait"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let values: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();

    // 2 sizes x 2 operations + counting report
    assert_eq!(values.len(), 5);
    for v in &values[..4] {
        assert_eq!(v["kind"], "benchmark");
        assert_eq!(v["report"]["consistent"], true);
        assert_eq!(v["report"]["sequential"]["len"], v["report"]["inputLen"]);
        assert_eq!(v["report"]["parallel"]["len"], v["report"]["inputLen"]);
    }
    let counting = &values[4];
    assert_eq!(counting["kind"], "counting");
    let expected = &counting["report"]["expected"];
    assert_eq!(&counting["report"]["atomic"]["counted"], expected);
    assert_eq!(&counting["report"]["forkJoin"]["counted"], expected);
}

#[test]
fn test_rc_file_is_used() {
    let td = tempfile::tempdir().expect("tmp");
    std::fs::write(
        td.path().join(".parbenchrc"),
        r#"{ "sizes": [1234], "demoSize": 100, "threads": 2 }"#,
    )
    .expect("write rc");
    let out = parbench(td.path()).args(["--no-wait", "-q"]).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("OpA n=1,234"));
    assert!(stdout.contains("OpB n=1,234"));
}

#[test]
fn test_zero_threads_fails() {
    let td = tempfile::tempdir().expect("tmp");
    let out = parbench(td.path())
        .args(["--sizes", "10", "--threads", "0", "--no-wait"])
        .output()
        .unwrap();
    assert!(!out.status.success(), "zero threads should be rejected");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("threads"));
}

fn json_workers(stdout: &[u8]) -> Vec<u64> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).expect("json line"))
        .filter(|v| v["kind"] == "benchmark")
        .map(|v| v["report"]["workers"].as_u64().expect("workers"))
        .collect()
}

#[test]
fn test_env_overrides_rc_file_and_flag_overrides_env() {
    let td = tempfile::tempdir().expect("tmp");
    std::fs::write(
        td.path().join(".parbenchrc"),
        r#"{ "sizes": [300], "demoSize": 100, "threads": 2 }"#,
    )
    .expect("write rc");

    let out = parbench(td.path())
        .env("PARBENCH_THREADS", "3")
        .args(["--json", "--no-wait"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(json_workers(&out.stdout), vec![3, 3]);

    let out = parbench(td.path())
        .env("PARBENCH_THREADS", "3")
        .args(["--json", "--no-wait", "--threads", "4"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(json_workers(&out.stdout), vec![4, 4]);
}

#[test]
fn test_unparsable_env_seed_is_ignored() {
    let td = tempfile::tempdir().expect("tmp");
    let out = parbench(td.path())
        .env("PARBENCH_SEED", "not-a-number")
        .args(["--sizes", "200", "--demo-size", "100", "--json", "--no-wait"])
        .output()
        .unwrap();
    assert!(out.status.success(), "bad PARBENCH_SEED should fall back to the default");
}
