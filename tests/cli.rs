// Glint CLI: run, ast and eval-ast subcommands driven through the real binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn glint(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("glint").unwrap();
    // Keep any user-level config file out of the picture.
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write_script(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn run_executes_script_and_prints_output() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "hello.glt",
        "greet = func(name) { \"hello \" + name }\nprint(unwrap(greet <- (\"glint\"), \"\"))\n",
    );
    glint(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout("hello glint\n");
}

#[test]
fn run_with_print_results_shows_non_empty_values() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "values.glt", "x = 2\nx * 21\nrange(1, 3)\n");
    glint(&dir)
        .args(["run", "--print-results"])
        .arg(&script)
        .assert()
        .success()
        .stdout("42\n(1, 2, 3)\n");
}

#[test]
fn seeded_runs_are_reproducible() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "dice.glt",
        "for i in range(1, 5) { print(random(1, 1000)) }\n",
    );
    let first = glint(&dir)
        .args(["run", "--seed", "99"])
        .arg(&script)
        .output()
        .unwrap();
    let second = glint(&dir)
        .args(["run", "--seed", "99"])
        .arg(&script)
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(String::from_utf8_lossy(&first.stdout).lines().count(), 5);
}

#[test]
fn config_file_enables_result_printing() {
    let dir = TempDir::new().unwrap();
    let config = write_script(
        dir.path(),
        "glint.toml",
        "[runtime]\nprint_results = true\nrandom_seed = 3\n",
    );
    let script = write_script(dir.path(), "one.glt", "len(\"four\")\n");
    glint(&dir)
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg(&script)
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn runtime_errors_go_to_stderr_with_failure_status() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "broken.glt", "print(\"before\")\nprint(y)\n");
    glint(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stdout("before\n")
        .stderr(contains("error at line 2: undefined variable 'y'"));
}

#[test]
fn syntax_errors_fail_before_running() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "bad.glt", "print(\"never\")\nx = (1, 2\n");
    glint(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("syntax error at line").and(contains("bad.glt")));
}

#[test]
fn missing_script_is_reported() {
    let dir = TempDir::new().unwrap();
    glint(&dir)
        .args(["run", "does-not-exist.glt"])
        .assert()
        .failure()
        .stderr(contains("failed to read does-not-exist.glt"));
}

#[test]
fn ast_output_feeds_eval_ast() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "program.glt",
        "divide = func(a, b = 2) { a / b; }\nunwrap(divide <- (10,), -1)\n",
    );
    let output = glint(&dir).arg("ast").arg(&script).output().unwrap();
    assert!(output.status.success());
    let json = String::from_utf8(output.stdout).unwrap();
    assert!(json.contains("\"Assignment\""));
    assert!(json.contains("\"line\": 2"));

    let program = write_script(dir.path(), "program.json", &json);
    glint(&dir)
        .args(["eval-ast", "--print-results"])
        .arg(&program)
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn eval_ast_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let program = write_script(dir.path(), "broken.json", "[{\"line\": 1}");
    glint(&dir)
        .arg("eval-ast")
        .arg(&program)
        .assert()
        .failure()
        .stderr(contains("invalid program JSON"));
}
