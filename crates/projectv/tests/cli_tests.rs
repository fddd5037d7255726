//! Binary contract tests
//!
//! Runs the real `projectv` binary against temp course fixtures. Tool names
//! are overridden through a settings file wherever a program would start.

use assert_cmd::Command;
use predicates::prelude::*;
use projectv_test_utils::CourseFixture;
use std::path::PathBuf;
use std::time::Duration;

fn projectv(course: &CourseFixture) -> Command {
    let mut cmd = Command::cargo_bin("projectv").expect("projectv binary should be built");
    cmd.env_remove("PROJECTV_CONFIG").env_remove("RUST_LOG");
    for (var, value) in course.env() {
        cmd.env(var, value);
    }
    cmd
}

fn write_config(course: &CourseFixture, text: &str) -> PathBuf {
    let path = course.dlab_root.join("projectv.toml");
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn reload_lists_project_and_golden_items() {
    let course = CourseFixture::new();
    course.public_project("dlab1").golden("t1\n\n t2 \n");

    projectv(&course)
        .arg("reload")
        .assert()
        .success()
        .stdout(predicate::str::contains("dlab1"))
        .stdout(predicate::str::contains("  * t1\n    t2\n"));
}

#[test]
fn reload_json() {
    let course = CourseFixture::new();
    course.public_project("dlab2").file("golden/list", "a\nb\na\n");

    let output = projectv(&course).args(["reload", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["name"], "dlab2");
    assert_eq!(value["golden"]["items"], serde_json::json!(["a", "b", "a"]));
    assert_eq!(value["golden"]["selected"], 0);
}

#[cfg(unix)]
#[test]
fn reload_json_with_non_utf8_project_name() {
    use std::os::unix::ffi::OsStrExt;

    let course = CourseFixture::new();
    let name = std::ffi::OsStr::from_bytes(b"dlab\xff");
    std::fs::create_dir(course.public_root.join(name)).unwrap();

    let output = projectv(&course).args(["reload", "--json"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["name"], "dlab\u{fffd}");
    assert!(value["project"].as_str().unwrap().ends_with("dlab\u{fffd}"));
    assert_eq!(value["golden"]["items"], serde_json::json!([]));
}

#[test]
fn missing_public_root_is_an_error() {
    let course = CourseFixture::new();
    projectv(&course)
        .env_remove("PROJECT_PUBLIC_ROOT")
        .arg("reload")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: PROJECT_PUBLIC_ROOT is not set"));
}

#[test]
fn no_project_is_an_error() {
    let course = CourseFixture::new();
    projectv(&course)
        .arg("log")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No existing dlab* project found"));
}

#[test]
fn log_prints_newest_simulation_log() {
    let course = CourseFixture::new();
    course
        .public_project("dlab1")
        .aged_file("sim_result/a.log", "old run\n", Duration::from_secs(900))
        .aged_file("sim_result/b.log", "new run\n", Duration::from_secs(1));

    projectv(&course)
        .arg("log")
        .assert()
        .success()
        .stdout("new run\n")
        .stderr(predicate::str::contains("b.log (modified "));
}

#[test]
fn golden_log_by_name() {
    let course = CourseFixture::new();
    course.public_project("dlab1").golden("t1\nt2\n");

    projectv(&course)
        .args(["golden", "log", "t2"])
        .assert()
        .success()
        .stdout("golden log t2\n");

    projectv(&course)
        .args(["golden", "log", "t3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("golden item 't3' is not in the list"));
}

#[test]
fn viewer_launch_failure_carries_os_error() {
    let course = CourseFixture::new();
    course.public_project("dlab1").file("sim_result/wave.vcd", "$end\n");
    let config = write_config(&course, "[tools]\nwaveform_viewer = \"projectv-missing-viewer\"\n");

    projectv(&course)
        .arg("--config")
        .arg(&config)
        .arg("wave")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to launch projectv-missing-viewer"));
}

#[test]
fn invalid_config_is_reported() {
    let course = CourseFixture::new();
    let config = write_config(&course, "[tools]\nunknown = 1\n");

    projectv(&course)
        .env("PROJECTV_CONFIG", &config)
        .arg("reload")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn get_declined_leaves_public_root() {
    let course = CourseFixture::new().with_plain_students(&[("s1", "Alice", "dlab2")]);
    course.dev_project("dlab2").file("Makefile", "");
    course.public_project("dlab1");

    projectv(&course)
        .args(["get", "Alice"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Will reset all your project content."))
        .stdout(predicate::str::contains("Do you want to continue for: dlab2?"))
        .stdout(predicate::str::contains("Cancelled"));

    assert_eq!(course.public_entries(), ["dlab1"]);
}

#[test]
fn get_unknown_student_fails() {
    let course = CourseFixture::new().with_plain_students(&[("s1", "Alice", "dlab2")]);
    projectv(&course)
        .args(["get", "Eve", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Student name 'Eve' not found."));
}

#[cfg(unix)]
#[test]
fn get_with_yes_resets_project() {
    let course = CourseFixture::new().with_hashed_students("", &[("s4", "Ada Lovelace", "dlab4")]);
    course.dev_project("dlab4").golden("g1\n");
    course.public_project("dlab1");
    let config = write_config(&course, "[tools]\ngit = \"true\"\n");

    projectv(&course)
        .arg("--config")
        .arg(&config)
        .args(["get", "ada", "lovelace", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 3 files for student s4"))
        .stdout(predicate::str::contains("  * g1"));

    assert_eq!(course.public_entries(), ["dlab4"]);
}

#[test]
fn hash_prints_digest_and_record() {
    let course = CourseFixture::new();
    projectv(&course)
        .args(["hash", "Alice "])
        .assert()
        .success()
        .stdout("2bd806c97f0e00af1a1fc3328fa763a9269723c8db8fac4f93af71db186d6e90\n");

    projectv(&course)
        .args(["hash", "alice", "--salt", "fall-2026", "--id", "s1", "--group", "dlab3"])
        .assert()
        .success()
        .stdout("s1@9c07b207bf08474b264e4fb30c9d447b442c38e0bee76ca1c70ae276740ee42b@dlab3\n");
}

#[test]
fn shell_keeps_selection_between_commands() {
    let course = CourseFixture::new();
    course.public_project("dlab1").golden("t1\nt2\n");

    projectv(&course)
        .arg("shell")
        .write_stdin("log\nreload\nselect t2\ngolden log\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "No dlab* project loaded. Use Get or Reload Project first.",
        ))
        .stdout(predicate::str::contains("Selected t2"))
        .stdout(predicate::str::contains("golden log t2\n"));
}

#[test]
fn shell_survives_bad_input_and_eof() {
    let course = CourseFixture::new();
    projectv(&course)
        .write_stdin("frobnicate\nselect \"unterminated\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Error: missing closing quote"));
}
