//! Tests for choosing where directives are read from
#![cfg(unix)]

use runtest_rs::parser::{resolve_script_source, DIR_SCRIPT_NAME};
use runtest_rs::{run_test, Outcome, RunParams};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_source_precedence() {
    let temp_dir = TempDir::new().unwrap();
    let test_path = temp_dir.path().join("t.c");
    fs::write(&test_path, "RUN: true\n").unwrap();

    // The test file itself.
    assert_eq!(resolve_script_source(&test_path, None), test_path);

    // A shared per-directory script wins over the test file.
    let dir_script = temp_dir.path().join(DIR_SCRIPT_NAME);
    fs::write(&dir_script, "RUN: true\n").unwrap();
    assert_eq!(resolve_script_source(&test_path, None), dir_script);

    // An explicit override wins over both.
    let override_script = temp_dir.path().join("override.txt");
    assert_eq!(
        resolve_script_source(&test_path, Some(&override_script)),
        override_script
    );
}

#[test]
fn test_directory_script_runs_for_each_test() {
    let temp_dir = TempDir::new().unwrap();
    let suite = temp_dir.path().join("suite");
    fs::create_dir(&suite).unwrap();
    fs::write(suite.join(DIR_SCRIPT_NAME), "RUN: cat %s\n").unwrap();
    // Neither test carries RUN: lines of its own.
    fs::write(suite.join("one.txt"), "first\n").unwrap();
    fs::write(suite.join("two.txt"), "second\n").unwrap();

    let params = RunParams::new().output_dir(temp_dir.path().join("Output"));
    for (name, expected) in [("one.txt", "first\n"), ("two.txt", "second\n")] {
        let mut out = Vec::new();
        let outcome = run_test(&suite.join(name), &params, &mut out).unwrap();
        assert_eq!(outcome, Outcome::Pass);

        let captured =
            fs::read_to_string(temp_dir.path().join("Output/suite").join(format!("{name}.out")))
                .unwrap();
        assert_eq!(captured, expected);
    }
}

#[test]
fn test_override_script() {
    let temp_dir = TempDir::new().unwrap();
    let test_path = temp_dir.path().join("t.c");
    fs::write(&test_path, "RUN: false\n").unwrap();
    let override_script = temp_dir.path().join("override.txt");
    fs::write(&override_script, "RUN: true\n").unwrap();

    let params = RunParams::new()
        .output_dir(temp_dir.path().join("Output"))
        .script(&override_script);
    let mut out = Vec::new();
    let outcome = run_test(&test_path, &params, &mut out).unwrap();

    assert_eq!(outcome, Outcome::Pass);
}

#[test]
fn test_override_without_directives_is_invalid() {
    let temp_dir = TempDir::new().unwrap();
    let test_path = temp_dir.path().join("t.c");
    fs::write(&test_path, "RUN: true\n").unwrap();
    let override_script = temp_dir.path().join("empty.txt");
    fs::write(&override_script, "nothing here\n").unwrap();

    let params = RunParams::new()
        .output_dir(temp_dir.path().join("Output"))
        .script(&override_script);
    let mut out = Vec::new();
    let outcome = run_test(&test_path, &params, &mut out).unwrap();

    assert_eq!(outcome, Outcome::Invalid);
    assert!(String::from_utf8(out).unwrap().contains("HAS NO RUN LINE!"));
}

#[test]
fn test_missing_source_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let params = RunParams::new().output_dir(temp_dir.path().join("Output"));
    let mut out = Vec::new();

    let result = run_test(&temp_dir.path().join("missing.c"), &params, &mut out);
    assert!(matches!(result, Err(runtest_rs::Error::Io(_))));
}
