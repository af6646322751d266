//! Edge case tests for directive extraction and execution

use runtest_rs::parser;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_edge_cases() {
    // Empty source
    let empty = parser::parse("");
    assert!(empty.is_empty());
    assert!(!empty.is_xfail());

    // Marker with nothing after it still counts as a directive
    let bare = parser::parse("RUN:");
    assert_eq!(bare.directives.len(), 1);
    assert_eq!(bare.directives[0].text, "");

    // Markers are case sensitive
    let lower = parser::parse("run: true\nxfail\n");
    assert!(lower.is_empty());
    assert!(!lower.is_xfail());

    // Markers may appear anywhere on the line
    let embedded = parser::parse("; comment RUN: llvm-as < %s\n  /* XFAIL: * */\n");
    assert_eq!(embedded.directives[0].text, " llvm-as < %s");
    assert_eq!(embedded.xfail_lines, vec!["  /* XFAIL: * */"]);
}

#[test]
fn test_parse_unicode() {
    let script = parser::parse("// RUN: echo \"Success ✓\" &&\n// RUN: echo 完了\n");
    assert_eq!(script.directives.len(), 2);
    assert_eq!(script.directives[0].text, " echo \"Success ✓\" &&");
    assert_eq!(script.directives[1].text, " echo 完了");
}

#[test]
fn test_invalid_utf8_source() {
    let temp_dir = TempDir::new().unwrap();
    let test_path = temp_dir.path().join("binary.ll");
    let mut content = b"\xff\xfe garbage\n".to_vec();
    content.extend_from_slice(b"; RUN: true\n");
    fs::write(&test_path, content).unwrap();

    let (source, script) = parser::extract(&test_path, None).unwrap();
    assert_eq!(source, test_path);
    assert_eq!(script.directives.len(), 1);
    assert_eq!(script.directives[0].text, " true");
    assert_eq!(script.directives[0].line_num, 2);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use runtest_rs::{run_test, Outcome, RunParams};

    #[test]
    fn test_empty_final_directive() {
        let temp_dir = TempDir::new().unwrap();
        let test_path = temp_dir.path().join("t.c");
        // A trailing empty command leaves a dangling `&&` in the script
        fs::write(&test_path, "RUN: true &&\nRUN:\n").unwrap();

        let params = RunParams::new().output_dir(temp_dir.path().join("Output"));
        let mut out = Vec::new();
        let outcome = run_test(&test_path, &params, &mut out).unwrap();

        assert_eq!(outcome, Outcome::Fail);
    }

    #[test]
    fn test_unicode_output_captured() {
        let temp_dir = TempDir::new().unwrap();
        let suite = temp_dir.path().join("suite");
        fs::create_dir(&suite).unwrap();
        let test_path = suite.join("u.c");
        fs::write(&test_path, "// RUN: echo \"Success ✓\"\n").unwrap();

        let params = RunParams::new().output_dir(temp_dir.path().join("Output"));
        let mut out = Vec::new();
        let outcome = run_test(&test_path, &params, &mut out).unwrap();

        assert_eq!(outcome, Outcome::Pass);
        let captured =
            fs::read_to_string(temp_dir.path().join("Output/suite/u.c.out")).unwrap();
        assert_eq!(captured, "Success ✓\n");
    }

    #[test]
    fn test_many_directives() {
        let temp_dir = TempDir::new().unwrap();
        let test_path = temp_dir.path().join("many.c");
        let mut content = String::new();
        for i in 0..50 {
            content.push_str(&format!("RUN: echo {} &&\n", i));
        }
        content.push_str("RUN: echo done\n");
        fs::write(&test_path, content).unwrap();

        let params = RunParams::new().output_dir(temp_dir.path().join("Output"));
        let mut out = Vec::new();
        assert_eq!(run_test(&test_path, &params, &mut out).unwrap(), Outcome::Pass);
    }
}
