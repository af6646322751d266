#![no_main]

use libfuzzer_sys::fuzz_target;
use runtest_rs::parser::{self, RUN_MARKER, XFAIL_MARKER};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string, handling invalid UTF-8 gracefully
    let input = String::from_utf8_lossy(data);

    // The extractor should never panic
    let script = parser::parse(&input);

    let line_count = input.lines().count();
    for directive in &script.directives {
        // Line numbers are 1-based and inside the input
        assert!(directive.line_num > 0, "Invalid line number");
        assert!(directive.line_num <= line_count, "Line number past end of input");
    }

    // Every directive comes from a line with the run marker, every XFAIL line
    // from one with the expected-failure marker and without the run marker
    let run_lines = input.lines().filter(|l| l.contains(RUN_MARKER)).count();
    assert_eq!(script.directives.len(), run_lines);
    for line in &script.xfail_lines {
        assert!(line.contains(XFAIL_MARKER));
        assert!(!line.contains(RUN_MARKER));
    }

    // Deterministic
    assert_eq!(script, parser::parse(&input), "Extractor is not deterministic");
});
