#![no_main]

use libfuzzer_sys::fuzz_target;
use runtest_rs::run::script::{strip_chain_markers, CHAIN_MARKER};

fuzz_target!(|lines: Vec<String>| {
    match strip_chain_markers(lines.clone()) {
        Ok(stripped) => {
            assert_eq!(stripped.len(), lines.len());
            for (i, (before, after)) in lines.iter().zip(&stripped).enumerate() {
                if i + 1 < lines.len() {
                    assert_eq!(format!("{after}{CHAIN_MARKER}"), *before);
                } else {
                    assert_eq!(after, before);
                }
            }
        }
        Err(violation) => {
            // The reported line really is missing the marker and is not last
            assert!(violation.index + 1 < lines.len());
            assert!(!lines[violation.index].ends_with(CHAIN_MARKER));
            assert_eq!(violation.next, lines[violation.index + 1]);
            // Everything before it was fine
            assert!(lines[..violation.index].iter().all(|l| l.ends_with(CHAIN_MARKER)));
        }
    }
});
