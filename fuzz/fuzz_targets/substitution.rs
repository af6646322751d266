#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use runtest_rs::subst::{SubstitutionTable, SubstitutionValues};
use std::path::PathBuf;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    line: String,
    subject: String,
    temp: String,
    clang: String,
    clang_cc: String,
    dg_compat: bool,
    extra: Vec<(String, String)>,
}

fuzz_target!(|input: FuzzInput| {
    let temp = PathBuf::from(&input.temp);
    let mut table = SubstitutionTable::for_test(&SubstitutionValues {
        subject: &input.subject,
        temp_path: &temp,
        clang: &input.clang,
        clang_cc: &input.clang_cc,
    });

    for (token, replacement) in &input.extra {
        // Empty tokens would match between every character
        if !token.is_empty() {
            table = table.push(token.as_str(), replacement.as_str());
        }
    }

    let table = match table.brace_compat(input.dg_compat) {
        Ok(table) => table,
        Err(_) => return,
    };

    // Should not panic, and processed lines never carry outer whitespace
    let processed = table.process_line(&input.line);
    assert_eq!(processed, processed.trim());

    // A line with no token in it comes back unchanged by apply()
    if table.entries().iter().all(|e| !input.line.contains(&e.token)) {
        assert_eq!(table.apply(&input.line), input.line);
    }
});
