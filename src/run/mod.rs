//! Test execution module

pub mod environment;
pub mod execution;
pub mod memcheck;
pub mod params;
pub mod paths;
pub mod script;

// Re-export public types
pub use environment::{ExecutionResult, TestEnvironment};
pub use execution::TestCase;
pub use params::{ChildEnv, RunParams};
pub use paths::TestPaths;
pub use script::{host_dialect, BatchShell, PosixShell, ShellDialect};

use crate::error::Result;
use crate::status::Outcome;
use std::io::Write;
use std::path::Path;

/// Run a single test file, reporting to `out`
pub fn run_test(test_path: &Path, params: &RunParams, out: &mut dyn Write) -> Result<Outcome> {
    execution::run_path(test_path, params, host_dialect(), out)
}

/// Run a single test case with the host shell
pub fn run_case(test: &TestCase, params: &RunParams, out: &mut dyn Write) -> Result<Outcome> {
    execution::run_one_test(test, params, host_dialect(), out)
}
