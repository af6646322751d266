//! # runtest-rs
//!
//! A directive-driven test executor. Test files carry their own run
//! instructions in `RUN:` lines:
//!
//! ```text
//! // RUN: clang -fsyntax-only %s &&
//! // RUN: clang -E %s -o %t
//! // XFAIL: not implemented yet
//! ```
//!
//! Each test's directives are substituted, chained into one shell script,
//! run in a minimal environment and classified as pass, fail, expected
//! failure, unexpected pass or invalid.

pub mod error;
pub mod parser;
pub mod run;
pub mod status;
pub mod subst;
pub mod tools;

pub use error::{Error, Result};
pub use parser::{Directive, Script};
pub use run::{ChildEnv, RunParams, TestCase};
pub use status::Outcome;
pub use subst::{Substitution, SubstitutionTable};

// Re-export for advanced users who need direct access
pub use run::run_test;

use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand test arguments into test files
///
/// Files are taken as given. Directories are walked recursively and their
/// regular files collected in sorted order, leaving out per-directory
/// `test.script` files and anything under `output_dir`.
pub fn collect_tests<P: AsRef<Path>>(paths: &[P], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let output_dir = std::fs::canonicalize(output_dir).ok();
    let mut tests = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            tests.push(path.to_path_buf());
            continue;
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !is_output_dir(entry, output_dir.as_deref()));
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && entry.file_name() != parser::DIR_SCRIPT_NAME {
                found.push(entry.into_path());
            }
        }
        found.sort();
        tests.extend(found);
    }

    Ok(tests)
}

fn is_output_dir(entry: &walkdir::DirEntry, output_dir: Option<&Path>) -> bool {
    match output_dir {
        Some(output_dir) if entry.file_type().is_dir() => {
            std::fs::canonicalize(entry.path()).is_ok_and(|dir| dir == output_dir)
        }
        _ => false,
    }
}

/// Run every test in order, stopping early only on errors
fn run_all(
    tests: &[PathBuf],
    params: &RunParams,
    out: &mut dyn Write,
) -> Result<Vec<(PathBuf, Outcome)>> {
    let mut results = Vec::with_capacity(tests.len());
    for test in tests {
        let outcome = run::run_test(test, params, out)?;
        results.push((test.clone(), outcome));
    }
    Ok(results)
}

/// Builder for configuring and running directive-driven tests
///
/// # Examples
///
/// ```no_run
/// use runtest_rs::runtest;
///
/// let results = runtest::run("test/Sema")
///     .clang("/usr/local/bin/clang")
///     .clang_cc("/usr/local/bin/clang-cc")
///     .output_dir("build/Output")
///     .execute()
///     .unwrap();
///
/// for (path, outcome) in &results {
///     println!("{}: {}", outcome, path.display());
/// }
/// ```
pub struct Builder {
    tests: Vec<PathBuf>,
    params: RunParams,
}

impl Builder {
    /// Create a new builder for the given test file or directory
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            tests: vec![path.into()],
            params: RunParams::new(),
        }
    }

    /// Add another test file or directory
    pub fn test(mut self, path: impl Into<PathBuf>) -> Self {
        self.tests.push(path.into());
        self
    }

    /// Set the command substituted for ` clang `
    pub fn clang(mut self, clang: impl Into<String>) -> Self {
        self.params = self.params.clang(clang);
        self
    }

    /// Set the command substituted for ` clang-cc `
    pub fn clang_cc(mut self, clang_cc: impl Into<String>) -> Self {
        self.params = self.params.clang_cc(clang_cc);
        self
    }

    /// Run the aliased tools under valgrind
    pub fn valgrind(mut self, enabled: bool) -> Self {
        self.params = self.params.valgrind(enabled);
        self
    }

    /// Rewrite `{...}` groups into `"..."` after substitution
    pub fn dg_compat(mut self, enabled: bool) -> Self {
        self.params = self.params.dg_compat(enabled);
        self
    }

    /// Read directives from `script` for every test
    pub fn script(mut self, script: impl Into<PathBuf>) -> Self {
        self.params = self.params.script(script);
        self
    }

    /// Set where captured output, scripts and temp files go
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.params = self.params.output_dir(dir);
        self
    }

    /// Replace the environment the scripts run in
    pub fn child_env(mut self, env: ChildEnv) -> Self {
        self.params = self.params.child_env(env);
        self
    }

    /// Run all tests, writing diagnostics to stdout
    pub fn execute(self) -> Result<Vec<(PathBuf, Outcome)>> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.execute_to(&mut lock)
    }

    /// Run all tests, writing diagnostics to `out`
    ///
    /// # Returns
    /// Each test with its outcome, or the first error that aborted the run.
    pub fn execute_to(self, out: &mut dyn Write) -> Result<Vec<(PathBuf, Outcome)>> {
        let tests = collect_tests(&self.tests, &self.params.output_dir)?;
        if tests.is_empty() {
            return Err(Error::Generic("No tests specified".to_string()));
        }
        run_all(&tests, &self.params, out)
    }
}

/// Create a new runtest builder
pub mod runtest {
    use super::*;

    /// Create a builder for the given test file or directory
    pub fn run(path: impl Into<PathBuf>) -> Builder {
        Builder::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn basic_parse_test() {
        let script = parser::parse("// RUN: true &&\n// RUN: false\n");
        assert_eq!(script.directives.len(), 2);
        assert!(!script.is_xfail());
    }

    #[test]
    fn test_collect_tests() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("suite");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("b.c"), "").unwrap();
        fs::write(dir.join("a.c"), "").unwrap();
        fs::write(dir.join("nested/c.c"), "").unwrap();
        fs::write(dir.join("test.script"), "RUN: true").unwrap();

        let single = temp_dir.path().join("single.c");
        let output_dir = temp_dir.path().join("Output");
        let tests = collect_tests(&[single.clone(), dir.clone()], &output_dir).unwrap();

        assert_eq!(
            tests,
            vec![single, dir.join("a.c"), dir.join("b.c"), dir.join("nested/c.c")]
        );
    }

    #[test]
    fn test_collect_tests_skips_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("suite");
        let output_dir = dir.join("Output");
        fs::create_dir_all(output_dir.join("suite")).unwrap();
        fs::write(dir.join("a.c"), "").unwrap();
        fs::write(output_dir.join("suite/a.c.out"), "").unwrap();
        fs::write(output_dir.join("suite/a.c.out.script"), "").unwrap();

        let tests = collect_tests(&[dir.clone()], &output_dir).unwrap();
        assert_eq!(tests, vec![dir.join("a.c")]);

        // Relative spellings of the same directory are skipped too.
        let tests = collect_tests(&[dir.clone()], &dir.join("./Output")).unwrap();
        assert_eq!(tests, vec![dir.join("a.c")]);
    }

    #[test]
    #[cfg(unix)]
    fn test_example() {
        let temp_dir = TempDir::new().unwrap();
        let test_path = temp_dir.path().join("t").join("api.c");
        fs::create_dir_all(test_path.parent().unwrap()).unwrap();
        fs::write(&test_path, "// RUN: echo works\n").unwrap();

        let mut out = Vec::new();
        let results = runtest::run(&test_path)
            .output_dir(temp_dir.path().join("Output"))
            .execute_to(&mut out)
            .unwrap();

        assert_eq!(results, vec![(test_path, Outcome::Pass)]);
        assert!(out.is_empty());
    }
}
