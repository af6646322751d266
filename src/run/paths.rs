//! Per-test output locations

use crate::error::Result;
use crate::run::script::ShellDialect;
use std::path::{Path, PathBuf};

/// Suffix of the captured-output file
pub const OUTPUT_SUFFIX: &str = ".out";

/// Files a single test writes, all derived from its own path
///
/// Two tests only share these if they have the same file name in
/// same-named parent directories.
#[derive(Debug, Clone, PartialEq)]
pub struct TestPaths {
    /// Captured stdout + stderr
    pub output: PathBuf,
    /// The assembled script
    pub script: PathBuf,
    /// Value of `%t`
    pub temp: PathBuf,
}

impl TestPaths {
    /// `<output_dir>/<parent dir name>/<file name>`
    pub fn output_base(output_dir: &Path, test_path: &Path) -> PathBuf {
        let parent_name = test_path
            .parent()
            .and_then(Path::file_name)
            .map(PathBuf::from)
            .unwrap_or_default();
        let file_name = test_path.file_name().map(PathBuf::from).unwrap_or_default();

        output_dir.join(parent_name).join(file_name)
    }

    /// Derive every path for `test_path`, made absolute
    pub fn for_test(
        output_dir: &Path,
        test_path: &Path,
        dialect: &dyn ShellDialect,
    ) -> Result<Self> {
        let mut output = Self::output_base(output_dir, test_path).into_os_string();
        output.push(OUTPUT_SUFFIX);
        let output = std::path::absolute(PathBuf::from(output))?;

        Ok(TestPaths {
            script: with_suffix(&output, &format!(".script{}", dialect.script_suffix())),
            temp: with_suffix(&output, ".tmp"),
            output,
        })
    }
}

/// Append `suffix` to the full path (not an extension swap)
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}
