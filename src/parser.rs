//! Directive extraction from test sources
//!
//! A test source is any text file. Lines containing [`RUN_MARKER`] contribute
//! a directive (everything after the first marker); lines containing
//! [`XFAIL_MARKER`] mark the test as expected to fail. Everything else is
//! ignored, so directives can live inside comments of whatever language the
//! test file is written in.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker introducing a run directive
pub const RUN_MARKER: &str = "RUN:";

/// Marker flagging a test as expected to fail
pub const XFAIL_MARKER: &str = "XFAIL";

/// Name of the per-directory script shared by every test in that directory
pub const DIR_SCRIPT_NAME: &str = "test.script";

/// A single run directive, before substitution
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Text following the marker, line terminator removed.
    ///
    /// Surrounding whitespace is kept until after substitution so that the
    /// whitespace-guarded tool aliases still match at the start of a line.
    pub text: String,
    /// Line number in the source (for error reporting)
    pub line_num: usize,
}

/// Represents the directives and markers found in one source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    /// Run directives in file order
    pub directives: Vec<Directive>,
    /// Lines carrying the expected-failure marker, verbatim
    pub xfail_lines: Vec<String>,
}

impl Script {
    /// Whether the test is expected to fail
    pub fn is_xfail(&self) -> bool {
        !self.xfail_lines.is_empty()
    }

    /// Whether there is nothing to run
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Scan source text for run directives and expected-failure markers
///
/// A line that carries both markers counts only as a directive.
pub fn parse(content: &str) -> Script {
    let mut script = Script::default();

    for (i, line) in content.lines().enumerate() {
        if let Some(idx) = line.find(RUN_MARKER) {
            script.directives.push(Directive {
                text: line[idx + RUN_MARKER.len()..].to_string(),
                line_num: i + 1,
            });
        } else if line.contains(XFAIL_MARKER) {
            script.xfail_lines.push(line.to_string());
        }
    }

    script
}

/// Decide which file holds the directives for `test_path`
///
/// Precedence: the explicit override, then a [`DIR_SCRIPT_NAME`] file next to
/// the test, then the test file itself.
pub fn resolve_script_source(test_path: &Path, use_script: Option<&Path>) -> PathBuf {
    if let Some(script) = use_script {
        return script.to_path_buf();
    }

    let dir_script = test_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DIR_SCRIPT_NAME);
    if dir_script.is_file() {
        dir_script
    } else {
        test_path.to_path_buf()
    }
}

/// Resolve the directive source for a test and parse it
///
/// Returns the chosen source path together with its parsed contents.
/// Non-UTF-8 bytes are replaced rather than rejected; directives are usually
/// embedded in arbitrary source files.
pub fn extract(test_path: &Path, use_script: Option<&Path>) -> Result<(PathBuf, Script)> {
    let source = resolve_script_source(test_path, use_script);
    let bytes = fs::read(&source)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok((source, parse(&content)))
}
