//! Placeholder substitution for run directives
//!
//! Substitutions are applied one after another in table order, not
//! simultaneously. A later token can therefore match text produced by an
//! earlier replacement; [`SubstitutionTable::for_test`] orders its entries so
//! that this never happens for the built-in tokens.

use crate::error::Result;
use regex::Regex;
use std::path::Path;

/// One `(token, replacement)` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    /// Literal text to look for
    pub token: String,
    /// Literal text to put in its place
    pub replacement: String,
}

/// Values the built-in substitution table is filled from
#[derive(Debug, Clone)]
pub struct SubstitutionValues<'a> {
    /// Path or command used for `%s`
    pub subject: &'a str,
    /// Per-test temporary file used for `%t`
    pub temp_path: &'a Path,
    /// Command used for the bare ` clang ` alias
    pub clang: &'a str,
    /// Command used for the bare ` clang-cc ` alias
    pub clang_cc: &'a str,
}

/// Ordered list of substitutions, plus the optional legacy brace rewrite
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    entries: Vec<Substitution>,
    brace_compat: Option<Regex>,
}

impl SubstitutionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a substitution; it runs after every entry already present
    pub fn push(mut self, token: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.entries.push(Substitution {
            token: token.into(),
            replacement: replacement.into(),
        });
        self
    }

    /// Build the standard table for one test
    ///
    /// Order:
    /// 1. `%s` subject
    /// 2. `%S` directory of the subject
    /// 3. `%llvmgcc`, `%llvmgxx`, `%prcontext` fixed commands
    /// 4. `%t` temporary file
    /// 5. ` clang `, ` clang-cc ` whitespace-guarded aliases
    ///
    /// The aliases go last so a configured tool command (which may carry a
    /// memory-checker prefix with `%p` in it) is never rewritten.
    pub fn for_test(values: &SubstitutionValues<'_>) -> Self {
        let subject_dir = Path::new(values.subject)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::new()
            .push("%s", values.subject)
            .push("%S", subject_dir)
            .push("%llvmgcc", "llvm-gcc -emit-llvm -w")
            .push("%llvmgxx", "llvm-g++ -emit-llvm -w")
            .push("%prcontext", "prcontext.tcl")
            .push("%t", values.temp_path.to_string_lossy())
            .push(" clang ", format!(" {} ", values.clang))
            .push(" clang-cc ", format!(" {} ", values.clang_cc))
    }

    /// Enable or disable the legacy `{...}` to `"..."` rewrite
    pub fn brace_compat(mut self, enabled: bool) -> Result<Self> {
        self.brace_compat = if enabled {
            Some(Regex::new(r"\{(.*)\}")?)
        } else {
            None
        };
        Ok(self)
    }

    /// The substitutions in application order
    pub fn entries(&self) -> &[Substitution] {
        &self.entries
    }

    /// Apply every substitution to `line`, in order
    pub fn apply(&self, line: &str) -> String {
        let mut result = line.to_string();
        for entry in &self.entries {
            result = result.replace(&entry.token, &entry.replacement);
        }
        result
    }

    /// Turn a raw directive into a command line
    ///
    /// Runs [`apply`](Self::apply), then the brace rewrite if enabled, then
    /// trims surrounding whitespace.
    pub fn process_line(&self, line: &str) -> String {
        let substituted = self.apply(line);
        let rewritten = match &self.brace_compat {
            Some(re) => re.replace_all(&substituted, "\"${1}\"").into_owned(),
            None => substituted,
        };
        rewritten.trim().to_string()
    }
}
