//! The per-test pipeline: extract, substitute, assemble, execute, classify

use crate::error::Result;
use crate::parser;
use crate::run::environment::{ExecutionResult, TestEnvironment};
use crate::run::memcheck::Memcheck;
use crate::run::params::RunParams;
use crate::run::paths::TestPaths;
use crate::run::script::{strip_chain_markers, ChainViolation, ShellDialect};
use crate::status::{classify, Outcome, RunStatus};
use crate::subst::{SubstitutionTable, SubstitutionValues};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const BANNER: &str = "********************";

/// A test file and how it is presented to the script
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// The test file
    pub path: PathBuf,
    /// Name used in reports
    pub name: String,
    /// Value of `%s`
    pub subject: String,
}

impl TestCase {
    /// A test named after its path, with the path as its subject
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        TestCase {
            path,
            name: display.clone(),
            subject: display,
        }
    }

    /// Set the name used in reports
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the value of `%s`
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }
}

/// Run one test and classify it
///
/// Diagnostics for anything other than a plain pass or expected failure are
/// written to `out`. Only configuration problems, I/O errors and interrupts
/// come back as `Err`.
pub fn run_one_test(
    test: &TestCase,
    params: &RunParams,
    dialect: &dyn ShellDialect,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let paths = TestPaths::for_test(&params.output_dir, &test.path, dialect)?;
    let memcheck = if params.use_valgrind {
        Some(Memcheck::new(&paths.output, dialect)?)
    } else {
        None
    };

    let (source, script) = parser::extract(&test.path, params.use_script.as_deref())?;
    tracing::debug!(test = %test.name, source = %source.display(), "reading directives");

    if script.is_empty() {
        writeln!(out, "{BANNER} TEST '{}' HAS NO RUN LINE! {BANNER}", test.name)?;
        out.flush()?;
        return Ok(finish(test, Outcome::Invalid));
    }

    if let Some(parent) = paths.output.parent() {
        fs::create_dir_all(parent)?;
    }
    if let Some(memcheck) = &memcheck {
        let removed = memcheck.clear_logs()?;
        tracing::trace!(removed, "cleared stale valgrind logs");
    }

    let (clang, clang_cc) = match &memcheck {
        Some(memcheck) => (memcheck.wrap(&params.clang), memcheck.wrap(&params.clang_cc)),
        None => (params.clang.clone(), params.clang_cc.clone()),
    };
    let table = SubstitutionTable::for_test(&SubstitutionValues {
        subject: &test.subject,
        temp_path: &paths.temp,
        clang: &clang,
        clang_cc: &clang_cc,
    })
    .brace_compat(params.use_dg_compat)?;

    let lines: Vec<String> = script
        .directives
        .iter()
        .map(|directive| {
            let line = table.process_line(&directive.text);
            tracing::trace!(line_num = directive.line_num, %line, "substituted");
            line
        })
        .collect();

    let lines = match strip_chain_markers(lines) {
        Ok(lines) => lines,
        Err(violation) => {
            write_chain_violation(out, &violation)?;
            return Ok(finish(test, Outcome::Fail));
        }
    };

    if script.is_xfail() {
        writeln!(out, "XFAILED '{}':", test.name)?;
        for line in &script.xfail_lines {
            writeln!(out, "{line}")?;
        }
    }

    fs::write(&paths.script, dialect.assemble(&lines))?;
    tracing::debug!(script = %paths.script.display(), "assembled test script");

    let env = TestEnvironment::new(&test.path, &params.child_env, dialect)?;
    let result = env.execute_script(&paths.script, &paths.output, &test.name)?;

    let memcheck_log = match &memcheck {
        Some(memcheck) => memcheck.collect_logs()?,
        None => Vec::new(),
    };

    let status = RunStatus {
        script_failed: result.failed(),
        memcheck_findings: memcheck_log.len(),
        xfail: script.is_xfail(),
    };
    if status.needs_report() {
        write_failure_report(out, test, &lines, &result, &status, &memcheck_log)?;
    }

    Ok(finish(test, classify(status)))
}

fn finish(test: &TestCase, outcome: Outcome) -> Outcome {
    tracing::info!(test = %test.name, %outcome, "test finished");
    outcome
}

fn write_chain_violation(out: &mut dyn Write, violation: &ChainViolation) -> Result<()> {
    writeln!(out, "MISSING '&&': {}", violation.line)?;
    writeln!(out, "FOLLOWED BY   : {}", violation.next)?;
    out.flush()?;
    Ok(())
}

fn write_failure_report(
    out: &mut dyn Write,
    test: &TestCase,
    lines: &[String],
    result: &ExecutionResult,
    status: &RunStatus,
    memcheck_log: &[u8],
) -> Result<()> {
    writeln!(out, "{BANNER} TEST '{}' FAILED! {BANNER}", test.name)?;
    writeln!(out, "Command: ")?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    if status.effective_failure() {
        writeln!(out, "Incorrect Output:")?;
    } else {
        writeln!(out, "Output:")?;
    }
    out.write_all(&result.output)?;
    if status.memcheck_findings > 0 {
        writeln!(out, "Valgrind Output:")?;
        out.write_all(memcheck_log)?;
        writeln!(out)?;
    }
    writeln!(out, "{BANNER} TEST '{}' FAILED! {BANNER}", test.name)?;
    out.flush()?;
    Ok(())
}

/// Run the test at `test_path` with default naming
pub fn run_path(
    test_path: &Path,
    params: &RunParams,
    dialect: &dyn ShellDialect,
    out: &mut dyn Write,
) -> Result<Outcome> {
    run_one_test(&TestCase::new(test_path), params, dialect, out)
}
