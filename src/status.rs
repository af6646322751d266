//! Test outcomes and their classification

use std::fmt;

/// Final result of running one test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Script succeeded and the test was not marked XFAIL
    Pass,
    /// Script failed and the test was marked XFAIL
    ExpectedFail,
    /// Script failed (or the memory checker complained), or the `&&` chain was broken
    Fail,
    /// Script succeeded although the test was marked XFAIL
    UnexpectedPass,
    /// No run directives were found
    Invalid,
}

impl Outcome {
    /// Short upper-case name used in summaries
    pub fn name(self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::ExpectedFail => "XFAIL",
            Outcome::Fail => "FAIL",
            Outcome::UnexpectedPass => "XPASS",
            Outcome::Invalid => "INVALID",
        }
    }

    /// Whether this outcome should make the process exit nonzero
    pub fn is_failure(self) -> bool {
        match self {
            Outcome::Fail | Outcome::UnexpectedPass => true,
            Outcome::Pass | Outcome::ExpectedFail | Outcome::Invalid => false,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs to [`classify`] for a script that actually ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Whether the script exited with a nonzero code or was killed by a signal
    pub script_failed: bool,
    /// Total bytes of memory-checker log output (0 = clean)
    pub memcheck_findings: usize,
    /// Whether the test carries an XFAIL marker
    pub xfail: bool,
}

impl RunStatus {
    /// Script status after XFAIL inversion
    pub fn effective_failure(&self) -> bool {
        self.script_failed != self.xfail
    }

    /// Whether the run takes the failure branch and needs a report
    pub fn needs_report(&self) -> bool {
        self.effective_failure() || self.memcheck_findings > 0
    }
}

/// Classify a completed run
///
/// Memory-checker findings are never inverted by XFAIL: a leaking test that
/// is expected to fail is reported as an unexpected pass.
pub fn classify(status: RunStatus) -> Outcome {
    match (status.needs_report(), status.xfail) {
        (true, true) => Outcome::UnexpectedPass,
        (true, false) => Outcome::Fail,
        (false, true) => Outcome::ExpectedFail,
        (false, false) => Outcome::Pass,
    }
}
