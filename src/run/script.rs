//! Assembling directives into one shell script

use std::path::Path;
use std::process::Command as StdCommand;

/// Token every directive but the last must end with
pub const CHAIN_MARKER: &str = "&&";

/// A directive that does not continue the chain
#[derive(Debug, Clone, PartialEq)]
pub struct ChainViolation {
    /// Index of the offending line
    pub index: usize,
    /// The offending line, as substituted
    pub line: String,
    /// The line that follows it
    pub next: String,
}

/// Check the `&&` convention and strip the markers
///
/// Every line except the last must end with [`CHAIN_MARKER`]. The marker is
/// removed from those lines; the last line is left alone.
pub fn strip_chain_markers(mut lines: Vec<String>) -> Result<Vec<String>, ChainViolation> {
    let count = lines.len();
    for i in 0..count.saturating_sub(1) {
        match lines[i].strip_suffix(CHAIN_MARKER).map(str::to_string) {
            Some(stripped) => lines[i] = stripped,
            None => {
                return Err(ChainViolation {
                    index: i,
                    line: lines[i].clone(),
                    next: lines[i + 1].clone(),
                })
            }
        }
    }
    Ok(lines)
}

/// How a platform's command shell runs an assembled script
pub trait ShellDialect {
    /// Suffix appended after `.script` (e.g. `.bat`), empty if none
    fn script_suffix(&self) -> &'static str;

    /// Join command lines so the script stops at the first failure
    fn assemble(&self, lines: &[String]) -> String;

    /// Command that runs the script file
    fn command(&self, script: &Path) -> StdCommand;

    /// Whether the tools can be run under valgrind
    fn supports_valgrind(&self) -> bool;
}

/// `/bin/sh`, commands joined with `&&`
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixShell;

impl ShellDialect for PosixShell {
    fn script_suffix(&self) -> &'static str {
        ""
    }

    fn assemble(&self, lines: &[String]) -> String {
        lines.join(" &&\n")
    }

    fn command(&self, script: &Path) -> StdCommand {
        let mut command = StdCommand::new("/bin/sh");
        command.arg(script);
        command
    }

    fn supports_valgrind(&self) -> bool {
        true
    }
}

/// `cmd /c`, an `ERRORLEVEL` check between commands
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchShell;

impl ShellDialect for BatchShell {
    fn script_suffix(&self) -> &'static str {
        ".bat"
    }

    fn assemble(&self, lines: &[String]) -> String {
        let mut script = lines.join("\nif %ERRORLEVEL% NEQ 0 EXIT\n");
        script.push('\n');
        script
    }

    fn command(&self, script: &Path) -> StdCommand {
        let mut command = StdCommand::new("cmd");
        command.arg("/c").arg(script);
        command
    }

    fn supports_valgrind(&self) -> bool {
        false
    }
}

/// The dialect for the platform we were built for
pub fn host_dialect() -> &'static dyn ShellDialect {
    if cfg!(windows) {
        &BatchShell
    } else {
        &PosixShell
    }
}
