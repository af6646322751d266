//! Process execution for assembled test scripts

use crate::error::{Error, Result};
use crate::run::params::ChildEnv;
use crate::run::script::ShellDialect;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// What came back from running a script
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code, if the script exited normally
    pub exit_code: Option<i32>,
    /// Terminating signal, if the script was killed (Unix only)
    pub signal: Option<i32>,
    /// Captured stdout followed by captured stderr
    pub output: Vec<u8>,
}

impl ExecutionResult {
    /// Whether the script failed: a nonzero exit or death by signal
    pub fn failed(&self) -> bool {
        self.exit_code != Some(0)
    }

    fn from_status(status: ExitStatus, output: Vec<u8>) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        ExecutionResult {
            exit_code: status.code(),
            signal,
            output,
        }
    }

    /// Whether the script was stopped by Ctrl-C
    pub fn interrupted(&self) -> bool {
        #[cfg(unix)]
        {
            self.signal == Some(libc::SIGINT)
        }
        #[cfg(not(unix))]
        {
            false
        }
    }
}

/// Execution environment for a single test
///
/// Scripts run from the test file's directory with nothing but the
/// configured [`ChildEnv`] and an empty stdin.
pub struct TestEnvironment<'a> {
    /// Directory containing the test file
    pub work_dir: PathBuf,
    child_env: &'a ChildEnv,
    dialect: &'a dyn ShellDialect,
}

impl<'a> TestEnvironment<'a> {
    /// Create the environment for `test_path`
    pub fn new(
        test_path: &Path,
        child_env: &'a ChildEnv,
        dialect: &'a dyn ShellDialect,
    ) -> Result<Self> {
        let test_path = std::path::absolute(test_path)?;
        let work_dir = test_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                Error::Generic(format!("Test path has no directory: {}", test_path.display()))
            })?;

        Ok(TestEnvironment {
            work_dir,
            child_env,
            dialect,
        })
    }

    /// Run `script`, store its combined output in `output_file`
    ///
    /// Blocks until the script exits. A script killed by SIGINT is reported
    /// as [`Error::Interrupted`] rather than as a failing result.
    pub fn execute_script(
        &self,
        script: &Path,
        output_file: &Path,
        test_name: &str,
    ) -> Result<ExecutionResult> {
        let mut command = self.dialect.command(script);
        command
            .current_dir(&self.work_dir)
            .env_clear()
            .envs(self.child_env.vars())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(script = %script.display(), cwd = %self.work_dir.display(), "spawning test script");
        let output = command.output()?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        fs::write(output_file, &combined)?;

        let result = ExecutionResult::from_status(output.status, combined);
        tracing::debug!(
            exit_code = ?result.exit_code,
            signal = ?result.signal,
            bytes = result.output.len(),
            "test script finished"
        );

        if result.interrupted() {
            return Err(Error::Interrupted {
                test: test_name.to_string(),
            });
        }
        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::run::script::PosixShell;
    use tempfile::TempDir;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let script = dir.join("t.script");
        fs::write(&script, body).unwrap();
        script
    }

    #[test]
    fn test_captures_stdout_then_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let test_path = temp_dir.path().join("t.c");
        let output_file = temp_dir.path().join("t.c.out");
        let script = write_script(temp_dir.path(), "echo err >&2 && echo out");
        let child_env = ChildEnv::from_parent();

        let env = TestEnvironment::new(&test_path, &child_env, &PosixShell).unwrap();
        let result = env.execute_script(&script, &output_file, "t.c").unwrap();

        assert!(!result.failed());
        assert_eq!(result.output, b"out\nerr\n");
        assert_eq!(fs::read(&output_file).unwrap(), b"out\nerr\n");
    }

    #[test]
    fn test_nonzero_exit() {
        let temp_dir = TempDir::new().unwrap();
        let test_path = temp_dir.path().join("t.c");
        let output_file = temp_dir.path().join("t.c.out");
        let script = write_script(temp_dir.path(), "exit 3");
        let child_env = ChildEnv::from_parent();

        let env = TestEnvironment::new(&test_path, &child_env, &PosixShell).unwrap();
        let result = env.execute_script(&script, &output_file, "t.c").unwrap();

        assert!(result.failed());
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.signal, None);
    }

    #[test]
    fn test_runs_in_test_directory() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let test_path = sub.join("t.c");
        let output_file = temp_dir.path().join("t.c.out");
        let script = write_script(temp_dir.path(), "pwd");
        let child_env = ChildEnv::from_parent();

        let env = TestEnvironment::new(&test_path, &child_env, &PosixShell).unwrap();
        let result = env.execute_script(&script, &output_file, "t.c").unwrap();

        let printed = String::from_utf8_lossy(&result.output);
        assert!(printed.trim_end().ends_with("sub"), "pwd was {}", printed);
    }

    #[test]
    fn test_environment_is_allow_listed() {
        let temp_dir = TempDir::new().unwrap();
        let test_path = temp_dir.path().join("t.c");
        let output_file = temp_dir.path().join("t.c.out");
        let script = write_script(temp_dir.path(), "echo \"[$HOME][$FOO]\"");
        let path = std::env::var_os("PATH").unwrap_or_default();
        let child_env = ChildEnv::from_pairs([("PATH", path), ("FOO", "bar".into())]);

        let env = TestEnvironment::new(&test_path, &child_env, &PosixShell).unwrap();
        let result = env.execute_script(&script, &output_file, "t.c").unwrap();

        assert_eq!(result.output, b"[][bar]\n");
    }

    #[test]
    fn test_sigint_is_interrupt() {
        let temp_dir = TempDir::new().unwrap();
        let test_path = temp_dir.path().join("t.c");
        let output_file = temp_dir.path().join("t.c.out");
        let script = write_script(temp_dir.path(), "kill -INT $$");
        let child_env = ChildEnv::from_parent();

        let env = TestEnvironment::new(&test_path, &child_env, &PosixShell).unwrap();
        let err = env.execute_script(&script, &output_file, "t.c").unwrap_err();

        assert!(err.is_interrupt());
    }

    #[test]
    fn test_other_signal_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let test_path = temp_dir.path().join("t.c");
        let output_file = temp_dir.path().join("t.c.out");
        let script = write_script(temp_dir.path(), "kill -TERM $$");
        let child_env = ChildEnv::from_parent();

        let env = TestEnvironment::new(&test_path, &child_env, &PosixShell).unwrap();
        let result = env.execute_script(&script, &output_file, "t.c").unwrap();

        assert!(result.failed());
        assert_eq!(result.signal, Some(libc::SIGTERM));
    }
}
