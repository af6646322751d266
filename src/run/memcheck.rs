//! Running the aliased tools under valgrind
//!
//! Each process valgrind traces writes its own log next to the captured
//! output (`<output>.vg.<pid>`). With `-q`, a clean run leaves those logs
//! empty, so any bytes at all count as a finding.

use crate::error::{Error, Result};
use crate::run::paths::with_suffix;
use crate::run::script::ShellDialect;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Memory-checker state for one test
#[derive(Debug, Clone)]
pub struct Memcheck {
    log_prefix: PathBuf,
}

impl Memcheck {
    /// Set up memory checking for a test whose output goes to `output`
    ///
    /// Fails with a configuration error on platforms valgrind does not run on.
    pub fn new(output: &Path, dialect: &dyn ShellDialect) -> Result<Self> {
        if !dialect.supports_valgrind() {
            return Err(Error::config_error("Cannot run valgrind on this platform"));
        }
        Ok(Memcheck {
            log_prefix: with_suffix(output, ".vg"),
        })
    }

    /// Prefix of every log file (`<output>.vg`)
    pub fn log_prefix(&self) -> &Path {
        &self.log_prefix
    }

    /// The valgrind invocation placed in front of each tool
    pub fn command_prefix(&self) -> String {
        format!(
            "valgrind -q --tool=memcheck --leak-check=full --trace-children=yes --log-file={}.%p",
            self.log_prefix.display()
        )
    }

    /// Prefix `tool` with the valgrind invocation
    pub fn wrap(&self, tool: &str) -> String {
        format!("{} {}", self.command_prefix(), tool)
    }

    /// Remove logs left by an earlier run, returning how many were removed
    pub fn clear_logs(&self) -> Result<usize> {
        let logs = self.log_files()?;
        for log in &logs {
            fs::remove_file(log)?;
        }
        Ok(logs.len())
    }

    /// Concatenate every log, in file-name order
    pub fn collect_logs(&self) -> Result<Vec<u8>> {
        let mut combined = Vec::new();
        for log in self.log_files()? {
            combined.extend(fs::read(&log)?);
        }
        Ok(combined)
    }

    /// Files named `<prefix>.*`
    fn log_files(&self) -> Result<Vec<PathBuf>> {
        let Some(dir) = self.log_prefix.parent() else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut stem = self
            .log_prefix
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        stem.push('.');

        let mut logs = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.file_name().to_string_lossy().starts_with(&stem)
            {
                logs.push(entry.into_path());
            }
        }
        Ok(logs)
    }
}
