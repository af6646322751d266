//! Error types for runtest-rs

use thiserror::Error;

/// Result type alias for runtest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for runtest operations
///
/// Test-level problems (no `RUN:` line, a broken `&&` chain, a failing
/// script) are not errors: they are reported through an
/// [`Outcome`](crate::Outcome). Only conditions that must stop the whole run
/// end up here.
#[derive(Error, Debug)]
pub enum Error {
    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// WalkDir error
    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Tool paths could not be resolved or a run mode is unsupported here
    #[error("{message}")]
    Config { message: String },

    /// The test script was interrupted (Ctrl-C)
    #[error("Interrupted while running '{test}'")]
    Interrupted { test: String },

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a user interrupt that must abort the run
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Error::Interrupted { .. })
    }
}
