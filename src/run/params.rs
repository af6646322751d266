//! Configuration parameters for test execution

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variables forwarded from the parent process
pub const CHILD_ENV_VARS: &[&str] = &["PATH", "SYSTEMROOT"];

/// Default root for captured output, relative to the current directory
pub const DEFAULT_OUTPUT_DIR: &str = "Output";

/// The fixed environment every test script runs in
///
/// Nothing outside this set reaches the child, so results do not depend on
/// whatever happens to be exported on the machine running the tests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChildEnv {
    vars: Vec<(String, OsString)>,
}

impl ChildEnv {
    /// Capture [`CHILD_ENV_VARS`] from the current process
    ///
    /// Unset variables are forwarded as empty strings.
    pub fn from_parent() -> Self {
        Self::from_pairs(
            CHILD_ENV_VARS
                .iter()
                .map(|key| (key.to_string(), std::env::var_os(key).unwrap_or_default())),
        )
    }

    /// Build an environment from explicit pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<OsString>,
    {
        ChildEnv {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The variables in insertion order
    pub fn vars(&self) -> impl Iterator<Item = (&str, &OsString)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Configuration parameters for running tests
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Command substituted for the ` clang ` alias
    pub clang: String,
    /// Command substituted for the ` clang-cc ` alias
    pub clang_cc: String,
    /// Whether to run the aliased tools under valgrind
    pub use_valgrind: bool,
    /// Whether to rewrite `{...}` groups into `"..."` (dejagnu compatibility)
    pub use_dg_compat: bool,
    /// Explicit directive source overriding the per-directory and per-test ones
    pub use_script: Option<PathBuf>,
    /// Root directory for captured output, scripts and temp files
    pub output_dir: PathBuf,
    /// Environment given to the test script
    pub child_env: ChildEnv,
}

impl RunParams {
    /// Create a new RunParams with default settings
    ///
    /// Tool aliases map to themselves; use [`crate::tools`] to resolve real paths.
    pub fn new() -> Self {
        RunParams {
            clang: "clang".to_string(),
            clang_cc: "clang-cc".to_string(),
            use_valgrind: false,
            use_dg_compat: false,
            use_script: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            child_env: ChildEnv::from_parent(),
        }
    }

    /// Set the command used for ` clang `
    pub fn clang(mut self, clang: impl Into<String>) -> Self {
        self.clang = clang.into();
        self
    }

    /// Set the command used for ` clang-cc `
    pub fn clang_cc(mut self, clang_cc: impl Into<String>) -> Self {
        self.clang_cc = clang_cc.into();
        self
    }

    /// Enable or disable running tools under valgrind
    pub fn valgrind(mut self, enabled: bool) -> Self {
        self.use_valgrind = enabled;
        self
    }

    /// Enable or disable the legacy brace rewrite
    pub fn dg_compat(mut self, enabled: bool) -> Self {
        self.use_dg_compat = enabled;
        self
    }

    /// Read directives from `script` instead of the test file
    pub fn script(mut self, script: impl Into<PathBuf>) -> Self {
        self.use_script = Some(script.into());
        self
    }

    /// Set the output root directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the child environment
    pub fn child_env(mut self, env: ChildEnv) -> Self {
        self.child_env = env;
        self
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self::new()
    }
}
