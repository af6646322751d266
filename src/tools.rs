//! Locating the tools substituted for ` clang ` and ` clang-cc `

use crate::error::{Error, Result};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

/// Search `PATH` for an executable named `command`
///
/// An existing path is returned as-is.
pub fn which(command: &str) -> Option<PathBuf> {
    which_in(command, env::var_os("PATH"))
}

fn which_in(command: &str, paths: Option<OsString>) -> Option<PathBuf> {
    let direct = Path::new(command);
    if direct.exists() {
        return Some(direct.to_path_buf());
    }

    let cwd = env::current_dir().ok()?;
    ::which::which_in(command, paths, cwd).ok()
}

/// Determine the command to use for ` clang `
///
/// `CLANG` from the environment wins without validation.
pub fn infer_clang() -> Result<String> {
    if let Some(clang) = env::var("CLANG").ok().filter(|v| !v.is_empty()) {
        return Ok(clang);
    }

    which("clang")
        .map(|p| p.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::config_error(
                "couldn't find 'clang' program, try setting CLANG in your environment",
            )
        })
}

/// Determine the command to use for ` clang-cc `, given the resolved clang
///
/// `CLANGCC` from the environment wins. Otherwise look for `<clang>-cc` next
/// to clang, then ask clang itself.
pub fn infer_clang_cc(clang: &str) -> Result<String> {
    if let Some(clang_cc) = env::var("CLANGCC").ok().filter(|v| !v.is_empty()) {
        return Ok(clang_cc);
    }

    if let Some(found) = which(&sibling_cc_name(clang)) {
        return Ok(found.to_string_lossy().into_owned());
    }

    if let Some(reported) = ask_prog_name(clang) {
        return Ok(reported);
    }

    Err(Error::config_error(
        "couldn't find 'clang-cc' program, try setting CLANGCC in your environment",
    ))
}

/// `clang` -> `clang-cc`, `clang.exe` -> `clang-cc.exe`
fn sibling_cc_name(clang: &str) -> String {
    match clang.strip_suffix(".exe") {
        Some(stem) => format!("{stem}-cc.exe"),
        None => format!("{clang}-cc"),
    }
}

fn ask_prog_name(clang: &str) -> Option<String> {
    let output = StdCommand::new(clang)
        .arg("-print-prog-name=clang-cc")
        .output()
        .ok()?;
    let reported = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !reported.is_empty() && Path::new(&reported).exists() {
        Some(reported)
    } else {
        tracing::debug!(%clang, "clang did not report a usable clang-cc");
        None
    }
}
