use anyhow::{Context, Result};
use clap::Parser;
use runtest_rs::{collect_tests, tools, Error, Outcome, RunParams};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable naming a directive source used for every test
const TEST_SCRIPT_ENV: &str = "TEST_SCRIPT";

/// Environment variable holding the log filter
const LOG_ENV: &str = "RUNTEST_LOG";

#[derive(Parser)]
#[command(name = "runtest")]
#[command(about = "Run the RUN: lines embedded in test files")]
#[command(version)]
struct Cli {
    /// Test files or directories
    #[arg(required = true)]
    tests: Vec<PathBuf>,
    /// Program to use as "clang"
    #[arg(long)]
    clang: Option<String>,
    /// Program to use as "clang-cc"
    #[arg(long = "clang-cc")]
    clang_cc: Option<String>,
    /// Run tests under valgrind
    #[arg(long = "vg")]
    valgrind: bool,
    /// Use llvm dejagnu compatibility mode
    #[arg(long = "dg")]
    dg_compat: bool,
    /// Root directory for captured output
    #[arg(long, default_value = runtest_rs::run::params::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    /// Print one outcome line per test
    #[arg(long)]
    show_outcomes: bool,
    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn params_from_cli(cli: &Cli) -> runtest_rs::Result<RunParams> {
    let clang = match &cli.clang {
        Some(clang) => clang.clone(),
        None => tools::infer_clang()?,
    };
    let clang_cc = match &cli.clang_cc {
        Some(clang_cc) => clang_cc.clone(),
        None => tools::infer_clang_cc(&clang)?,
    };
    tracing::debug!(%clang, %clang_cc, "resolved tools");

    let mut params = RunParams::new()
        .clang(clang)
        .clang_cc(clang_cc)
        .valgrind(cli.valgrind)
        .dg_compat(cli.dg_compat)
        .output_dir(&cli.output_dir);
    if let Some(script) = std::env::var_os(TEST_SCRIPT_ENV).filter(|s| !s.is_empty()) {
        params = params.script(script);
    }
    Ok(params)
}

fn run(cli: &Cli) -> Result<bool> {
    let params = params_from_cli(cli)?;
    if params.use_valgrind && !runtest_rs::run::host_dialect().supports_valgrind() {
        return Err(Error::config_error("Cannot run valgrind on this platform").into());
    }

    let tests = collect_tests(&cli.tests, &params.output_dir).context("collecting tests")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut any_failed = false;

    for test in &tests {
        let outcome = runtest_rs::run_test(test, &params, &mut out)?;
        if cli.show_outcomes {
            print_outcome(&mut out, outcome, test)?;
        }
        any_failed |= outcome.is_failure();
    }

    Ok(any_failed)
}

#[cfg(not(feature = "colors"))]
fn print_outcome(out: &mut dyn Write, outcome: Outcome, test: &std::path::Path) -> Result<()> {
    writeln!(out, "{}: {}", outcome, test.display())?;
    Ok(())
}

#[cfg(feature = "colors")]
fn print_outcome(out: &mut dyn Write, outcome: Outcome, test: &std::path::Path) -> Result<()> {
    use termcolor::{Ansi, Color, ColorSpec, WriteColor};

    if !atty::is(atty::Stream::Stdout) {
        writeln!(out, "{}: {}", outcome, test.display())?;
        return Ok(());
    }

    let color = match outcome {
        Outcome::Pass | Outcome::ExpectedFail => Color::Green,
        Outcome::Fail | Outcome::UnexpectedPass => Color::Red,
        Outcome::Invalid => Color::Yellow,
    };
    let mut ansi = Ansi::new(out);
    ansi.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(ansi, "{}", outcome)?;
    ansi.reset()?;
    writeln!(ansi, ": {}", test.display())?;
    Ok(())
}

/// Die from SIGINT ourselves so the invoking shell sees the interrupt
#[cfg(unix)]
fn reraise_interrupt() -> ExitCode {
    // SAFETY: restoring the default disposition and raising a signal on the
    // current process touches no Rust-managed state.
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_DFL);
        libc::raise(libc::SIGINT);
    }
    ExitCode::from(130)
}

#[cfg(not(unix))]
fn reraise_interrupt() -> ExitCode {
    ExitCode::from(130)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(err) => {
            if err.downcast_ref::<Error>().is_some_and(Error::is_interrupt) {
                tracing::warn!("{}", err);
                return reraise_interrupt();
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
