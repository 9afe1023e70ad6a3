//! Command implementations for the CLI

use std::path::{self, MAIN_SEPARATOR};

use crate::config::HarnessConfig;
use crate::corpus::Corpus;
use crate::harness::Harness;
use crate::report::{ConsoleReporter, JsonReporter, Reporter};
use crate::runner::ProcessRunner;

use super::{Cli, CliError, CliResult, ExitCode, ReportFormat};

/// Build the harness from CLI arguments and run the selected corpus.
///
/// Always returns `ExitCode::SUCCESS` once the run completes; failing cases are in the report.
pub fn run_conformance(cli: &Cli) -> CliResult<ExitCode> {
    let corpus = load_corpus(cli)?;
    let config = harness_config(cli)?;

    let mut runner = ProcessRunner::new();
    if let Some(dir) = &cli.workdir {
        if !dir.is_dir() {
            return Err(CliError::failure(format!(
                "Error: working directory '{}' does not exist",
                dir.display()
            )));
        }
        runner = runner.with_working_dir(dir);
    }

    let mut reporter: Box<dyn Reporter> = match cli.format {
        ReportFormat::Console => Box::new(ConsoleReporter::stdout(config.reference_label(), !cli.no_color)),
        ReportFormat::Json => Box::new(JsonReporter::stdout()),
    };

    let harness = Harness::new(runner, config);
    harness.run(&corpus, reporter.as_mut());

    Ok(ExitCode::SUCCESS)
}

fn load_corpus(cli: &Cli) -> CliResult<Corpus> {
    match &cli.corpus {
        Some(path) => Corpus::load(path).map_err(|e| CliError::failure(format!("Error: {e}"))),
        None => Ok(Corpus::builtin()),
    }
}

fn harness_config(cli: &Cli) -> CliResult<HarnessConfig> {
    let mut config = HarnessConfig::new()
        .with_reference(resolve_executable(&cli.reference)?)
        .with_engine(resolve_executable(&cli.engine)?)
        .with_stop_on_fail(cli.stop_on_fail);
    if let Some(filter) = &cli.filter {
        config = config.with_filter(filter);
    }
    Ok(config)
}

/// Anchor executable paths to our own working directory so `--workdir` cannot move them.
///
/// Bare names stay as given and are looked up on `PATH` at spawn time.
fn resolve_executable(executable: &str) -> CliResult<String> {
    if !executable.contains(['/', MAIN_SEPARATOR]) {
        return Ok(executable.to_string());
    }
    path::absolute(executable)
        .map(|resolved| resolved.to_string_lossy().into_owned())
        .map_err(|e| CliError::failure(format!("Error: cannot resolve executable '{executable}': {e}")))
}
