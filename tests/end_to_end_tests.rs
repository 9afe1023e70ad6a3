//! End-to-end tests against scripted fake engines
//!
//! Each fake engine is a small `sh` script that answers queries the way a real engine would,
//! writing to stdout (and sometimes stderr / a non-zero exit status). The harness runs them as real
//! child processes.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use enginediff::{
    CaseOutcome, CaseStatus, ConsoleReporter, Corpus, EngineRunner, Harness, HarnessConfig, JsonReporter,
    LaunchFailure, ProcessRunner, TestCase,
};
use tempfile::TempDir;

const CHAD: &str = "SELECT id, name FROM companies WHERE country = 'chad'";
const ERITREA: &str = "SELECT id, name FROM companies WHERE country = 'eritrea'";

const REFERENCE: &str = r#"#!/bin/sh
case "$2" in
  *chad*) printf '3|ACME Widgets\n' ;;
  *eritrea*) printf '7|Asmara Trading\n' ;;
  *) printf '%s\n' "$2" ;;
esac
"#;

const ENGINE_CASE_MISMATCH: &str = r#"#!/bin/sh
case "$2" in
  *chad*) printf '3|Acme Widgets\n' ;;
  *eritrea*) printf '7|Asmara Trading\n' ;;
  *) printf '%s\n' "$2" ;;
esac
"#;

const ENGINE_NO_NEWLINE: &str = r#"#!/bin/sh
printf '3|ACME Widgets'
"#;

const ENGINE_EXIT_STATUS: &str = r#"#!/bin/sh
case "$2" in
  *chad*) printf '3|ACME Widgets\n' ;;
  *eritrea*) printf '7|Asmara Trading\n' ;;
  *) printf '%s\n' "$2" ;;
esac
echo 'note: fell back to full scan' >&2
exit 3
"#;

const ECHO_ARGS: &str = r#"#!/bin/sh
printf '%s|%s|%s\n' "$#" "$1" "$2"
"#;

/// Scripts are all written before any test spawns a process, so no executable is still open for
/// writing when another thread forks (which would fail with ETXTBSY).
fn fixtures() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("reference", REFERENCE),
            ("engine_ok", REFERENCE),
            ("engine_case_mismatch", ENGINE_CASE_MISMATCH),
            ("engine_no_newline", ENGINE_NO_NEWLINE),
            ("engine_exit_status", ENGINE_EXIT_STATUS),
            ("echo_args", ECHO_ARGS),
        ] {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        // A project-style layout for relative executable paths: `build/` engines and a separate
        // `workdir/` the engines run inside.
        fs::create_dir_all(dir.path().join("build")).unwrap();
        fs::create_dir_all(dir.path().join("workdir")).unwrap();
        for name in ["reference", "sql"] {
            let path = dir.path().join("build").join(name);
            fs::write(&path, REFERENCE).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let not_executable = dir.path().join("not_executable");
        fs::write(&not_executable, REFERENCE).unwrap();
        fs::set_permissions(&not_executable, fs::Permissions::from_mode(0o644)).unwrap();

        let corpus = serde_json::json!([
            {"database": "companies.db", "query": CHAD},
            {"database": "companies.db", "query": ERITREA},
        ]);
        fs::write(dir.path().join("corpus.json"), corpus.to_string()).unwrap();
        dir
    })
    .path()
}

fn fake(name: &str) -> String {
    fixtures().join(name).to_string_lossy().into_owned()
}

fn harness(engine: &str) -> Harness {
    let config = HarnessConfig::new().with_reference(fake("reference")).with_engine(fake(engine));
    Harness::new(ProcessRunner::new(), config)
}

fn run_console(harness: &Harness, corpus: &Corpus) -> String {
    let mut reporter = ConsoleReporter::new(Vec::new(), harness.config().reference_label(), false);
    harness.run(corpus, &mut reporter);
    String::from_utf8(reporter.into_inner()).unwrap()
}

fn chad_corpus() -> Corpus {
    Corpus::new(vec![TestCase::new("companies.db", CHAD)])
}

// ============================================================================
// Report scenarios
// ============================================================================

#[test]
fn test_identical_output_reports_success_with_two_timings() {
    let text = run_console(&harness("engine_ok"), &chad_corpus());

    let line = text.lines().find(|l| l.starts_with("Test 1")).unwrap();
    assert!(line.starts_with("Test 1 succeeded. Time taken: "), "{line}");
    assert!(line.contains("ms, reference time taken: "), "{line}");
    assert!(line.ends_with("ms"), "{line}");
}

#[test]
fn test_case_difference_reports_failure_without_outputs() {
    let text = run_console(&harness("engine_case_mismatch"), &chad_corpus());

    assert!(text.contains(&format!("Test 1 failed. DB Name: companies.db, Query: {CHAD}")), "{text}");
    assert!(!text.contains("ACME"), "captured output must not be printed: {text}");
    assert!(!text.contains("Acme"), "captured output must not be printed: {text}");
}

#[test]
fn test_missing_trailing_newline_is_a_failure() {
    let text = run_console(&harness("engine_no_newline"), &chad_corpus());
    assert!(text.contains("Test 1 failed"), "{text}");
}

#[test]
fn test_exit_status_difference_alone_still_passes() {
    let text = run_console(&harness("engine_exit_status"), &chad_corpus());

    assert!(text.contains("Test 1 succeeded"), "{text}");
    assert!(text.contains("warning: exit status differs (reference: 0, engine: 3)"), "{text}");
    assert!(text.contains("warning: stderr differs"), "{text}");
}

#[test]
fn test_mixed_corpus_reports_in_order() {
    let corpus = Corpus::new(vec![
        TestCase::new("companies.db", CHAD),
        TestCase::new("companies.db", ERITREA),
    ]);
    let text = run_console(&harness("engine_case_mismatch"), &corpus);

    let results: Vec<&str> = text.lines().filter(|l| l.starts_with("Test ")).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].starts_with("Test 1 failed"));
    assert!(results[1].starts_with("Test 2 succeeded"));
    assert!(text.starts_with("Running 2 tests\n"));
    assert!(text.contains("1 passed, 1 failed, 0 could not run in "));
}

#[test]
fn test_repeated_runs_give_the_same_outcomes() {
    let harness = harness("engine_case_mismatch");
    let corpus = Corpus::new(vec![
        TestCase::new("companies.db", CHAD),
        TestCase::new("companies.db", ERITREA),
    ]);

    let first = harness.run(&corpus, &mut enginediff::report::CollectingReporter::default());
    let second = harness.run(&corpus, &mut enginediff::report::CollectingReporter::default());

    assert_eq!((first.passed, first.failed), (second.passed, second.failed));
}

// ============================================================================
// Launch failures
// ============================================================================

#[test]
fn test_absent_engine_does_not_stop_later_cases() {
    let config = HarnessConfig::new()
        .with_reference(fake("reference"))
        .with_engine(fixtures().join("absent_engine").to_string_lossy());
    let harness = Harness::new(ProcessRunner::new(), config);
    let corpus = Corpus::new(vec![
        TestCase::new("companies.db", CHAD),
        TestCase::new("companies.db", ERITREA),
    ]);
    let mut reporter = enginediff::report::CollectingReporter::default();

    let summary = harness.run(&corpus, &mut reporter);

    assert_eq!(summary.could_not_run, 2);
    assert_eq!(reporter.outcomes.len(), 2);
    for outcome in &reporter.outcomes {
        assert_eq!(outcome.status(), CaseStatus::CouldNotRun);
        assert!(matches!(
            outcome,
            CaseOutcome::CouldNotRun {
                failure: LaunchFailure::NotFound { .. },
                ..
            }
        ));
    }
}

#[test]
fn test_non_executable_engine_is_permission_denied() {
    let err = ProcessRunner::new()
        .run(&fake("not_executable"), "companies.db", CHAD)
        .unwrap_err();
    assert!(matches!(err, LaunchFailure::PermissionDenied { .. }), "got {err:?}");
}

#[test]
fn test_could_not_run_line_names_the_case() {
    let config = HarnessConfig::new()
        .with_reference(fixtures().join("absent_reference").to_string_lossy())
        .with_engine(fake("engine_ok"));
    let harness = Harness::new(ProcessRunner::new(), config);

    let text = run_console(&harness, &chad_corpus());

    assert!(
        text.contains(&format!(
            "Test 1 could not run. DB Name: companies.db, Query: {CHAD}, Reason: reference engine: executable"
        )),
        "{text}"
    );
}

// ============================================================================
// Argument passing
// ============================================================================

#[test]
fn test_database_and_query_are_two_verbatim_arguments() {
    let result = ProcessRunner::new()
        .run(&fake("echo_args"), "my companies.db", "SELECT 'a  b'; -- \"$HOME\" *")
        .unwrap();
    assert_eq!(
        String::from_utf8(result.stdout).unwrap(),
        "2|my companies.db|SELECT 'a  b'; -- \"$HOME\" *\n"
    );
}

#[test]
fn test_dot_commands_are_passed_through() {
    let config = HarnessConfig::new()
        .with_reference(fake("echo_args"))
        .with_engine(fake("echo_args"));
    let harness = Harness::new(ProcessRunner::new(), config);
    let corpus = Corpus::new(vec![
        TestCase::new("companies.db", ".tables"),
        TestCase::new("companies.db", ".dbinfo"),
    ]);

    let text = run_console(&harness, &corpus);

    assert!(text.contains("Test 1 succeeded. Time taken: "), "{text}");
    assert!(text.contains("echo_args time taken: "), "{text}");
    assert!(text.contains("Test 2 succeeded"), "{text}");
}

#[test]
fn test_json_reporter_over_real_processes() {
    let harness = harness("engine_case_mismatch");
    let corpus = Corpus::new(vec![
        TestCase::new("companies.db", CHAD),
        TestCase::new("companies.db", ERITREA),
    ]);
    let mut reporter = JsonReporter::new(Vec::new());

    harness.run(&corpus, &mut reporter);

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    let records: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["status"], "failed");
    assert_eq!(records[1]["status"], "passed");
    assert!(records[1]["engine_ms"].as_f64().unwrap() >= 0.0);
    assert_eq!(records[2]["summary"]["failed"], 1);
}

// ============================================================================
// Binary
// ============================================================================

fn enginediff_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_enginediff"))
}

#[test]
fn test_binary_exits_zero_even_when_cases_fail() {
    let output = Command::new(enginediff_bin())
        .arg("--reference")
        .arg(fake("reference"))
        .arg("--engine")
        .arg(fake("engine_case_mismatch"))
        .arg("--corpus")
        .arg(fixtures().join("corpus.json"))
        .arg("--no-color")
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Running 2 tests\n"), "{stdout}");
    assert!(stdout.contains("Test 1 failed. DB Name: companies.db"), "{stdout}");
    assert!(stdout.contains("Test 2 succeeded."), "{stdout}");
    assert!(!stdout.contains('\x1b'), "--no-color must disable escapes: {stdout}");
}

#[test]
fn test_binary_json_format_and_filter() {
    let output = Command::new(enginediff_bin())
        .arg("--reference")
        .arg(fake("reference"))
        .arg("--engine")
        .arg(fake("engine_ok"))
        .arg("--corpus")
        .arg(fixtures().join("corpus.json"))
        .args(["--format", "json", "-k", "eritrea"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let records: Vec<serde_json::Value> = stdout.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["test"], 2);
    assert_eq!(records[0]["status"], "passed");
    assert_eq!(records[1]["summary"]["total"], 1);
}

#[test]
fn test_binary_rejects_bad_corpus_file() {
    let output = Command::new(enginediff_bin())
        .arg("--corpus")
        .arg(fixtures().join("echo_args"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("invalid corpus JSON"), "{stderr}");
}

#[test]
fn test_binary_resolves_relative_engines_before_entering_workdir() {
    let output = Command::new(enginediff_bin())
        .current_dir(fixtures())
        .args(["--reference", "./build/reference", "--engine", "./build/sql"])
        .args(["--workdir", "workdir", "-k", "chad", "--no-color"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("could not run"), "{stdout}");
    assert!(stdout.contains("Test 5 succeeded."), "{stdout}");
    assert!(stdout.contains("Test 7 succeeded."), "{stdout}");
    assert!(stdout.contains("2 passed, 0 failed, 0 could not run in"), "{stdout}");
}

#[test]
fn test_binary_prints_divergence_warnings_once() {
    let output = Command::new(enginediff_bin())
        .env_remove("RUST_LOG")
        .arg("--reference")
        .arg(fake("reference"))
        .arg("--engine")
        .arg(fake("engine_exit_status"))
        .arg("--corpus")
        .arg(fixtures().join("corpus.json"))
        .arg("--no-color")
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stdout.matches("warning: exit status differs").count(), 2, "{stdout}");
    assert!(!stderr.contains("exit status differs"), "{stderr}");
}
