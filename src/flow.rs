//! End-to-end run orchestration behind the `pinpack` binary.
//!
//! Resolves the project directory, layers configuration, then either prints
//! the dry-run plan or drives [`PackagingMatrix::run`] and reports on it.
//! The host seams are passed in so the whole flow runs against test doubles.

use crate::cli::Cli;
use crate::config::{PinpackConfig, resolve_project_dir};
use crate::error::Result;
use crate::executor::{ArtefactMover, CommandExecutor};
use crate::matrix::PackagingMatrix;
use crate::output::DryRunInfo;
use log::{debug, info};
use std::io::Write;

/// Run pinpack as configured by `cli`.
///
/// Progress lines go to `stdout`; the dry-run plan and the closing summary
/// go to `stderr`. With an empty version list nothing is written at all.
///
/// # Errors
///
/// Returns an error when configuration cannot be loaded or validated, when
/// the report cannot be written, or when the `abort` policy stopped the run.
/// Step failures under the other policies are not errors.
pub fn run(
    cli: &Cli,
    executor: &dyn CommandExecutor,
    mover: &dyn ArtefactMover,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let mut config = PinpackConfig::discover(&project_dir, cli.config.as_deref())?;
    config.apply_overrides(&cli.overrides())?;
    let matrix = PackagingMatrix::from_config(&config, &project_dir)?;
    debug!(
        "processing {} version(s) of {} in {project_dir}",
        matrix.versions().len(),
        config.dependency
    );

    if cli.dry_run {
        let plan = matrix.plan();
        let info = DryRunInfo {
            project_dir: &project_dir,
            dependency: &config.dependency,
            on_failure: matrix.policy(),
            plan: &plan,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    let report = matrix.run(executor, mover, stdout);
    let abort = report.abort_error();

    if let Some(path) = &cli.report {
        if let Err(err) = report.write_json(path) {
            if let Some(abort) = &abort {
                write_stderr_line(stderr, format!("error: {abort}"));
            }
            return Err(err);
        }
        info!("run report written to {path}");
    }

    if !cli.quiet && !report.outcomes.is_empty() {
        write_stderr_line(stderr, report.summary());
    }

    abort.map_or(Ok(()), Err)
}

/// Map a run result to a process exit code, printing any error.
#[must_use]
pub fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PinpackError;
    use crate::test_utils::RecordingHost;
    use camino::Utf8PathBuf;
    use clap::Parser;
    use tempfile::TempDir;

    fn project() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 temp dir");
        (temp, root)
    }

    fn cli_for(root: &Utf8PathBuf, extra: &[&str]) -> Cli {
        let mut args = vec!["pinpack", "-C", root.as_str(), "-d", "pkg"];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("UTF-8 output")
    }

    #[test]
    fn dry_run_executes_nothing() {
        let (_temp, root) = project();
        let cli = cli_for(&root, &["-p", "1.0.0", "--dry-run"]);
        let host = RecordingHost::new();
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        run(&cli, &host, &host, &mut stdout, &mut stderr).expect("dry run succeeds");

        assert!(host.events().is_empty());
        assert!(stdout.is_empty());
        assert!(text(stderr).contains("npm i pkg@1.0.0"));
    }

    #[test]
    fn summary_goes_to_stderr_and_progress_to_stdout() {
        let (_temp, root) = project();
        let cli = cli_for(&root, &["-p", "1.0.0", "-p", "2.0.0"]);
        let host = RecordingHost::new();
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        run(&cli, &host, &host, &mut stdout, &mut stderr).expect("run succeeds");

        assert_eq!(
            text(stdout),
            "=== PROCESSING 1.0.0 ===\n=== PROCESSING 2.0.0 ===\n"
        );
        assert_eq!(text(stderr), "Packaged 2 of 2 version(s)\n");
    }

    #[test]
    fn quiet_suppresses_summary() {
        let (_temp, root) = project();
        let cli = cli_for(&root, &["-p", "1.0.0", "--quiet"]);
        let host = RecordingHost::new();
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        run(&cli, &host, &host, &mut stdout, &mut stderr).expect("run succeeds");

        assert!(stderr.is_empty());
        assert!(!stdout.is_empty());
    }

    #[test]
    fn failures_under_continue_still_exit_cleanly() {
        let (_temp, root) = project();
        let cli = cli_for(&root, &["-p", "1.0.0"]);
        let host = RecordingHost::new().failing_on("npm");
        let mut stderr = Vec::new();

        let result = run(&cli, &host, &host, &mut Vec::new(), &mut stderr);

        assert_eq!(exit_code_for_run_result(result, &mut Vec::new()), 0);
        assert!(text(stderr).contains("1 with failures"));
    }

    #[test]
    fn abort_returns_step_failure() {
        let (_temp, root) = project();
        let cli = cli_for(&root, &["-p", "1.0.0", "--on-failure", "abort"]);
        let host = RecordingHost::new().failing_on("npm run package");

        let err = run(&cli, &host, &host, &mut Vec::new(), &mut Vec::new())
            .expect_err("abort surfaces the failure");

        assert!(matches!(err, PinpackError::StepFailed { .. }));
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_run_result(Err(err), &mut stderr), 1);
        assert!(text(stderr).starts_with("error: package failed for version 1.0.0"));
    }

    #[test]
    fn project_config_file_is_discovered() {
        let (_temp, root) = project();
        std::fs::write(
            root.join("pinpack.toml"),
            "dependency = \"from-file\"\nversions = [\"3.1.4\"]\n",
        )
        .expect("write config");
        let cli = Cli::parse_from(["pinpack", "-C", root.as_str()]);
        let host = RecordingHost::new();

        run(&cli, &host, &host, &mut Vec::new(), &mut Vec::new()).expect("run succeeds");

        assert_eq!(
            host.lines().first().map(String::as_str),
            Some("npm i from-file@3.1.4")
        );
    }

    #[test]
    fn invalid_cli_version_fails_before_running() {
        let (_temp, root) = project();
        let cli = cli_for(&root, &["-p", "1.0 beta"]);
        let host = RecordingHost::new();

        let err = run(&cli, &host, &host, &mut Vec::new(), &mut Vec::new())
            .expect_err("invalid version");

        assert!(matches!(err, PinpackError::InvalidVersion { .. }));
        assert!(host.events().is_empty());
    }

    #[test]
    fn abort_cause_is_printed_when_report_cannot_be_written() {
        let (_temp, root) = project();
        let report_path = root.join("missing").join("report.json");
        let cli = cli_for(
            &root,
            &[
                "-p",
                "1.0.0",
                "--on-failure",
                "abort",
                "--report",
                report_path.as_str(),
            ],
        );
        let host = RecordingHost::new().failing_on("npm run package");
        let mut stderr = Vec::new();

        let err = run(&cli, &host, &host, &mut Vec::new(), &mut stderr)
            .expect_err("report write fails");

        assert!(matches!(err, PinpackError::ReportWrite { .. }));
        assert!(text(stderr).starts_with("error: package failed for version 1.0.0"));
    }

    #[test]
    fn pinned_dependency_name_fails_before_running() {
        let (_temp, root) = project();
        let cli = Cli::parse_from(["pinpack", "-C", root.as_str(), "-d", "pkg@2", "-p", "1.0.0"]);
        let host = RecordingHost::new();

        let err = run(&cli, &host, &host, &mut Vec::new(), &mut Vec::new())
            .expect_err("dependency with a version suffix");

        assert!(matches!(
            err,
            PinpackError::InvalidSetting {
                field: "dependency",
                ..
            }
        ));
        assert!(host.events().is_empty());
    }

    #[test]
    fn report_is_written_when_requested() {
        let (_temp, root) = project();
        let report_path = root.join("report.json");
        let cli = cli_for(&root, &["-p", "1.0.0", "--report", report_path.as_str()]);
        let host = RecordingHost::new();

        run(&cli, &host, &host, &mut Vec::new(), &mut Vec::new()).expect("run succeeds");

        let json = std::fs::read_to_string(&report_path).expect("report exists");
        assert!(json.contains("\"dependency\": \"pkg\""));
    }
}
