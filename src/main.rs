//! pinpack CLI entrypoint.
//!
//! Installs each configured dependency version in turn, runs the packaging
//! command, and renames the artefact to embed the version.

use clap::Parser;
use pinpack::cli::Cli;
use pinpack::executor::{FsArtefactMover, SystemCommandExecutor};
use pinpack::flow::{exit_code_for_run_result, run};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let executor = cli
        .project_dir
        .clone()
        .map_or_else(SystemCommandExecutor::default, SystemCommandExecutor::in_dir);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    let run_result = run(&cli, &executor, &FsArtefactMover, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Routes `log` records to stderr; `RUST_LOG` takes precedence over the
/// `--quiet`/`--verbose` flags.
fn init_logging(cli: &Cli) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .init();
}
