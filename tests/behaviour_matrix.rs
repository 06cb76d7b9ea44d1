//! Behaviour tests for the version iterator.
//!
//! Scenarios drive `PackagingMatrix` against a recording host so that the
//! order of installs, packaging runs and renames can be asserted without
//! touching a real package manager.

use camino::Utf8Path;
use pinpack::artefact::ArtefactNaming;
use pinpack::config::PinpackConfig;
use pinpack::matrix::PackagingMatrix;
use pinpack::policy::FailurePolicy;
use pinpack::report::{RunReport, VersionOutcome};
use pinpack::step::StepStatus;
use pinpack::test_utils::RecordingHost;
use pinpack::version::DependencyVersion;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Default)]
struct MatrixWorld {
    config: PinpackConfig,
    host: RecordingHost,
    progress: Vec<String>,
    report: Option<RunReport>,
}

#[fixture]
fn world() -> MatrixWorld {
    MatrixWorld::default()
}

fn outcome<'a>(world: &'a MatrixWorld, version: &str) -> &'a VersionOutcome {
    world
        .report
        .as_ref()
        .expect("matrix has run")
        .outcomes
        .iter()
        .find(|o| o.version.as_str() == version)
        .unwrap_or_else(|| panic!("no outcome for {version}"))
}

#[given("the dependency \"{name}\"")]
fn given_dependency(world: &mut MatrixWorld, name: String) {
    world.config.dependency = name;
}

#[given("the artefact \"{prefix}\" at target version \"{target}\" with extension \"{ext}\"")]
fn given_artefact(world: &mut MatrixWorld, prefix: String, target: String, ext: String) {
    world.config.artefact = ArtefactNaming {
        prefix,
        target_version: target,
        extension: ext,
    };
}

#[given("the versions \"{first}\" and \"{second}\"")]
fn given_versions(world: &mut MatrixWorld, first: String, second: String) {
    world.config.versions = vec![
        DependencyVersion::parse(first).expect("valid version"),
        DependencyVersion::parse(second).expect("valid version"),
    ];
}

#[given("no versions")]
fn given_no_versions(world: &mut MatrixWorld) {
    world.config.versions.clear();
}

#[given("the failure policy \"{policy}\"")]
fn given_policy(world: &mut MatrixWorld, policy: String) {
    world.config.on_failure = match policy.as_str() {
        "continue" => FailurePolicy::Continue,
        "skip-version" => FailurePolicy::SkipVersion,
        "abort" => FailurePolicy::Abort,
        other => panic!("unknown policy {other}"),
    };
}

#[given("the host fails on \"{needle}\"")]
fn given_host_fails(world: &mut MatrixWorld, needle: String) {
    world.host = std::mem::take(&mut world.host).failing_on(needle);
}

#[when("the matrix runs")]
fn when_matrix_runs(world: &mut MatrixWorld) {
    let matrix = PackagingMatrix::from_config(&world.config, Utf8Path::new("/work"))
        .expect("valid configuration");
    let mut progress = Vec::new();
    let report = matrix.run(&world.host, &world.host, &mut progress);
    world.progress = String::from_utf8(progress)
        .expect("progress is UTF-8")
        .lines()
        .map(str::to_owned)
        .collect();
    world.report = Some(report);
}

#[then("{count:usize} progress lines are printed")]
fn then_progress_count(world: &mut MatrixWorld, count: usize) {
    assert_eq!(world.progress.len(), count);
}

#[then("progress line {index:usize} mentions \"{version}\"")]
fn then_progress_mentions(world: &mut MatrixWorld, index: usize, version: String) {
    let line = world
        .progress
        .get(index - 1)
        .unwrap_or_else(|| panic!("no progress line {index}"));
    assert!(line.contains(&version), "line {index} was {line:?}");
}

#[then("invocation {index:usize} is \"{expected}\"")]
fn then_invocation(world: &mut MatrixWorld, index: usize, expected: String) {
    let lines = world.host.lines();
    let line = lines
        .get(index - 1)
        .unwrap_or_else(|| panic!("no invocation {index}"));
    assert_eq!(line, &expected);
}

#[then("there are {count:usize} invocations")]
fn then_invocation_count(world: &mut MatrixWorld, count: usize) {
    assert_eq!(world.host.events().len(), count, "{:?}", world.host.lines());
}

#[then("the install of \"{version}\" failed")]
fn then_install_failed(world: &mut MatrixWorld, version: String) {
    assert!(outcome(world, &version).install.is_failed());
}

#[then("the rename of \"{version}\" succeeded")]
fn then_rename_succeeded(world: &mut MatrixWorld, version: String) {
    assert!(outcome(world, &version).rename.is_succeeded());
}

#[then("the rename of \"{version}\" was skipped")]
fn then_rename_skipped(world: &mut MatrixWorld, version: String) {
    assert_eq!(outcome(world, &version).rename, StepStatus::Skipped);
}

#[then("the run was aborted")]
fn then_run_aborted(world: &mut MatrixWorld) {
    let report = world.report.as_ref().expect("matrix has run");
    assert!(report.aborted);
    assert!(report.abort_error().is_some());
}

#[scenario(
    path = "tests/features/version_matrix.feature",
    name = "Two versions are installed, packaged and renamed in order"
)]
fn scenario_two_versions(world: MatrixWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/version_matrix.feature",
    name = "An empty version list does nothing"
)]
fn scenario_empty_list(world: MatrixWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/version_matrix.feature",
    name = "A failed install does not stop packaging under the continue policy"
)]
fn scenario_continue_policy(world: MatrixWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/version_matrix.feature",
    name = "A failed install skips the rest of that version under skip-version"
)]
fn scenario_skip_version_policy(world: MatrixWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/version_matrix.feature",
    name = "A failed packaging run stops everything under abort"
)]
fn scenario_abort_policy(world: MatrixWorld) {
    let _ = world;
}
