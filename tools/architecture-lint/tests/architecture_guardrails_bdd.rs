//! Behaviour tests for the client layering check.

use std::fs;
use std::sync::Mutex;

use architecture_lint::{LintError, SourceFile, check_tree};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const GOOD_DOMAIN: &str = "use super::ports::FlagStore; pub struct Awards;";

#[derive(Default)]
struct World {
    scratch: Option<TempDir>,
    client_dir: Option<Utf8PathBuf>,
    outcome: Option<Result<(), LintError>>,
}

impl World {
    fn scratch_client(&mut self) -> Utf8PathBuf {
        let scratch = self
            .scratch
            .get_or_insert_with(|| TempDir::new().expect("scratch dir"));
        let client = Utf8Path::from_path(scratch.path())
            .expect("utf-8 temp path")
            .join("client");
        self.client_dir = Some(client.clone());
        client
    }

    fn write(&mut self, source: &SourceFile) {
        let path = self.scratch_client().join("src").join(&source.file);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(&path, &source.contents).expect("write source");
    }

    fn findings(&self) -> Vec<String> {
        match self.outcome.as_ref().expect("check ran") {
            Err(LintError::Findings(found)) => found.iter().map(ToString::to_string).collect(),
            other => panic!("expected findings, got {other:?}"),
        }
    }
}

#[fixture]
fn world() -> Mutex<World> {
    Mutex::new(World::default())
}

#[given("the client sources in this repository")]
fn repository_client(world: &Mutex<World>) {
    let manifest = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let client = manifest
        .ancestors()
        .nth(2)
        .expect("workspace root")
        .join("client");
    world.lock().expect("world").client_dir = Some(client);
}

#[given("a client whose command line imports the HTTP gateway")]
fn inbound_imports_gateway(world: &Mutex<World>) {
    let mut world = world.lock().expect("world");
    world.write(&SourceFile::new("domain/mod.rs", GOOD_DOMAIN));
    world.write(&SourceFile::new(
        "inbound/cli/render.rs",
        "use crate::outbound::api::HttpApiGateway; pub fn render(_: &HttpApiGateway) {}",
    ));
}

#[given("a client whose domain opens files with cap-std")]
fn domain_opens_files(world: &Mutex<World>) {
    world.lock().expect("world").write(&SourceFile::new(
        "domain/unseen_awards.rs",
        "use cap_std::fs::Dir; pub fn open(_: &Dir) {}",
    ));
}

#[when("the layering check runs")]
fn run_check(world: &Mutex<World>) {
    let mut world = world.lock().expect("world");
    let client = world.client_dir.clone().expect("client dir chosen");
    world.outcome = Some(check_tree(&client));
}

#[then("the check passes")]
fn check_passes(world: &Mutex<World>) {
    let world = world.lock().expect("world");
    let outcome = world.outcome.as_ref().expect("check ran");
    assert!(outcome.is_ok(), "unexpected failure: {outcome:?}");
}

#[then("{file} is reported for {target}")]
fn reported(world: &Mutex<World>, file: String, target: String) {
    let file = file.trim_matches('"');
    let target = target.trim_matches('"');
    let findings = world.lock().expect("world").findings();
    assert!(
        findings
            .iter()
            .any(|finding| finding.starts_with(file) && finding.contains(target)),
        "no finding for {file} naming {target}: {findings:?}"
    );
}

#[then("{count} findings are reported")]
fn finding_count(world: &Mutex<World>, count: usize) {
    let findings = world.lock().expect("world").findings();
    assert_eq!(findings.len(), count, "findings: {findings:?}");
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "The client sources are layered correctly"
)]
fn client_sources_are_layered(world: Mutex<World>) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "The command line reaches into the HTTP gateway"
)]
fn command_line_reaches_gateway(world: Mutex<World>) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "A domain service opens files itself"
)]
fn domain_opens_files_itself(world: Mutex<World>) {
    drop(world);
}

#[scenario(
    path = "tests/features/architecture_guardrails.feature",
    name = "One run reports every finding"
)]
fn one_run_reports_everything(world: Mutex<World>) {
    drop(world);
}
