//! Integration tests for `studio init`
//!
//! Every test runs against a temporary directory, an in-process registry,
//! scripted prompt answers and a recording process runner.

use std::fs;
use std::path::{Path, PathBuf};
use studio::config::{Defaults, StudioPaths};
use studio::orchestrator::{RecordingRunner, RunOutcome};
use studio::prompt::ScriptedPrompter;
use studio::services::{JsonRegistry, LocalHub, ProjectStore};
use studio::{InitOptions, ProjectMetadata, Service, StudioContext, StudioError};
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    root: PathBuf,
    registry: JsonRegistry,
    prompter: ScriptedPrompter,
    runner: RecordingRunner,
    hub: LocalHub,
}

impl Fixture {
    fn new() -> Self {
        Self::with(ScriptedPrompter::default(), RecordingRunner::new())
    }

    fn with(prompter: ScriptedPrompter, runner: RecordingRunner) -> Self {
        let temp = TempDir::new().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        fs::create_dir_all(root.join("work")).unwrap();
        let registry = JsonRegistry::new(root.join(".dxw/studio/projects.json"));
        let hub = LocalHub(root.join("hub"));
        Self {
            _temp: temp,
            root,
            registry,
            prompter,
            runner,
            hub,
        }
    }

    fn ctx(&self) -> StudioContext<'_> {
        StudioContext::new(
            StudioPaths::at(self.root.join(".dxw")),
            Defaults::bundled(),
            &self.registry,
            &self.prompter,
            &self.runner,
            &self.hub,
        )
        .with_port_probe(|_| true)
    }

    fn work(&self) -> PathBuf {
        self.root.join("work")
    }

    /// Offline options with the registry given on the command line
    fn options(&self) -> InitOptions {
        let mut options = InitOptions::new(self.work());
        options.offline = true;
        options.chronos_docker_registry = Some("registry.example:5000".to_string());
        options
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// =========================================================================
// Folder layout and generated files
// =========================================================================

#[test]
fn test_init_creates_project_files() {
    let fx = Fixture::new();
    let options = fx.options().with_port(Service::Chronos, 3100);

    let folder = studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();

    assert_eq!(folder, fx.work().join("demo"));
    let compose = folder.join("studio/docker-compose.yml");
    assert!(compose.exists());
    assert!(folder.join("studio/data/chronos").is_dir());
    assert!(folder.join("studio/data/chronos1").is_dir());
    assert!(folder.join("studio/data/illustry").is_dir());
    assert!(folder.join("studio/init-db.sql").exists());
    assert_eq!(read(&folder.join("studio/.env")), "COMPOSE_PROJECT_NAME=demo");

    let content = read(&compose);
    assert!(content.contains("\"3100:8080\""));
    assert!(content.contains("image: registry.example:5000/chronos:latest"));
    assert!(content.contains("chronos.demo.localhost"));
    assert!(content.contains("traefiknet"));
}

#[test]
fn test_init_allocates_distinct_ports_for_missing_ones() {
    let fx = Fixture::new();
    let options = fx.options().with_port(Service::Chronos, 3100);

    let folder = studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();
    let metadata = ProjectMetadata::load(&folder).unwrap();

    assert_eq!(metadata.services["chronos"].port_url, "http://localhost:3100");
    assert_eq!(metadata.services["chronos1"].port_url, "http://localhost:3000");
    assert_eq!(metadata.services["illustry"].port_url, "http://localhost:3001");
}

#[test]
fn test_init_allocates_around_given_ports() {
    let fx = Fixture::new();
    let options = fx.options().with_port(Service::Chronos1, 3000);

    let folder = studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();
    let metadata = ProjectMetadata::load(&folder).unwrap();

    assert_eq!(metadata.services["chronos"].port_url, "http://localhost:3001");
    assert_eq!(metadata.services["chronos1"].port_url, "http://localhost:3000");
    assert_eq!(metadata.services["illustry"].port_url, "http://localhost:3002");
}

#[test]
fn test_init_writes_metadata() {
    let fx = Fixture::new();
    let folder = studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap();

    assert!(ProjectMetadata::exists_in(&folder));
    assert!(!ProjectMetadata::exists_in(&fx.work()));

    let metadata = ProjectMetadata::load(&folder).unwrap();
    assert_eq!(metadata.project_id, "demo");
    assert_eq!(metadata.compose_file.as_deref(), Some("studio/docker-compose.yml"));
    assert_eq!(
        metadata.services["illustry"].image.as_deref(),
        Some("dxworks/illustry:latest")
    );
    assert_eq!(
        metadata.services["chronos1"].traefik_url,
        "https://chronos1.demo.localhost"
    );
}

#[test]
fn test_init_flat_layout() {
    let fx = Fixture::new();
    let mut options = fx.options();
    options.flat = true;

    let folder = studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();

    assert!(folder.join("docker-compose.yml").exists());
    assert!(folder.join("data/chronos").is_dir());
    assert!(!folder.join("studio").exists());
    assert_eq!(
        ProjectMetadata::load(&folder).unwrap().compose_file.as_deref(),
        Some("docker-compose.yml")
    );
}

// =========================================================================
// Registry
// =========================================================================

#[test]
fn test_init_registers_absolute_folder() {
    let fx = Fixture::new();
    studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap();
    studio::cli::init::run(&fx.ctx(), "other", fx.options()).unwrap();

    let projects = fx.registry.list();
    assert_eq!(projects["demo"], fx.work().join("demo"));
    assert_eq!(projects["other"], fx.work().join("other"));
    assert!(projects["demo"].is_absolute());
}

#[test]
fn test_registry_write_failure_does_not_abort_init() {
    let fx = Fixture::new();
    // A directory where the registry file should be makes the write fail
    fs::create_dir_all(fx.registry.path()).unwrap();

    let folder = studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap();

    assert!(ProjectMetadata::exists_in(&folder));
    assert!(fx.registry.list().is_empty());
}

// =========================================================================
// Existing folders
// =========================================================================

#[test]
fn test_init_refuses_existing_project_without_force() {
    let fx = Fixture::new();
    let folder = studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap();
    let compose = folder.join("studio/docker-compose.yml");
    fs::write(&compose, "edited").unwrap();
    let registry_before = read(fx.registry.path());

    let err = studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StudioError>(),
        Some(StudioError::ProjectExists { project_id, .. }) if project_id == "demo"
    ));
    assert_eq!(read(&compose), "edited");
    assert_eq!(read(fx.registry.path()), registry_before);
}

#[test]
fn test_init_refuses_foreign_non_empty_folder() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.work().join("demo")).unwrap();
    fs::write(fx.work().join("demo/notes.txt"), "mine").unwrap();

    assert!(studio::cli::init::run(&fx.ctx(), "demo", fx.options()).is_err());
    assert!(!fx.work().join("demo/studio").exists());
    assert!(fx.registry.list().is_empty());
}

#[test]
fn test_init_refuses_empty_existing_folder() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.work().join("demo")).unwrap();

    let err = studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StudioError>(),
        Some(StudioError::ProjectExists { .. })
    ));
    assert_eq!(fs::read_dir(fx.work().join("demo")).unwrap().count(), 0);
    assert!(fx.registry.list().is_empty());
}

#[test]
fn test_init_force_accepts_empty_existing_folder() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.work().join("demo")).unwrap();

    let mut options = fx.options();
    options.force = true;
    let folder = studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();
    assert!(ProjectMetadata::exists_in(&folder));
}

#[test]
fn test_init_force_overwrites() {
    let fx = Fixture::new();
    let folder = studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap();
    fs::write(folder.join("studio/docker-compose.yml"), "edited").unwrap();

    let mut options = fx.options().with_port(Service::Chronos, 3999);
    options.force = true;
    studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();

    assert!(read(&folder.join("studio/docker-compose.yml")).contains("3999:8080"));
}

#[test]
fn test_init_rejects_project_id_with_separator() {
    let fx = Fixture::new();
    assert!(studio::cli::init::run(&fx.ctx(), "a/b", fx.options()).is_err());
    assert!(!fx.work().join("a").exists());
}

// =========================================================================
// Registry URL prompt
// =========================================================================

#[test]
fn test_missing_registry_is_prompted() {
    let fx = Fixture::with(
        ScriptedPrompter::new(["prompted.example/"]),
        RecordingRunner::new(),
    );
    let mut options = fx.options();
    options.chronos_docker_registry = None;

    let folder = studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();

    assert_eq!(fx.prompter.asked().len(), 1);
    let compose = read(&folder.join("studio/docker-compose.yml"));
    assert!(compose.contains("image: prompted.example/chronos:latest"));
}

#[test]
fn test_given_registry_is_not_prompted() {
    let fx = Fixture::new();
    studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap();
    assert!(fx.prompter.asked().is_empty());
}

// =========================================================================
// Online steps: version lookup and hub seeding
// =========================================================================

fn labels(json: &str) -> RunOutcome {
    RunOutcome {
        code: Some(0),
        stdout: json.to_string(),
        stderr: String::new(),
    }
}

#[test]
fn test_online_init_resolves_versions_and_seeds_data() {
    let runner = RecordingRunner::new()
        // chronos: pull, inspect
        .then(RunOutcome::ok())
        .then(labels(r#"{"org.opencontainers.image.version":"2.4.1"}"#))
        // chronos1: pull fails, no inspect
        .then(RunOutcome {
            code: Some(1),
            stdout: String::new(),
            stderr: "denied".to_string(),
        });
    // illustry has a fixed tag and needs no lookup
    let fx = Fixture::with(ScriptedPrompter::default(), runner);
    fs::create_dir_all(fx.root.join("hub/chronos2/definitions")).unwrap();
    fs::write(fx.root.join("hub/chronos2/definitions/java.json"), "{}").unwrap();

    let mut options = fx.options().with_tag(Service::Illustry, "1.2.0");
    options.offline = false;
    let folder = studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();

    let metadata = ProjectMetadata::load(&folder).unwrap();
    assert_eq!(metadata.services["chronos"].version, "2.4.1");
    assert_eq!(metadata.services["chronos1"].version, "latest");
    assert_eq!(metadata.services["illustry"].version, "1.2.0");
    assert_eq!(fx.runner.calls().len(), 3);

    assert!(folder
        .join("studio/data/chronos/definitions/java.json")
        .exists());
}

#[test]
fn test_missing_hub_only_warns() {
    let runner = RecordingRunner::new()
        .then(RunOutcome::ok())
        .then(labels("{}"));
    let fx = Fixture::with(ScriptedPrompter::default(), runner);
    let mut options = fx
        .options()
        .with_tag(Service::Chronos1, "1.0")
        .with_tag(Service::Illustry, "1.0");
    options.offline = false;

    let folder = studio::cli::init::run(&fx.ctx(), "demo", options).unwrap();

    assert!(ProjectMetadata::exists_in(&folder));
    let data = fs::read_dir(folder.join("studio/data/chronos")).unwrap();
    assert_eq!(data.count(), 0);
}

#[test]
fn test_offline_init_runs_no_commands() {
    let fx = Fixture::new();
    studio::cli::init::run(&fx.ctx(), "demo", fx.options()).unwrap();
    assert!(fx.runner.calls().is_empty());
}
