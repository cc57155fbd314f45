use super::process_runner::{Invocation, ProcessRunner};
use crate::Result;
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Up,
    Down,
    Pull,
}

/// Thin wrapper building `docker-compose -f <file> ...` command lines
pub struct Compose<'a> {
    runner: &'a dyn ProcessRunner,
    binary: String,
}

impl<'a> Compose<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    /// Command for `action`, run from the compose file's directory
    pub fn invocation(
        &self,
        file: &Path,
        action: ComposeAction,
        services: &[String],
    ) -> Invocation {
        let mut invocation = Invocation::new(&self.binary)
            .arg("-f")
            .arg(file.display().to_string());
        invocation = match action {
            ComposeAction::Up => invocation.args(["up", "-d"]).args(services.iter().cloned()),
            ComposeAction::Down => invocation.arg("down").args(services.iter().cloned()),
            ComposeAction::Pull => invocation.arg("pull"),
        };
        if let Some(dir) = file.parent() {
            invocation = invocation.current_dir(dir);
        }
        invocation
    }

    /// Run with the terminal attached; a failing exit status is fatal
    pub fn run(&self, file: &Path, action: ComposeAction, services: &[String]) -> Result<()> {
        let invocation = self.invocation(file, action, services);
        let cwd = invocation
            .cwd
            .as_deref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| ".".to_string());
        println!(
            "Running command {} in {}",
            invocation.to_string().yellow(),
            cwd.yellow()
        );

        self.runner.run(&invocation)?.into_result(&invocation)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::process_runner::{RecordingRunner, RunOutcome};
    use std::path::PathBuf;

    #[test]
    fn test_up_without_services() {
        let runner = RecordingRunner::new();
        let compose = Compose::new(&runner, "docker-compose");
        let inv = compose.invocation(
            Path::new("/p/studio/docker-compose.yml"),
            ComposeAction::Up,
            &[],
        );

        assert_eq!(
            inv.to_string(),
            "docker-compose -f /p/studio/docker-compose.yml up -d"
        );
        assert_eq!(inv.cwd, Some(PathBuf::from("/p/studio")));
        assert!(!inv.capture);
    }

    #[test]
    fn test_down_with_services() {
        let runner = RecordingRunner::new();
        let compose = Compose::new(&runner, "docker-compose");
        let services = vec!["chronos".to_string(), "illustry".to_string()];
        let inv = compose.invocation(
            Path::new("/p/docker-compose.yml"),
            ComposeAction::Down,
            &services,
        );

        assert_eq!(
            inv.to_string(),
            "docker-compose -f /p/docker-compose.yml down chronos illustry"
        );
    }

    #[test]
    fn test_pull() {
        let runner = RecordingRunner::new();
        Compose::new(&runner, "docker-compose")
            .run(Path::new("/p/docker-compose.yml"), ComposeAction::Pull, &[])
            .unwrap();
        assert_eq!(
            runner.command_lines(),
            vec!["docker-compose -f /p/docker-compose.yml pull"]
        );
    }

    #[test]
    fn test_failing_compose_is_fatal() {
        let runner = RecordingRunner::new().then(RunOutcome {
            code: Some(1),
            ..Default::default()
        });
        let result = Compose::new(&runner, "docker-compose").run(
            Path::new("/p/docker-compose.yml"),
            ComposeAction::Up,
            &[],
        );
        assert!(result.is_err());
    }
}
